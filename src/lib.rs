#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A landing page for the terminal: a few sections to read, a smooth
//! scrolling viewport, and a validated contact form that drops messages
//! into a local outbox.
//!
//! The core is headless. [`page::Page`] owns the sections, the viewport,
//! and the [`form::ContactForm`] state machine; the [`tui`] module drives
//! it with keystrokes and a frame ticker, and [`transport`] decides what
//! "sending" means.

pub mod form;
pub mod model;
pub mod page;
pub mod transport;
pub mod tui;
