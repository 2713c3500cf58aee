//! The contact form: an event-driven submission lifecycle over the field
//! registry, with per-field presentation state.
//!
//! All timing is explicit. Events carry instants, timers are deadlines,
//! and nothing here sleeps or spawns; the driver owns the clock and the
//! transport.

mod event;
mod machine;
mod view;

pub use event::{FormAction, FormEvent};
pub use machine::{
    BANNER_DISMISS_DELAY, Banner, ContactForm, FormPhase, SUBMISSION_FAILED_NOTICE,
    SUCCESS_RESET_DELAY,
};
pub use view::FieldView;
