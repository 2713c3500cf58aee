//! Reusable rendering pieces for the landing page.

pub mod form;
pub mod nav;

pub use form::{FormEditor, draw_contact_form};
pub use nav::draw_nav;
