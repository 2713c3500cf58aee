//! TUI: app state, the event loop, and widgets.

pub mod app;
pub mod error;
pub mod widgets;

pub use app::{App, Mode};
pub use error::AppError;
