use std::time::Instant;

use crate::transport::{Payload, TransportError};

/// Everything that can happen to the contact form.
///
/// Events that start or check timers carry the current instant explicitly,
/// so the machine never reads a clock and every timing path is testable
/// with fabricated instants.
#[derive(Debug)]
pub enum FormEvent {
    /// The submit trigger was activated.
    Submit,
    /// A previously dispatched submission settled.
    Settled {
        outcome: Result<(), TransportError>,
        now: Instant,
    },
    /// The user changed a field's raw value.
    Input { field: String, value: String },
    /// The user asked to clear the form.
    Reset,
    /// Periodic heartbeat; expires pending timers.
    Tick(Instant),
}

/// What the driver must do after the form handles an event.
#[derive(Debug, PartialEq, Eq)]
pub enum FormAction {
    /// Nothing beyond redrawing.
    None,
    /// Hand this payload to the transport and report back via
    /// [`FormEvent::Settled`].
    Dispatch(Payload),
    /// Move input focus to the named field.
    Focus(&'static str),
    /// Bring the success confirmation into view.
    RevealSuccess,
}
