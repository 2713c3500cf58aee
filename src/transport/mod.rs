//! Submission transports: the abstract async contract plus a flaky
//! reference implementation and the JSONL outbox used by the binary.
//!
//! The form core only ever sees `submit(payload)` settle into success or
//! failure; everything else (delay, persistence, refusal) lives here.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

mod error;
mod mock;
mod outbox;

pub use error::TransportError;
pub use mock::FlakyTransport;
pub use outbox::{Delivery, Outbox, OutboxTransport};

/// A submitted form: field name to trimmed value.
pub type Payload = BTreeMap<String, String>;

/// The future returned by [`Transport::submit`].
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + 'a>>;

/// An asynchronous, single-attempt submission channel.
///
/// Implementations perform exactly one attempt per call; retry policy, if
/// any, belongs to the caller. A transport that never settles stalls the
/// form in its submitting phase — no timeout is imposed here.
pub trait Transport: Send + Sync {
    /// Delivers a payload, settling into success or failure.
    fn submit(&self, payload: Payload) -> SubmitFuture<'_>;
}
