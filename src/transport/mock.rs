use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Payload, SubmitFuture, Transport, TransportError};

/// Reference transport: a fixed delay followed by a coin flip.
///
/// Mirrors the behavior a real network transport is swapped in for —
/// useful for demos and for exercising both settle branches in tests.
pub struct FlakyTransport {
    delay: Duration,
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl FlakyTransport {
    /// Creates a transport that waits `delay` and then succeeds with
    /// probability `success_rate` (clamped to `0.0..=1.0`).
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        Self::seeded(delay, success_rate, rand::random())
    }

    /// Like [`new`](Self::new) but with a fixed RNG seed, so the outcome
    /// sequence is reproducible.
    pub fn seeded(delay: Duration, success_rate: f64, seed: u64) -> Self {
        Self {
            delay,
            success_rate: success_rate.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Transport for FlakyTransport {
    fn submit(&self, _payload: Payload) -> SubmitFuture<'_> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            let roll: f64 = self
                .rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .r#gen();
            if roll < self.success_rate {
                Ok(())
            } else {
                Err(TransportError::Rejected("simulated network error".into()))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        Payload::from([("subject".to_string(), "hello".to_string())])
    }

    #[tokio::test(start_paused = true)]
    async fn always_succeeds_at_rate_one() {
        let transport = FlakyTransport::seeded(Duration::from_millis(2000), 1.0, 7);
        for _ in 0..20 {
            assert!(transport.submit(payload()).await.is_ok());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn always_fails_at_rate_zero() {
        let transport = FlakyTransport::seeded(Duration::from_millis(2000), 0.0, 7);
        for _ in 0..20 {
            let err = transport.submit(payload()).await.unwrap_err();
            assert!(matches!(err, TransportError::Rejected(_)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn same_seed_same_outcomes() {
        let a = FlakyTransport::seeded(Duration::ZERO, 0.5, 42);
        let b = FlakyTransport::seeded(Duration::ZERO, 0.5, 42);
        for _ in 0..10 {
            assert_eq!(
                a.submit(payload()).await.is_ok(),
                b.submit(payload()).await.is_ok()
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_configured_delay() {
        let transport = FlakyTransport::seeded(Duration::from_millis(2000), 1.0, 1);
        let started = tokio::time::Instant::now();
        transport.submit(payload()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }

    #[test]
    fn success_rate_is_clamped() {
        let transport = FlakyTransport::seeded(Duration::ZERO, 7.5, 1);
        assert_eq!(transport.success_rate, 1.0);
        let transport = FlakyTransport::seeded(Duration::ZERO, -1.0, 1);
        assert_eq!(transport.success_rate, 0.0);
    }
}
