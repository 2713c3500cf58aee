use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Payload, SubmitFuture, Transport, TransportError};

/// A message accepted for delivery.
///
/// One `Delivery` is appended per successful submission; the payload is
/// stored as submitted (already trimmed by the form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub received_at: DateTime<Utc>,
    pub fields: Payload,
}

/// JSONL-backed delivery store: one JSON object per line, append-only.
pub struct Outbox {
    path: PathBuf,
}

impl Outbox {
    /// Creates an outbox at the XDG data location
    /// (`~/.local/share/parlor/outbox.jsonl`), creating directories as
    /// needed.
    pub fn new() -> Result<Self, TransportError> {
        let data_dir = dirs::data_dir().ok_or(TransportError::NoDataDir)?;
        Self::with_path(data_dir.join("parlor").join("outbox.jsonl"))
    }

    /// Creates an outbox backed by the given file, creating parent
    /// directories as needed.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self, TransportError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Appends a delivery as a single JSON line.
    pub fn append(&self, delivery: &Delivery) -> Result<(), TransportError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        serde_json::to_writer(&mut file, delivery)?;
        writeln!(file)?;
        Ok(())
    }

    /// Reads back all deliveries, oldest first.
    ///
    /// A missing file is an empty outbox, not an error.
    pub fn deliveries(&self) -> Result<Vec<Delivery>, TransportError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        BufReader::new(file)
            .lines()
            .map(|line| {
                let line = line?;
                serde_json::from_str(&line).map_err(TransportError::Json)
            })
            .collect()
    }
}

/// The binary's production transport: a short delay, then an outbox append.
///
/// Stands where a real network call would go; the delay keeps the loading
/// state observable.
pub struct OutboxTransport {
    outbox: Outbox,
    delay: Duration,
}

impl OutboxTransport {
    /// Creates a transport over the default XDG outbox.
    pub fn new(delay: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            outbox: Outbox::new()?,
            delay,
        })
    }

    /// Creates a transport over an outbox at the given path.
    pub fn with_path(path: impl Into<PathBuf>, delay: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            outbox: Outbox::with_path(path)?,
            delay,
        })
    }

    /// Returns the backing outbox.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }
}

impl Transport for OutboxTransport {
    fn submit(&self, payload: Payload) -> SubmitFuture<'_> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.outbox.append(&Delivery {
                received_at: Utc::now(),
                fields: payload,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use quickcheck_macros::quickcheck;
    use tempfile::tempdir;

    use super::*;

    fn make_outbox() -> (tempfile::TempDir, Outbox) {
        let dir = tempdir().unwrap();
        let outbox = Outbox::with_path(dir.path().join("outbox.jsonl")).unwrap();
        (dir, outbox)
    }

    fn make_delivery(subject: &str) -> Delivery {
        Delivery {
            received_at: Utc.with_ymd_and_hms(2026, 8, 25, 9, 30, 0).unwrap(),
            fields: Payload::from([
                ("full_name".to_string(), "Jane Doe".to_string()),
                ("email".to_string(), "jane@example.com".to_string()),
                ("subject".to_string(), subject.to_string()),
                ("message".to_string(), "Hello from the tests.".to_string()),
            ]),
        }
    }

    #[test]
    fn append_and_read_back() {
        let (_dir, outbox) = make_outbox();
        let first = make_delivery("first");
        let second = make_delivery("second");
        outbox.append(&first).unwrap();
        outbox.append(&second).unwrap();

        let deliveries = outbox.deliveries().unwrap();
        assert_eq!(deliveries, vec![first, second]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, outbox) = make_outbox();
        assert_eq!(outbox.deliveries().unwrap(), vec![]);
    }

    #[test]
    fn corrupt_line_is_an_error() {
        let (dir, outbox) = make_outbox();
        fs::write(dir.path().join("outbox.jsonl"), "{not json}\n").unwrap();
        let result = outbox.deliveries();
        assert!(matches!(result, Err(TransportError::Json(_))));
    }

    #[test]
    fn with_path_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("outbox.jsonl");
        let _outbox = Outbox::with_path(&nested).unwrap();
        assert!(nested.parent().unwrap().exists());
    }

    #[test]
    fn delivery_round_trips_through_json() {
        let delivery = make_delivery("round trip");
        let json = serde_json::to_string(&delivery).unwrap();
        let back: Delivery = serde_json::from_str(&json).unwrap();
        assert_eq!(delivery, back);
    }

    #[quickcheck]
    fn append_n_yields_n(n: u8) -> bool {
        let n = usize::from(n.min(20));
        let (_dir, outbox) = make_outbox();
        for i in 0..n {
            outbox.append(&make_delivery(&format!("msg {i}"))).unwrap();
        }
        outbox.deliveries().unwrap().len() == n
    }

    #[tokio::test(start_paused = true)]
    async fn transport_appends_after_delay() {
        let dir = tempdir().unwrap();
        let transport = OutboxTransport::with_path(
            dir.path().join("outbox.jsonl"),
            Duration::from_millis(800),
        )
        .unwrap();

        let payload = Payload::from([("subject".to_string(), "hi there".to_string())]);
        transport.submit(payload.clone()).await.unwrap();

        let deliveries = transport.outbox().deliveries().unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].fields, payload);
    }
}
