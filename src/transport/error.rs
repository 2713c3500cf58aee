/// Errors that can occur while submitting or recording a message.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred while writing or reading the outbox.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization or deserialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform does not provide a data directory.
    #[error("could not determine XDG data directory")]
    NoDataDir,

    /// The remote end (or its stand-in) refused the submission.
    #[error("submission rejected: {0}")]
    Rejected(String),
}
