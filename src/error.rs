use thiserror::Error;

/// The client's error type.
///
/// Every failure surfaces through this enum so callers can render the
/// uniform `{error, status}` shape the UI layer expects.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered with a non-2xx status. `detail` carries the
    /// backend's `detail` field, or a generic fallback when the body was
    /// not parseable.
    #[error("{detail}")]
    Api {
        /// The HTTP status code of the response.
        status: u16,
        /// The backend's error message.
        detail: String,
    },

    /// No response was received (DNS, refused connection, timeout).
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A validation error, raised before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A local storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A QR code encoding/rendering error.
    #[error("QR error: {0}")]
    Qr(String),

    /// The access pass is past its expiry and can no longer be
    /// downloaded or shared.
    #[error("This access pass has expired")]
    PassExpired,
}

/// A `Result` type that uses `ClientError` as the error type.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Returns the normalized HTTP-like status for this error.
    ///
    /// Backend errors keep their status; a transport failure is reported
    /// as 500, matching the normalization the UI layer relies on.
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Api { status, .. } => *status,
            ClientError::Connection(_) => 500,
            ClientError::Validation(_) => 400,
            ClientError::PassExpired => 410,
            _ => 500,
        }
    }

    /// Returns the user-facing message for this error.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}
