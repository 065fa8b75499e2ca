//! Error types surfaced by the client.
//!
//! Every failed request resolves to exactly one of these variants. `Api`
//! and `UnknownConnection` are the two network outcomes; `MissingArgument`
//! and `InvalidAction` are raised locally before any request is sent.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the Habitica client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server responded with a 4xx/5xx status and a parseable
    /// `{error, message}` body. Status, error type, and message are
    /// preserved verbatim.
    #[error("{message}")]
    Api {
        /// HTTP status code reported by the server.
        status: u16,
        /// The server's error type string, e.g. `NotFound`.
        error_type: String,
        /// The server's human-readable message.
        message: String,
    },

    /// The request failed without a parseable server error: the host was
    /// unreachable, the connection dropped, or the response body did not
    /// match the expected error shape. The underlying failure is kept
    /// for diagnostics.
    #[error("An unknown error occurred")]
    UnknownConnection {
        /// The original failure from the transport or parser.
        original_error: anyhow::Error,
    },

    /// A required argument was missing or empty. Raised before any
    /// network call is made.
    #[error("{0}")]
    MissingArgument(String),

    /// The requested operation cannot be performed with the given input,
    /// e.g. looking up a nonexistent content path.
    #[error("{0}")]
    InvalidAction(String),
}

impl Error {
    pub(crate) fn unknown(original_error: impl Into<anyhow::Error>) -> Self {
        Error::UnknownConnection {
            original_error: original_error.into(),
        }
    }

    pub(crate) fn missing_argument(message: impl Into<String>) -> Self {
        Error::MissingArgument(message.into())
    }

    /// The HTTP status code, when the server reported one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
