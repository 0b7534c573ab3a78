//! Download error type.

use std::fmt;

/// Error returned by a transport while fetching the schema.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, TLS, too many redirects).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Writing the body to the destination failed (disk full, permission denied).
    Write(std::io::Error),
    /// The blocking transfer task panicked or was cancelled.
    Aborted(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Write(e) => write!(f, "storage: {}", e),
            FetchError::Aborted(msg) => write!(f, "transfer aborted: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Write(e) => Some(e),
            FetchError::Http(_) | FetchError::Aborted(_) => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}
