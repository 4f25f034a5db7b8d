use std::fmt;

/// Distinguishes failures the scheduler should retry from failures it
/// should merely log and move past, keeping prior state untouched.
#[derive(Debug)]
pub enum SourceError {
    /// Network failure, timeout, or 5xx — worth retrying within the tick.
    Transient(String),
    /// Malformed payload or 4xx — retrying won't help.
    Fatal(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Transient(message) => write!(f, "transient source error: {message}"),
            SourceError::Fatal(message) => write!(f, "fatal source error: {message}"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<reqwest::Error> for SourceError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() || value.is_connect() {
            return SourceError::Transient(value.to_string());
        }
        if let Some(status) = value.status() {
            if status.is_server_error() {
                return SourceError::Transient(format!("upstream returned {status}"));
            }
            return SourceError::Fatal(format!("upstream returned {status}"));
        }
        if value.is_decode() {
            return SourceError::Fatal(value.to_string());
        }
        SourceError::Transient(value.to_string())
    }
}
