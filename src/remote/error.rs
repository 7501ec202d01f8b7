//! Remote exchange error types

use thiserror::Error;

/// Remote error with classification
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Transport, message)
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Rejected { status }, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Malformed, message)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::malformed(e.to_string())
        } else if let Some(status) = e.status() {
            Self::rejected(status.as_u16(), e.to_string())
        } else {
            Self::transport(e.to_string())
        }
    }
}

/// Error classification
///
/// Callers collapse every kind into one user-visible outcome; the kind only
/// matters for logging and for picking alert wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Connection refused, DNS failure, timeout
    Transport,
    /// Non-2xx response
    Rejected { status: u16 },
    /// 2xx response whose body did not have the expected shape
    Malformed,
}

impl RemoteErrorKind {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Rejected { .. } => "rejected",
            Self::Malformed => "malformed",
        }
    }
}
