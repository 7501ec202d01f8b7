//! Wire types shared by the remote store and the engines

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned record identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A content record as stored remotely and mirrored in the local cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    pub title: String,
    pub text: String,
}

impl ContentRecord {
    pub fn new(id: i64, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: RecordId(id),
            title: title.into(),
            text: text.into(),
        }
    }

    /// Copy of this record's editable fields
    pub fn to_draft(&self) -> ContentDraft {
        ContentDraft {
            title: self.title.clone(),
            text: self.text.clone(),
        }
    }
}

/// Editable fields of a record; also the create/update request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub title: String,
    pub text: String,
}

impl ContentDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Name of the first required field left blank, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.text.trim().is_empty() {
            Some("text")
        } else {
            None
        }
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Body of a `POST /chat` reply
///
/// `response` is optional on the wire so a missing field decodes and can be
/// reported as malformed rather than as a generic decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}
