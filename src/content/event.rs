//! Events that can occur in the content engine

use crate::remote::{ContentRecord, RecordId, RemoteError};
use chrono::{DateTime, Utc};

/// Events that trigger content transitions
#[derive(Debug, Clone)]
pub enum ContentEvent {
    // User events
    /// Component activation; fetches the whole list
    Activate,
    BeginCreate,
    BeginEdit {
        id: RecordId,
    },
    /// Overwrite the fields that are `Some` in the open draft
    EditDraft {
        title: Option<String>,
        text: Option<String>,
    },
    Commit,
    Cancel,
    ToggleRowMenu {
        id: RecordId,
    },
    RequestRemove {
        id: RecordId,
    },
    ConfirmRemove,
    DeclineRemove,

    // Remote events
    Loaded {
        records: Vec<ContentRecord>,
    },
    LoadFailed {
        error: RemoteError,
    },
    CreateSucceeded,
    CreateFailed {
        error: RemoteError,
    },
    UpdateSucceeded {
        id: RecordId,
    },
    UpdateFailed {
        id: RecordId,
        error: RemoteError,
    },
    DeleteSucceeded {
        id: RecordId,
        acknowledged_at: DateTime<Utc>,
    },
    DeleteFailed {
        id: RecordId,
        error: RemoteError,
    },

    // Timer events
    NoticeExpired {
        seq: u64,
    },
}

impl ContentEvent {
    pub fn edit_title(title: impl Into<String>) -> Self {
        Self::EditDraft {
            title: Some(title.into()),
            text: None,
        }
    }

    pub fn edit_text(text: impl Into<String>) -> Self {
        Self::EditDraft {
            title: None,
            text: Some(text.into()),
        }
    }
}
