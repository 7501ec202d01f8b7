//! Content sync state types

use crate::remote::{ContentDraft, ContentRecord, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DELETE_NOTICE_TEXT: &str = "Deleted successfully!";

/// Which editor, if any, is open over the list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorState {
    #[default]
    Closed,
    Creating {
        draft: ContentDraft,
    },
    Editing {
        target: RecordId,
        draft: ContentDraft,
    },
}

impl EditorState {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditorState::Closed)
    }

    pub fn draft(&self) -> Option<&ContentDraft> {
        match self {
            EditorState::Closed => None,
            EditorState::Creating { draft } | EditorState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ContentDraft> {
        match self {
            EditorState::Closed => None,
            EditorState::Creating { draft } | EditorState::Editing { draft, .. } => Some(draft),
        }
    }
}

/// The per-row action menu; at most one row has it open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowMenu {
    #[default]
    Closed,
    OpenFor {
        id: RecordId,
    },
}

/// The one remote request this engine may have outstanding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InFlight {
    Load,
    Create { draft: ContentDraft },
    Update { target: RecordId, draft: ContentDraft },
    Delete { id: RecordId },
}

impl InFlight {
    /// Create and update lock the editor until they resolve
    pub fn is_commit(&self) -> bool {
        matches!(self, InFlight::Create { .. } | InFlight::Update { .. })
    }
}

/// Transient "deleted" banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteNotice {
    /// Matches the `NoticeExpired` event that clears this notice
    pub seq: u64,
    pub acknowledged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentState {
    /// Local mirror of the store, in fetch order
    pub cache: Vec<ContentRecord>,
    pub editor: EditorState,
    pub row_menu: RowMenu,
    /// Record awaiting a yes/no answer before it is deleted
    pub confirming: Option<RecordId>,
    pub in_flight: Option<InFlight>,
    pub notice: Option<DeleteNotice>,
    /// Last notice sequence number handed out
    pub notice_seq: u64,
}

impl ContentState {
    pub fn record(&self, id: RecordId) -> Option<&ContentRecord> {
        self.cache.iter().find(|r| r.id == id)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_committing(&self) -> bool {
        self.in_flight.as_ref().is_some_and(InFlight::is_commit)
    }
}

/// Context for a content engine (immutable configuration)
#[derive(Debug, Clone)]
pub struct ContentContext {
    /// How long the delete notice stays up
    pub notice_duration: Duration,
}

impl ContentContext {
    pub fn new(notice_duration: Duration) -> Self {
        Self { notice_duration }
    }
}

impl Default for ContentContext {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NOTICE_DURATION)
    }
}
