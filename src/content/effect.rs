//! Effects produced by content transitions

use crate::remote::{ContentDraft, RecordId, RemoteError};
use std::time::Duration;

/// Effects to be executed after a content transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEffect {
    /// Publish a fresh view snapshot to subscribers
    PublishView,

    /// `GET /content`
    FetchAll,

    /// `POST /content`
    CreateRecord { draft: ContentDraft },

    /// `PUT /content/{id}`
    UpdateRecord { id: RecordId, draft: ContentDraft },

    /// `DELETE /content/{id}`
    DeleteRecord { id: RecordId },

    /// Ask the user a yes/no question before deleting
    AskConfirmation { id: RecordId, prompt: String },

    /// Blocking user-facing error
    Alert { message: String },

    /// Failure that is logged but not shown
    LogFailure {
        operation: &'static str,
        error: RemoteError,
    },

    /// Deliver `NoticeExpired { seq }` after `delay`
    ScheduleNoticeClear { delay: Duration, seq: u64 },
}

impl ContentEffect {
    pub fn alert(message: impl Into<String>) -> Self {
        ContentEffect::Alert {
            message: message.into(),
        }
    }

    pub fn is_remote_call(&self) -> bool {
        matches!(
            self,
            ContentEffect::FetchAll
                | ContentEffect::CreateRecord { .. }
                | ContentEffect::UpdateRecord { .. }
                | ContentEffect::DeleteRecord { .. }
        )
    }
}
