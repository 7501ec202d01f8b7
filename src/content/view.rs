//! Render-ready snapshot of the content list and editor

use super::state::{ContentState, DeleteNotice, EditorState, RowMenu, DELETE_NOTICE_TEXT};
use crate::remote::{ContentDraft, ContentRecord, RecordId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Transient confirmation shown after a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub text: &'static str,
    /// When the store acknowledged the delete
    pub acknowledged_at: DateTime<Utc>,
}

impl From<&DeleteNotice> for NoticeView {
    fn from(notice: &DeleteNotice) -> Self {
        Self {
            text: DELETE_NOTICE_TEXT,
            acknowledged_at: notice.acknowledged_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub draft: ContentDraft,
    /// Editor is locked while its commit is in flight
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentView {
    pub records: Vec<ContentRecord>,
    /// Row whose action menu is open
    pub menu_open_for: Option<RecordId>,
    pub editor: Option<EditorView>,
    pub notice: Option<NoticeView>,
    pub busy: bool,
}

impl From<&ContentState> for ContentView {
    fn from(state: &ContentState) -> Self {
        let editor = match &state.editor {
            EditorState::Closed => None,
            EditorState::Creating { draft } => Some(EditorView {
                heading: "Add New Content",
                submit_label: "Submit",
                draft: draft.clone(),
                locked: state.is_committing(),
            }),
            EditorState::Editing { draft, .. } => Some(EditorView {
                heading: "Edit Content",
                submit_label: "Update",
                draft: draft.clone(),
                locked: state.is_committing(),
            }),
        };

        Self {
            records: state.cache.clone(),
            menu_open_for: match state.row_menu {
                RowMenu::Closed => None,
                RowMenu::OpenFor { id } => Some(id),
            },
            editor,
            notice: state.notice.as_ref().map(NoticeView::from),
            busy: state.is_busy(),
        }
    }
}
