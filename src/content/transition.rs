//! Pure content sync transition function

use super::state::{ContentContext, ContentState, DeleteNotice, EditorState, InFlight, RowMenu};
use super::{ContentEffect, ContentEvent};
use crate::remote::{RecordId, RemoteError};
use thiserror::Error;

/// Result of a content transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ContentState,
    pub effects: Vec<ContentEffect>,
}

impl TransitionResult {
    pub fn new(state: ContentState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: ContentEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Snapshot subscribers after the state change
    pub fn published(self) -> Self {
        self.with_effect(ContentEffect::PublishView)
    }
}

/// Errors that can occur during a content transition
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Another request is still in progress")]
    Busy,
    #[error("No content with id {0}")]
    UnknownRecord(RecordId),
    #[error("No editor is open")]
    EditorClosed,
    #[error("The {0} field is required")]
    MissingField(&'static str),
    #[error("Nothing is awaiting confirmation")]
    NothingToConfirm,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Mutation whose failure is surfaced as an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Create,
    Update,
    Delete,
}

/// Pure transition function
///
/// Remote calls are requested as effects; their outcomes come back as the
/// `*Succeeded` / `*Failed` events and are matched against `in_flight`.
#[allow(clippy::too_many_lines)] // One arm per event keeps the table readable
pub fn transition(
    state: &ContentState,
    context: &ContentContext,
    event: ContentEvent,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Loading
        // ============================================================
        ContentEvent::Activate => {
            if state.is_busy() {
                return Err(TransitionError::Busy);
            }
            let mut next = state.clone();
            next.in_flight = Some(InFlight::Load);
            Ok(TransitionResult::new(next)
                .published()
                .with_effect(ContentEffect::FetchAll))
        }

        ContentEvent::Loaded { records } => {
            expect_in_flight(state, |f| matches!(f, InFlight::Load), "Loaded")?;
            let mut next = state.clone();
            next.cache = records;
            next.in_flight = None;
            // Row selections may point at records the store no longer has
            if let RowMenu::OpenFor { id } = next.row_menu {
                if next.record(id).is_none() {
                    next.row_menu = RowMenu::Closed;
                }
            }
            if next.confirming.is_some_and(|id| next.record(id).is_none()) {
                next.confirming = None;
            }
            close_orphaned_editor(&mut next);
            Ok(TransitionResult::new(next).published())
        }

        // Silent to the user: the list simply stays empty
        ContentEvent::LoadFailed { error } => {
            expect_in_flight(state, |f| matches!(f, InFlight::Load), "LoadFailed")?;
            let mut next = state.clone();
            next.in_flight = None;
            Ok(TransitionResult::new(next)
                .with_effect(ContentEffect::LogFailure {
                    operation: "load",
                    error,
                })
                .published())
        }

        // ============================================================
        // Editor
        // ============================================================
        ContentEvent::BeginCreate
        | ContentEvent::BeginEdit { .. }
        | ContentEvent::EditDraft { .. }
        | ContentEvent::Cancel
            if state.is_committing() =>
        {
            Err(TransitionError::Busy)
        }

        ContentEvent::BeginCreate => {
            let mut next = state.clone();
            next.editor = EditorState::Creating {
                draft: crate::remote::ContentDraft::default(),
            };
            Ok(TransitionResult::new(next).published())
        }

        ContentEvent::BeginEdit { id } => {
            let record = state.record(id).ok_or(TransitionError::UnknownRecord(id))?;
            if state.in_flight == Some(InFlight::Delete { id }) {
                return Err(TransitionError::Busy);
            }
            let mut next = state.clone();
            next.editor = EditorState::Editing {
                target: id,
                draft: record.to_draft(),
            };
            next.row_menu = RowMenu::Closed;
            Ok(TransitionResult::new(next).published())
        }

        ContentEvent::EditDraft { title, text } => {
            let mut next = state.clone();
            let draft = next.editor.draft_mut().ok_or(TransitionError::EditorClosed)?;
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(text) = text {
                draft.text = text;
            }
            Ok(TransitionResult::new(next).published())
        }

        ContentEvent::Cancel => {
            let mut next = state.clone();
            next.editor = EditorState::Closed;
            Ok(TransitionResult::new(next).published())
        }

        ContentEvent::Commit => {
            let draft = state.editor.draft().ok_or(TransitionError::EditorClosed)?;
            if state.is_busy() {
                return Err(TransitionError::Busy);
            }
            if let Some(field) = draft.missing_field() {
                return Err(TransitionError::MissingField(field));
            }

            let mut next = state.clone();
            let effect = match &state.editor {
                EditorState::Creating { draft } => {
                    next.in_flight = Some(InFlight::Create {
                        draft: draft.clone(),
                    });
                    ContentEffect::CreateRecord {
                        draft: draft.clone(),
                    }
                }
                EditorState::Editing { target, draft } => {
                    next.in_flight = Some(InFlight::Update {
                        target: *target,
                        draft: draft.clone(),
                    });
                    ContentEffect::UpdateRecord {
                        id: *target,
                        draft: draft.clone(),
                    }
                }
                EditorState::Closed => return Err(TransitionError::EditorClosed),
            };
            Ok(TransitionResult::new(next).published().with_effect(effect))
        }

        // Full re-synchronization: drop everything local and fetch again
        ContentEvent::CreateSucceeded => {
            expect_in_flight(state, |f| matches!(f, InFlight::Create { .. }), "CreateSucceeded")?;
            let next = ContentState {
                in_flight: Some(InFlight::Load),
                notice_seq: state.notice_seq,
                ..ContentState::default()
            };
            Ok(TransitionResult::new(next)
                .published()
                .with_effect(ContentEffect::FetchAll))
        }

        ContentEvent::CreateFailed { error } => {
            expect_in_flight(state, |f| matches!(f, InFlight::Create { .. }), "CreateFailed")?;
            let mut next = state.clone();
            next.in_flight = None;
            Ok(TransitionResult::new(next)
                .with_effect(ContentEffect::alert(alert_message(Mutation::Create, &error)))
                .published())
        }

        ContentEvent::UpdateSucceeded { id } => {
            let Some(InFlight::Update { target, draft }) = &state.in_flight else {
                return Err(unexpected("UpdateSucceeded", state));
            };
            if *target != id {
                return Err(unexpected("UpdateSucceeded", state));
            }

            let mut next = state.clone();
            let Some(record) = next.cache.iter_mut().find(|r| r.id == id) else {
                return Err(TransitionError::InvalidTransition(format!(
                    "UpdateSucceeded for {id}, which is no longer cached"
                )));
            };
            record.title.clone_from(&draft.title);
            record.text.clone_from(&draft.text);
            next.editor = EditorState::Closed;
            next.in_flight = None;
            Ok(TransitionResult::new(next).published())
        }

        ContentEvent::UpdateFailed { id, error } => {
            expect_in_flight(
                state,
                |f| matches!(f, InFlight::Update { target, .. } if *target == id),
                "UpdateFailed",
            )?;
            let mut next = state.clone();
            next.in_flight = None;
            Ok(TransitionResult::new(next)
                .with_effect(ContentEffect::alert(alert_message(Mutation::Update, &error)))
                .published())
        }

        // ============================================================
        // Row menu
        // ============================================================
        ContentEvent::ToggleRowMenu { id } => {
            if state.record(id).is_none() {
                return Err(TransitionError::UnknownRecord(id));
            }
            let mut next = state.clone();
            next.row_menu = match state.row_menu {
                RowMenu::OpenFor { id: open } if open == id => RowMenu::Closed,
                _ => RowMenu::OpenFor { id },
            };
            Ok(TransitionResult::new(next).published())
        }

        // ============================================================
        // Delete
        // ============================================================
        ContentEvent::RequestRemove { id } => {
            if state.is_busy() {
                return Err(TransitionError::Busy);
            }
            let record = state.record(id).ok_or(TransitionError::UnknownRecord(id))?;
            let prompt = format!("Are you sure you want to delete \"{}\"?", record.title);

            let mut next = state.clone();
            next.confirming = Some(id);
            next.row_menu = RowMenu::Closed;
            Ok(TransitionResult::new(next)
                .published()
                .with_effect(ContentEffect::AskConfirmation { id, prompt }))
        }

        ContentEvent::ConfirmRemove => {
            let id = state.confirming.ok_or(TransitionError::NothingToConfirm)?;
            if state.is_busy() {
                return Err(TransitionError::Busy);
            }
            let mut next = state.clone();
            next.confirming = None;
            next.in_flight = Some(InFlight::Delete { id });
            Ok(TransitionResult::new(next)
                .published()
                .with_effect(ContentEffect::DeleteRecord { id }))
        }

        ContentEvent::DeclineRemove => {
            if state.confirming.is_none() {
                return Err(TransitionError::NothingToConfirm);
            }
            let mut next = state.clone();
            next.confirming = None;
            Ok(TransitionResult::new(next).published())
        }

        // Filter by id: positions may have shifted since the request
        ContentEvent::DeleteSucceeded {
            id,
            acknowledged_at,
        } => {
            expect_in_flight(
                state,
                |f| matches!(f, InFlight::Delete { id: pending } if *pending == id),
                "DeleteSucceeded",
            )?;
            let mut next = state.clone();
            next.cache.retain(|r| r.id != id);
            next.in_flight = None;
            if next.row_menu == (RowMenu::OpenFor { id }) {
                next.row_menu = RowMenu::Closed;
            }
            close_orphaned_editor(&mut next);
            next.notice_seq += 1;
            let seq = next.notice_seq;
            next.notice = Some(DeleteNotice {
                seq,
                acknowledged_at,
            });
            Ok(TransitionResult::new(next)
                .published()
                .with_effect(ContentEffect::ScheduleNoticeClear {
                    delay: context.notice_duration,
                    seq,
                }))
        }

        ContentEvent::DeleteFailed { id, error } => {
            expect_in_flight(
                state,
                |f| matches!(f, InFlight::Delete { id: pending } if *pending == id),
                "DeleteFailed",
            )?;
            let mut next = state.clone();
            next.in_flight = None;
            Ok(TransitionResult::new(next)
                .with_effect(ContentEffect::alert(alert_message(Mutation::Delete, &error)))
                .published())
        }

        // A timer for an older notice leaves a newer one alone
        ContentEvent::NoticeExpired { seq } => {
            let mut next = state.clone();
            match &state.notice {
                Some(notice) if notice.seq == seq => {
                    next.notice = None;
                    Ok(TransitionResult::new(next).published())
                }
                _ => Ok(TransitionResult::new(next)),
            }
        }
    }
}

// Helper functions

/// An edit whose target left the cache can never be committed
fn close_orphaned_editor(state: &mut ContentState) {
    if let EditorState::Editing { target, .. } = state.editor {
        if state.record(target).is_none() {
            state.editor = EditorState::Closed;
        }
    }
}

fn expect_in_flight(
    state: &ContentState,
    matches: impl Fn(&InFlight) -> bool,
    event_name: &str,
) -> Result<(), TransitionError> {
    match &state.in_flight {
        Some(in_flight) if matches(in_flight) => Ok(()),
        _ => Err(unexpected(event_name, state)),
    }
}

fn unexpected(event_name: &str, state: &ContentState) -> TransitionError {
    TransitionError::InvalidTransition(format!(
        "{event_name} while in flight: {:?}",
        state.in_flight
    ))
}

fn alert_message(mutation: Mutation, error: &RemoteError) -> &'static str {
    match (mutation, error.kind.is_rejected()) {
        (Mutation::Create, true) => "Failed to add content.",
        (Mutation::Create, false) => "Error submitting content.",
        (Mutation::Update, true) => "Failed to update content.",
        (Mutation::Update, false) => "Error updating content.",
        (Mutation::Delete, true) => "Failed to delete content.",
        (Mutation::Delete, false) => "Error deleting content.",
    }
}
