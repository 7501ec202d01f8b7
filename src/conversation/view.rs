//! Render-ready snapshot of a conversation

use super::state::{ChatState, ConversationMode, Origin, Turn, MENU_OPTIONS};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnView {
    pub text: String,
    pub origin: Origin,
    /// Choice buttons rendered under this turn; empty for all but the menu prompt
    pub options: Vec<String>,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        let options = if turn.shows_menu() {
            MENU_OPTIONS.iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        };
        Self {
            text: turn.text.clone(),
            origin: turn.origin,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatView {
    pub visible: bool,
    pub mode: ConversationMode,
    /// False while a reply is pending; the send affordances must be disabled
    pub input_enabled: bool,
    pub transcript: Vec<TurnView>,
}

impl From<&ChatState> for ChatView {
    fn from(state: &ChatState) -> Self {
        Self {
            visible: state.visible,
            mode: state.mode,
            input_enabled: state.input_enabled(),
            transcript: state.transcript.iter().map(TurnView::from).collect(),
        }
    }
}
