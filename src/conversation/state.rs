//! Conversation state types

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const GREETING: &str = "Hello! How may I assist you?";
pub const MENU_PROMPT: &str = "Please choose an option:";
pub const ASK_OWN_QUESTION: &str = "Ask My Own Question";
pub const ASK_OWN_PROMPT: &str = "Please type your message in the input so I can assist you.";
pub const PLACEHOLDER_TEXT: &str = "Typing...";
pub const FALLBACK_REPLY: &str = "Error fetching response";

/// Choices attached to the menu prompt turn, in display order
pub const MENU_OPTIONS: [&str; 4] = [
    "Lost Password",
    "Delete Account",
    "Withdraw My Money",
    ASK_OWN_QUESTION,
];

// ============================================================================
// Exchange correlation
// ============================================================================

/// Correlates a placeholder turn with the remote reply that resolves it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeId(Uuid);

impl ExchangeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Transcript
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Bot,
    User,
}

/// What a turn is, beyond its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnKind {
    Message,
    /// The one turn that carries the choice affordances
    MenuPrompt,
    /// Stand-in for a reply that has not arrived yet
    Placeholder { exchange_id: ExchangeId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub text: String,
    pub origin: Origin,
    pub kind: TurnKind,
}

impl Turn {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::Bot,
            kind: TurnKind::Message,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::User,
            kind: TurnKind::Message,
        }
    }

    pub fn menu_prompt() -> Self {
        Self {
            text: MENU_PROMPT.to_string(),
            origin: Origin::Bot,
            kind: TurnKind::MenuPrompt,
        }
    }

    pub fn placeholder(exchange_id: ExchangeId) -> Self {
        Self {
            text: PLACEHOLDER_TEXT.to_string(),
            origin: Origin::Bot,
            kind: TurnKind::Placeholder { exchange_id },
        }
    }

    pub fn is_placeholder_for(&self, id: ExchangeId) -> bool {
        matches!(self.kind, TurnKind::Placeholder { exchange_id } if exchange_id == id)
    }

    /// Menu display is tied to the prompt turn itself, never to its text
    pub fn shows_menu(&self) -> bool {
        self.kind == TurnKind::MenuPrompt
    }
}

// ============================================================================
// Conversation State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationMode {
    /// Only menu picks reach the remote
    #[default]
    Scripted,
    /// Typed questions reach the remote too; never reverts
    Freeform,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatState {
    pub transcript: Vec<Turn>,
    pub mode: ConversationMode,
    /// The exchange whose reply is outstanding, if any
    pub pending: Option<ExchangeId>,
    /// Whether the widget is shown
    pub visible: bool,
}

impl ChatState {
    pub fn is_reply_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Send affordances are disabled while a reply is outstanding
    pub fn input_enabled(&self) -> bool {
        !self.is_reply_pending()
    }
}
