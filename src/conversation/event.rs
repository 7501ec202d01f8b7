//! Events that can occur in a conversation

use super::state::ExchangeId;
use crate::remote::RemoteError;

/// Events that trigger conversation transitions
#[derive(Debug, Clone)]
pub enum ChatEvent {
    // User events
    Open,
    Close,
    SelectOption {
        label: String,
        exchange_id: ExchangeId,
    },
    SubmitFreeform {
        text: String,
        exchange_id: ExchangeId,
    },

    // Remote events
    ReplyReceived {
        exchange_id: ExchangeId,
        text: String,
    },
    ReplyFailed {
        exchange_id: ExchangeId,
        error: RemoteError,
    },
}

impl ChatEvent {
    pub fn select_option(label: impl Into<String>) -> Self {
        Self::SelectOption {
            label: label.into(),
            exchange_id: ExchangeId::new(),
        }
    }

    pub fn submit_freeform(text: impl Into<String>) -> Self {
        Self::SubmitFreeform {
            text: text.into(),
            exchange_id: ExchangeId::new(),
        }
    }
}
