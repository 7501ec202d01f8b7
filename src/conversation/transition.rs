//! Pure conversation transition function

use super::state::{
    ChatState, ConversationMode, ExchangeId, Turn, ASK_OWN_PROMPT, ASK_OWN_QUESTION,
    FALLBACK_REPLY, GREETING,
};
use super::{ChatEffect, ChatEvent};
use thiserror::Error;

/// Result of a conversation transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<ChatEffect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: ChatEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during a conversation transition
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still pending, wait for it before sending again")]
    ReplyPending,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("No pending exchange {0}")]
    UnknownExchange(ExchangeId),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; remote I/O is
/// requested through [`ChatEffect::RequestReply`] and its outcome comes back
/// as a `ReplyReceived` or `ReplyFailed` event.
pub fn transition(state: &ChatState, event: ChatEvent) -> Result<TransitionResult, TransitionError> {
    match event {
        ChatEvent::Open => {
            let mut next = state.clone();
            next.visible = true;
            if next.transcript.is_empty() {
                next.transcript.push(Turn::bot(GREETING));
                next.transcript.push(Turn::menu_prompt());
            }
            Ok(TransitionResult::new(next).with_effect(ChatEffect::PublishView))
        }

        ChatEvent::Close => {
            let mut next = state.clone();
            next.visible = false;
            Ok(TransitionResult::new(next).with_effect(ChatEffect::PublishView))
        }

        // Every send is gated on the single pending slot
        ChatEvent::SelectOption { .. } | ChatEvent::SubmitFreeform { .. }
            if state.is_reply_pending() =>
        {
            Err(TransitionError::ReplyPending)
        }

        ChatEvent::SelectOption { label, exchange_id } => {
            let mut next = state.clone();
            next.transcript.push(Turn::user(label.clone()));

            if label == ASK_OWN_QUESTION {
                next.mode = ConversationMode::Freeform;
                next.transcript.push(Turn::bot(ASK_OWN_PROMPT));
                return Ok(TransitionResult::new(next).with_effect(ChatEffect::PublishView));
            }

            Ok(start_exchange(next, exchange_id, label))
        }

        ChatEvent::SubmitFreeform { text, exchange_id } => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }

            let mut next = state.clone();
            next.transcript.push(Turn::user(text));

            match next.mode {
                // Recorded but inert until the user asks their own question
                ConversationMode::Scripted => {
                    Ok(TransitionResult::new(next).with_effect(ChatEffect::PublishView))
                }
                ConversationMode::Freeform => Ok(start_exchange(next, exchange_id, text)),
            }
        }

        ChatEvent::ReplyReceived { exchange_id, text } => {
            resolve_exchange(state, exchange_id, Turn::bot(text))
        }

        ChatEvent::ReplyFailed { exchange_id, .. } => {
            resolve_exchange(state, exchange_id, Turn::bot(FALLBACK_REPLY))
        }
    }
}

// Helper functions

fn start_exchange(mut next: ChatState, exchange_id: ExchangeId, message: impl Into<String>) -> TransitionResult {
    next.pending = Some(exchange_id);
    next.transcript.push(Turn::placeholder(exchange_id));
    TransitionResult::new(next)
        .with_effect(ChatEffect::PublishView)
        .with_effect(ChatEffect::request_reply(exchange_id, message))
}

fn resolve_exchange(
    state: &ChatState,
    exchange_id: ExchangeId,
    resolved: Turn,
) -> Result<TransitionResult, TransitionError> {
    if state.pending != Some(exchange_id) {
        return Err(TransitionError::UnknownExchange(exchange_id));
    }

    let mut next = state.clone();
    let Some(slot) = next
        .transcript
        .iter_mut()
        .rev()
        .find(|turn| turn.is_placeholder_for(exchange_id))
    else {
        return Err(TransitionError::InvalidTransition(format!(
            "exchange {exchange_id} is pending but has no placeholder"
        )));
    };

    *slot = resolved;
    next.pending = None;
    Ok(TransitionResult::new(next).with_effect(ChatEffect::PublishView))
}
