//! Effects produced by conversation transitions

use super::state::ExchangeId;

/// Effects to be executed after a conversation transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEffect {
    /// Publish a fresh view snapshot to subscribers
    PublishView,

    /// `POST /chat` with `message`; the outcome re-enters as a reply event
    RequestReply {
        exchange_id: ExchangeId,
        message: String,
    },
}

impl ChatEffect {
    pub fn request_reply(exchange_id: ExchangeId, message: impl Into<String>) -> Self {
        ChatEffect::RequestReply {
            exchange_id,
            message: message.into(),
        }
    }
}
