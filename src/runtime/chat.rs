//! Conversation runtime executor

use crate::conversation::{transition, ChatEffect, ChatEvent, ChatState, ChatView};
use crate::remote::RemoteExchange;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Events sent to conversation subscribers
#[derive(Debug, Clone)]
pub enum ChatViewEvent {
    Snapshot(ChatView),
    /// A user action the engine refused, e.g. sending while a reply is pending
    Rejected { message: String },
}

/// Conversation runtime, generic over the remote so tests can inject mocks
pub struct ChatRuntime<R>
where
    R: RemoteExchange + 'static,
{
    state: ChatState,
    remote: Arc<R>,
    event_rx: mpsc::Receiver<ChatEvent>,
    event_tx: mpsc::Sender<ChatEvent>,
    broadcast_tx: broadcast::Sender<ChatViewEvent>,
}

impl<R> ChatRuntime<R>
where
    R: RemoteExchange + 'static,
{
    pub fn new(
        remote: Arc<R>,
        event_rx: mpsc::Receiver<ChatEvent>,
        event_tx: mpsc::Sender<ChatEvent>,
        broadcast_tx: broadcast::Sender<ChatViewEvent>,
    ) -> Self {
        Self {
            state: ChatState::default(),
            remote,
            event_rx,
            event_tx,
            broadcast_tx,
        }
    }

    /// Start a runtime in the background and return its handle
    pub fn spawn(remote: Arc<R>) -> ChatHandle {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);

        let runtime = Self::new(remote, event_rx, event_tx.clone(), broadcast_tx.clone());
        tokio::spawn(runtime.run());

        ChatHandle {
            event_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting conversation runtime");

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.process_event(event) {
                tracing::debug!(error = %e, "Conversation event rejected");
                let _ = self.broadcast_tx.send(ChatViewEvent::Rejected { message: e });
            }
        }

        tracing::info!("Conversation runtime stopped");
    }

    fn process_event(&mut self, event: ChatEvent) -> Result<(), String> {
        let result = transition(&self.state, event).map_err(|e| e.to_string())?;
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    fn execute_effect(&self, effect: ChatEffect) {
        match effect {
            ChatEffect::PublishView => {
                let _ = self
                    .broadcast_tx
                    .send(ChatViewEvent::Snapshot(ChatView::from(&self.state)));
            }

            ChatEffect::RequestReply {
                exchange_id,
                message,
            } => {
                let remote = self.remote.clone();
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    tracing::info!(%exchange_id, "Requesting chat reply (background)");
                    let event = match remote.chat(&message).await {
                        Ok(text) => ChatEvent::ReplyReceived { exchange_id, text },
                        Err(error) => {
                            tracing::warn!(
                                %exchange_id,
                                kind = error.kind.label(),
                                error = %error.message,
                                "Chat reply failed"
                            );
                            ChatEvent::ReplyFailed { exchange_id, error }
                        }
                    };
                    let _ = event_tx.send(event).await;
                });
            }
        }
    }
}

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ChatHandle {
    event_tx: mpsc::Sender<ChatEvent>,
    broadcast_tx: broadcast::Sender<ChatViewEvent>,
}

impl ChatHandle {
    pub async fn send(&self, event: ChatEvent) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    pub async fn open(&self) -> Result<(), String> {
        self.send(ChatEvent::Open).await
    }

    pub async fn close(&self) -> Result<(), String> {
        self.send(ChatEvent::Close).await
    }

    pub async fn select_option(&self, label: impl Into<String>) -> Result<(), String> {
        self.send(ChatEvent::select_option(label)).await
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<(), String> {
        self.send(ChatEvent::submit_freeform(text)).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatViewEvent> {
        self.broadcast_tx.subscribe()
    }
}
