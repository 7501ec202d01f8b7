//! Content sync runtime executor

use crate::content::{
    transition, ContentContext, ContentEffect, ContentEvent, ContentState, ContentView,
};
use crate::remote::{RecordId, RemoteExchange};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Events sent to content subscribers
#[derive(Debug, Clone)]
pub enum ContentViewEvent {
    Snapshot(ContentView),
    /// Yes/no question that must be answered with confirm or decline
    ConfirmationRequested { id: RecordId, prompt: String },
    /// Blocking error the user has to acknowledge
    Alert { message: String },
    /// A user action the engine refused
    Rejected { message: String },
}

/// Content runtime, generic over the remote so tests can inject mocks
pub struct ContentRuntime<R>
where
    R: RemoteExchange + 'static,
{
    context: ContentContext,
    state: ContentState,
    remote: Arc<R>,
    event_rx: mpsc::Receiver<ContentEvent>,
    event_tx: mpsc::Sender<ContentEvent>,
    broadcast_tx: broadcast::Sender<ContentViewEvent>,
}

impl<R> ContentRuntime<R>
where
    R: RemoteExchange + 'static,
{
    pub fn new(
        context: ContentContext,
        remote: Arc<R>,
        event_rx: mpsc::Receiver<ContentEvent>,
        event_tx: mpsc::Sender<ContentEvent>,
        broadcast_tx: broadcast::Sender<ContentViewEvent>,
    ) -> Self {
        Self {
            context,
            state: ContentState::default(),
            remote,
            event_rx,
            event_tx,
            broadcast_tx,
        }
    }

    /// Start a runtime in the background and return its handle
    pub fn spawn(context: ContentContext, remote: Arc<R>) -> ContentHandle {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);

        let runtime = Self::new(
            context,
            remote,
            event_rx,
            event_tx.clone(),
            broadcast_tx.clone(),
        );
        tokio::spawn(runtime.run());

        ContentHandle {
            event_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting content runtime");

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.process_event(event) {
                tracing::debug!(error = %e, "Content event rejected");
                let _ = self
                    .broadcast_tx
                    .send(ContentViewEvent::Rejected { message: e });
            }
        }

        tracing::info!("Content runtime stopped");
    }

    fn process_event(&mut self, event: ContentEvent) -> Result<(), String> {
        let result =
            transition(&self.state, &self.context, event).map_err(|e| e.to_string())?;
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    fn execute_effect(&self, effect: ContentEffect) {
        match effect {
            ContentEffect::PublishView => {
                let _ = self
                    .broadcast_tx
                    .send(ContentViewEvent::Snapshot(ContentView::from(&self.state)));
            }

            ContentEffect::FetchAll => {
                self.spawn_remote(|remote| async move {
                    match remote.list_content().await {
                        Ok(records) => ContentEvent::Loaded { records },
                        Err(error) => ContentEvent::LoadFailed { error },
                    }
                });
            }

            ContentEffect::CreateRecord { draft } => {
                self.spawn_remote(|remote| async move {
                    match remote.create_content(&draft).await {
                        Ok(()) => ContentEvent::CreateSucceeded,
                        Err(error) => ContentEvent::CreateFailed { error },
                    }
                });
            }

            ContentEffect::UpdateRecord { id, draft } => {
                self.spawn_remote(move |remote| async move {
                    match remote.update_content(id, &draft).await {
                        Ok(()) => ContentEvent::UpdateSucceeded { id },
                        Err(error) => ContentEvent::UpdateFailed { id, error },
                    }
                });
            }

            ContentEffect::DeleteRecord { id } => {
                self.spawn_remote(move |remote| async move {
                    match remote.delete_content(id).await {
                        Ok(()) => ContentEvent::DeleteSucceeded {
                            id,
                            acknowledged_at: chrono::Utc::now(),
                        },
                        Err(error) => ContentEvent::DeleteFailed { id, error },
                    }
                });
            }

            ContentEffect::AskConfirmation { id, prompt } => {
                let _ = self
                    .broadcast_tx
                    .send(ContentViewEvent::ConfirmationRequested { id, prompt });
            }

            ContentEffect::Alert { message } => {
                tracing::warn!(message = %message, "Alerting user");
                let _ = self.broadcast_tx.send(ContentViewEvent::Alert { message });
            }

            ContentEffect::LogFailure { operation, error } => {
                tracing::warn!(
                    operation,
                    kind = error.kind.label(),
                    error = %error.message,
                    "Remote operation failed, not shown to user"
                );
            }

            ContentEffect::ScheduleNoticeClear { delay, seq } => {
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = event_tx.send(ContentEvent::NoticeExpired { seq }).await;
                });
            }
        }
    }

    /// Run one remote call in the background and feed its outcome back in
    fn spawn_remote<F, Fut>(&self, call: F)
    where
        F: FnOnce(Arc<R>) -> Fut,
        Fut: std::future::Future<Output = ContentEvent> + Send + 'static,
    {
        let event_tx = self.event_tx.clone();
        let fut = call(self.remote.clone());
        tokio::spawn(async move {
            let event = fut.await;
            let _ = event_tx.send(event).await;
        });
    }
}

/// Handle to interact with a running content engine
#[derive(Clone)]
pub struct ContentHandle {
    event_tx: mpsc::Sender<ContentEvent>,
    broadcast_tx: broadcast::Sender<ContentViewEvent>,
}

impl ContentHandle {
    pub async fn send(&self, event: ContentEvent) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    pub async fn activate(&self) -> Result<(), String> {
        self.send(ContentEvent::Activate).await
    }

    pub async fn begin_create(&self) -> Result<(), String> {
        self.send(ContentEvent::BeginCreate).await
    }

    pub async fn begin_edit(&self, id: RecordId) -> Result<(), String> {
        self.send(ContentEvent::BeginEdit { id }).await
    }

    pub async fn edit_title(&self, title: impl Into<String>) -> Result<(), String> {
        self.send(ContentEvent::edit_title(title)).await
    }

    pub async fn edit_text(&self, text: impl Into<String>) -> Result<(), String> {
        self.send(ContentEvent::edit_text(text)).await
    }

    pub async fn commit(&self) -> Result<(), String> {
        self.send(ContentEvent::Commit).await
    }

    pub async fn cancel(&self) -> Result<(), String> {
        self.send(ContentEvent::Cancel).await
    }

    pub async fn toggle_row_menu(&self, id: RecordId) -> Result<(), String> {
        self.send(ContentEvent::ToggleRowMenu { id }).await
    }

    pub async fn request_remove(&self, id: RecordId) -> Result<(), String> {
        self.send(ContentEvent::RequestRemove { id }).await
    }

    pub async fn confirm_remove(&self) -> Result<(), String> {
        self.send(ContentEvent::ConfirmRemove).await
    }

    pub async fn decline_remove(&self) -> Result<(), String> {
        self.send(ContentEvent::DeclineRemove).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContentViewEvent> {
        self.broadcast_tx.subscribe()
    }
}
