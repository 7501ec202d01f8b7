//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use crate::remote::{ContentDraft, ContentRecord, RecordId, RemoteError, RemoteExchange};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Remote
// ============================================================================

/// A call observed by a mock remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    List,
    Create(ContentDraft),
    Update(RecordId, ContentDraft),
    Delete(RecordId),
    Chat(String),
}

/// Mock remote that returns queued results, one queue per operation
#[derive(Default)]
pub struct MockRemote {
    lists: Mutex<VecDeque<Result<Vec<ContentRecord>, RemoteError>>>,
    writes: Mutex<VecDeque<Result<(), RemoteError>>>,
    replies: Mutex<VecDeque<Result<String, RemoteError>>>,
    /// Record of all calls made
    pub calls: Mutex<Vec<RemoteCall>>,
}

fn nothing_queued() -> RemoteError {
    RemoteError::transport("No mock response queued")
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_list(&self, result: Result<Vec<ContentRecord>, RemoteError>) {
        self.lists.lock().unwrap().push_back(result);
    }

    /// Queue the outcome of the next create, update or delete
    pub fn queue_write(&self, result: Result<(), RemoteError>) {
        self.writes.lock().unwrap().push_back(result);
    }

    pub fn queue_reply(&self, result: Result<String, RemoteError>) {
        self.replies.lock().unwrap().push_back(result);
    }

    pub fn recorded_calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_write(&self) -> Result<(), RemoteError> {
        self.writes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(nothing_queued()))
    }
}

#[async_trait]
impl RemoteExchange for MockRemote {
    async fn list_content(&self) -> Result<Vec<ContentRecord>, RemoteError> {
        self.record(RemoteCall::List);
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(nothing_queued()))
    }

    async fn create_content(&self, draft: &ContentDraft) -> Result<(), RemoteError> {
        self.record(RemoteCall::Create(draft.clone()));
        self.next_write()
    }

    async fn update_content(&self, id: RecordId, draft: &ContentDraft) -> Result<(), RemoteError> {
        self.record(RemoteCall::Update(id, draft.clone()));
        self.next_write()
    }

    async fn delete_content(&self, id: RecordId) -> Result<(), RemoteError> {
        self.record(RemoteCall::Delete(id));
        self.next_write()
    }

    async fn chat(&self, message: &str) -> Result<String, RemoteError> {
        self.record(RemoteCall::Chat(message.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(nothing_queued()))
    }
}

// ============================================================================
// Delayed Mock Remote (for in-flight testing)
// ============================================================================

/// Mock remote whose chat replies take a while
pub struct DelayedMockRemote {
    pub inner: MockRemote,
    delay: Duration,
    /// Notified when a chat request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockRemote {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockRemote::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl RemoteExchange for DelayedMockRemote {
    async fn list_content(&self) -> Result<Vec<ContentRecord>, RemoteError> {
        self.inner.list_content().await
    }

    async fn create_content(&self, draft: &ContentDraft) -> Result<(), RemoteError> {
        self.inner.create_content(draft).await
    }

    async fn update_content(&self, id: RecordId, draft: &ContentDraft) -> Result<(), RemoteError> {
        self.inner.update_content(id, draft).await
    }

    async fn delete_content(&self, id: RecordId) -> Result<(), RemoteError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_content(id).await
    }

    async fn chat(&self, message: &str) -> Result<String, RemoteError> {
        self.request_started.notify_waiters();
        tokio::time::sleep(self.delay).await;
        self.inner.chat(message).await
    }
}

// ============================================================================
// Test Runtime Helpers
// ============================================================================

use crate::content::{ContentContext, ContentView};
use crate::conversation::ChatView;
use crate::runtime::{
    ChatHandle, ChatRuntime, ChatViewEvent, ContentHandle, ContentRuntime, ContentViewEvent,
};
use tokio::sync::broadcast;

/// Conversation runtime wired to a mock, subscribed before the first event
pub struct TestChat<R: RemoteExchange + 'static> {
    pub handle: ChatHandle,
    pub remote: Arc<R>,
    pub events: broadcast::Receiver<ChatViewEvent>,
}

impl<R: RemoteExchange + 'static> TestChat<R> {
    pub fn new(remote: R) -> Self {
        let remote = Arc::new(remote);
        let handle = ChatRuntime::spawn(remote.clone());
        let events = handle.subscribe();
        Self {
            handle,
            remote,
            events,
        }
    }

    /// Wait for a snapshot satisfying `pred`
    pub async fn wait_for_view(
        &mut self,
        pred: impl Fn(&ChatView) -> bool,
        timeout: Duration,
    ) -> Option<ChatView> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.events.recv()).await {
                Ok(Ok(ChatViewEvent::Snapshot(view))) if pred(&view) => return Some(view),
                _ => continue,
            }
        }
        None
    }

    /// Wait for a rejection event with timeout
    pub async fn wait_for_rejection(&mut self, timeout: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.events.recv()).await {
                Ok(Ok(ChatViewEvent::Rejected { message })) => return Some(message),
                _ => continue,
            }
        }
        None
    }
}

/// Content runtime wired to a mock, subscribed before the first event
pub struct TestContent<R: RemoteExchange + 'static> {
    pub handle: ContentHandle,
    pub remote: Arc<R>,
    pub events: broadcast::Receiver<ContentViewEvent>,
}

impl<R: RemoteExchange + 'static> TestContent<R> {
    pub fn new(remote: R) -> Self {
        Self::with_context(remote, ContentContext::default())
    }

    pub fn with_context(remote: R, context: ContentContext) -> Self {
        let remote = Arc::new(remote);
        let handle = ContentRuntime::spawn(context, remote.clone());
        let events = handle.subscribe();
        Self {
            handle,
            remote,
            events,
        }
    }

    /// Wait for any view event satisfying `pred`
    pub async fn wait_for(
        &mut self,
        pred: impl Fn(&ContentViewEvent) -> bool,
        timeout: Duration,
    ) -> Option<ContentViewEvent> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.events.recv()).await {
                Ok(Ok(event)) if pred(&event) => return Some(event),
                _ => continue,
            }
        }
        None
    }

    /// Wait for a snapshot satisfying `pred`
    pub async fn wait_for_view(
        &mut self,
        pred: impl Fn(&ContentView) -> bool,
        timeout: Duration,
    ) -> Option<ContentView> {
        let event = self
            .wait_for(
                |e| matches!(e, ContentViewEvent::Snapshot(view) if pred(view)),
                timeout,
            )
            .await?;
        match event {
            ContentViewEvent::Snapshot(view) => Some(view),
            _ => None,
        }
    }

    /// Activate and wait until the first load settles
    pub async fn activate_and_settle(&mut self) -> Option<ContentView> {
        self.handle.activate().await.unwrap();
        self.wait_for_view(|v| !v.busy, Duration::from_secs(2)).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::state::{ASK_OWN_PROMPT, FALLBACK_REPLY, GREETING};
    use crate::conversation::Origin;

    const WAIT: Duration = Duration::from_secs(2);

    fn last_text(view: &ChatView) -> Option<&str> {
        view.transcript.last().map(|t| t.text.as_str())
    }

    #[tokio::test]
    async fn test_mock_remote_queues_and_records() {
        let mock = MockRemote::new();
        mock.queue_reply(Ok("hi".to_string()));

        assert_eq!(mock.chat("hello").await.unwrap(), "hi");
        assert!(mock.chat("again").await.is_err());
        assert!(mock.delete_content(RecordId(1)).await.is_err());
        assert_eq!(
            mock.recorded_calls(),
            vec![
                RemoteCall::Chat("hello".into()),
                RemoteCall::Chat("again".into()),
                RemoteCall::Delete(RecordId(1)),
            ]
        );
    }

    // ------------------------------------------------------------------------
    // Conversation
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_open_greets_with_menu() {
        let mut rt = TestChat::new(MockRemote::new());
        rt.handle.open().await.unwrap();

        let view = rt.wait_for_view(|v| v.visible, WAIT).await.unwrap();
        assert_eq!(view.transcript.len(), 2);
        assert_eq!(view.transcript[0].text, GREETING);
        assert_eq!(view.transcript[1].options.len(), 4);
        assert!(view.input_enabled);
    }

    #[tokio::test]
    async fn test_menu_pick_round_trip() {
        let remote = MockRemote::new();
        remote.queue_reply(Ok("Reset link sent".to_string()));

        let mut rt = TestChat::new(remote);
        rt.handle.open().await.unwrap();
        rt.handle.select_option("Lost Password").await.unwrap();

        let view = rt
            .wait_for_view(|v| last_text(v) == Some("Reset link sent"), WAIT)
            .await
            .expect("reply should replace the placeholder");

        assert!(view.input_enabled);
        let texts: Vec<&str> = view.transcript.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts[2..], ["Lost Password", "Reset link sent"]);
        assert_eq!(view.transcript[2].origin, Origin::User);
        assert_eq!(
            rt.remote.recorded_calls(),
            vec![RemoteCall::Chat("Lost Password".into())]
        );
    }

    #[tokio::test]
    async fn test_failed_reply_shows_fallback() {
        let remote = MockRemote::new();
        remote.queue_reply(Err(RemoteError::rejected(500, "boom")));

        let mut rt = TestChat::new(remote);
        rt.handle.open().await.unwrap();
        rt.handle.select_option("Delete Account").await.unwrap();

        let view = rt
            .wait_for_view(|v| last_text(v) == Some(FALLBACK_REPLY), WAIT)
            .await;
        assert!(view.is_some_and(|v| v.input_enabled));
    }

    #[tokio::test]
    async fn test_scripted_submit_issues_no_call() {
        let mut rt = TestChat::new(MockRemote::new());
        rt.handle.open().await.unwrap();
        rt.handle.submit("hi").await.unwrap();

        let view = rt
            .wait_for_view(|v| last_text(v) == Some("hi"), WAIT)
            .await
            .unwrap();
        assert_eq!(view.transcript.len(), 3);
        assert!(rt.remote.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_freeform_after_ask_own() {
        let remote = MockRemote::new();
        remote.queue_reply(Ok("Sure thing".to_string()));

        let mut rt = TestChat::new(remote);
        rt.handle.open().await.unwrap();
        rt.handle.select_option("Ask My Own Question").await.unwrap();
        rt.wait_for_view(|v| last_text(v) == Some(ASK_OWN_PROMPT), WAIT)
            .await
            .unwrap();

        rt.handle.submit("Where is my order?").await.unwrap();
        rt.wait_for_view(|v| last_text(v) == Some("Sure thing"), WAIT)
            .await
            .unwrap();

        assert_eq!(
            rt.remote.recorded_calls(),
            vec![RemoteCall::Chat("Where is my order?".into())]
        );
    }

    #[tokio::test]
    async fn test_send_rejected_while_reply_pending() {
        let remote = DelayedMockRemote::new(Duration::from_millis(200));
        remote.inner.queue_reply(Ok("done".to_string()));

        let mut rt = TestChat::new(remote);
        let request_started = rt.remote.request_started.clone();
        // Registered before the send so the notification cannot be missed
        let started = request_started.notified();

        rt.handle.open().await.unwrap();
        rt.handle.select_option("Lost Password").await.unwrap();
        tokio::time::timeout(WAIT, started)
            .await
            .expect("chat request should start");

        rt.handle.select_option("Withdraw My Money").await.unwrap();
        assert!(rt.wait_for_rejection(WAIT).await.is_some());

        rt.wait_for_view(|v| last_text(v) == Some("done"), WAIT)
            .await
            .unwrap();
        assert_eq!(
            rt.remote.inner.recorded_calls(),
            vec![RemoteCall::Chat("Lost Password".into())]
        );
    }

    // ------------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------------

    fn record(id: i64, title: &str) -> ContentRecord {
        ContentRecord::new(id, title, format!("{title} text"))
    }

    #[tokio::test]
    async fn test_activate_loads_records() {
        let remote = MockRemote::new();
        remote.queue_list(Ok(vec![record(1, "A"), record(2, "B")]));

        let mut rt = TestContent::new(remote);
        let view = rt.activate_and_settle().await.unwrap();
        assert_eq!(view.records.len(), 2);
        assert_eq!(rt.remote.recorded_calls(), vec![RemoteCall::List]);
    }

    #[tokio::test]
    async fn test_load_failure_is_silent() {
        let remote = MockRemote::new();
        remote.queue_list(Err(RemoteError::transport("down")));

        let mut rt = TestContent::new(remote);
        let view = rt.activate_and_settle().await.unwrap();
        assert!(view.records.is_empty());
        assert!(view.notice.is_none());
    }

    /// Log sink for asserting on emitted JSON lines
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl CapturedLogs {
        fn lines_at(&self, level: &str) -> Vec<String> {
            let needle = format!("\"level\":\"{level}\"");
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .filter(|line| line.contains(&needle))
                .map(ToString::to_string)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_load_failure_logged_once_at_error() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let remote = MockRemote::new();
        remote.queue_list(Err(RemoteError::transport("down")));

        let mut rt = TestContent::new(crate::remote::LoggingRemote::new(remote));
        rt.activate_and_settle().await.unwrap();

        let errors = logs.lines_at("ERROR");
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("list_content"));

        let warnings = logs.lines_at("WARN");
        assert!(warnings.iter().any(|line| line.contains("\"operation\":\"load\"")));
    }

    #[tokio::test]
    async fn test_write_logged_before_and_after_call() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let remote = MockRemote::new();
        remote.queue_write(Ok(()));
        let remote = crate::remote::LoggingRemote::new(remote);
        remote.delete_content(RecordId(4)).await.unwrap();

        let debug = logs.lines_at("DEBUG");
        let info = logs.lines_at("INFO");
        assert!(debug[0].contains("Issuing delete"));
        assert!(info[0].contains("delete_content"));

        let all = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let issued = all.find("Issuing delete").unwrap();
        let completed = all.find("Remote call completed").unwrap();
        assert!(issued < completed);
    }

    #[tokio::test]
    async fn test_create_refetches_list() {
        let remote = MockRemote::new();
        remote.queue_list(Ok(vec![]));
        remote.queue_write(Ok(()));
        remote.queue_list(Ok(vec![record(9, "New")]));

        let mut rt = TestContent::new(remote);
        rt.activate_and_settle().await.unwrap();

        rt.handle.begin_create().await.unwrap();
        rt.handle.edit_title("New").await.unwrap();
        rt.handle.edit_text("New text").await.unwrap();
        rt.handle.commit().await.unwrap();

        let view = rt
            .wait_for_view(|v| v.records.len() == 1 && !v.busy, WAIT)
            .await
            .unwrap();
        assert!(view.editor.is_none());
        assert_eq!(
            rt.remote.recorded_calls(),
            vec![
                RemoteCall::List,
                RemoteCall::Create(ContentDraft::new("New", "New text")),
                RemoteCall::List,
            ]
        );
    }

    #[tokio::test]
    async fn test_commit_with_blank_field_is_rejected() {
        let remote = MockRemote::new();
        remote.queue_list(Ok(vec![]));

        let mut rt = TestContent::new(remote);
        rt.activate_and_settle().await.unwrap();

        rt.handle.begin_create().await.unwrap();
        rt.handle.edit_text("body only").await.unwrap();
        rt.handle.commit().await.unwrap();

        let rejected = rt
            .wait_for(|e| matches!(e, ContentViewEvent::Rejected { .. }), WAIT)
            .await;
        assert!(rejected.is_some());
        assert_eq!(rt.remote.recorded_calls(), vec![RemoteCall::List]);
    }

    #[tokio::test]
    async fn test_edit_updates_in_place() {
        let remote = MockRemote::new();
        remote.queue_list(Ok(vec![record(1, "A"), record(2, "B")]));
        remote.queue_write(Ok(()));

        let mut rt = TestContent::new(remote);
        rt.activate_and_settle().await.unwrap();

        rt.handle.begin_edit(RecordId(2)).await.unwrap();
        rt.handle.edit_title("B2").await.unwrap();
        rt.handle.commit().await.unwrap();

        let view = rt
            .wait_for_view(|v| v.editor.is_none() && !v.busy, WAIT)
            .await
            .unwrap();
        assert_eq!(view.records[0].title, "A");
        assert_eq!(view.records[1].title, "B2");
        assert_eq!(view.records[1].text, "B text");
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_record() {
        let remote = MockRemote::new();
        remote.queue_list(Ok(vec![record(7, "Seven")]));
        remote.queue_write(Err(RemoteError::rejected(500, "nope")));

        let mut rt = TestContent::new(remote);
        rt.activate_and_settle().await.unwrap();

        rt.handle.toggle_row_menu(RecordId(7)).await.unwrap();
        rt.handle.request_remove(RecordId(7)).await.unwrap();
        let asked = rt
            .wait_for(
                |e| matches!(e, ContentViewEvent::ConfirmationRequested { .. }),
                WAIT,
            )
            .await;
        assert!(asked.is_some());

        rt.handle.confirm_remove().await.unwrap();
        let alert = rt
            .wait_for(|e| matches!(e, ContentViewEvent::Alert { .. }), WAIT)
            .await;
        match alert {
            Some(ContentViewEvent::Alert { message }) => {
                assert_eq!(message, "Failed to delete content.");
            }
            other => panic!("expected alert, got {other:?}"),
        }

        let view = rt.wait_for_view(|v| !v.busy, WAIT).await.unwrap();
        assert_eq!(view.records.len(), 1);
        assert!(view.notice.is_none());
    }

    #[tokio::test]
    async fn test_declined_remove_issues_no_call() {
        let remote = MockRemote::new();
        remote.queue_list(Ok(vec![record(7, "Seven")]));

        let mut rt = TestContent::new(remote);
        rt.activate_and_settle().await.unwrap();

        rt.handle.request_remove(RecordId(7)).await.unwrap();
        rt.handle.decline_remove().await.unwrap();
        rt.wait_for_view(|v| v.records.len() == 1, WAIT).await.unwrap();

        assert_eq!(rt.remote.recorded_calls(), vec![RemoteCall::List]);
    }

    #[tokio::test]
    async fn test_delete_notice_clears_itself() {
        let remote = MockRemote::new();
        remote.queue_list(Ok(vec![record(1, "A"), record(2, "B")]));
        remote.queue_write(Ok(()));

        let context = ContentContext::new(Duration::from_millis(100));
        let mut rt = TestContent::with_context(remote, context);
        rt.activate_and_settle().await.unwrap();

        rt.handle.request_remove(RecordId(1)).await.unwrap();
        rt.handle.confirm_remove().await.unwrap();

        let shown = rt
            .wait_for_view(|v| v.notice.is_some(), WAIT)
            .await
            .unwrap();
        assert_eq!(shown.records, vec![record(2, "B")]);

        let cleared = rt.wait_for_view(|v| v.notice.is_none(), WAIT).await;
        assert!(cleared.is_some());
    }

    #[tokio::test]
    async fn test_second_confirm_while_deleting_is_rejected() {
        let remote = DelayedMockRemote::new(Duration::from_millis(200));
        remote.inner.queue_list(Ok(vec![record(1, "A"), record(2, "B")]));
        remote.inner.queue_write(Ok(()));

        let mut rt = TestContent::new(remote);
        rt.activate_and_settle().await.unwrap();

        rt.handle.request_remove(RecordId(1)).await.unwrap();
        rt.handle.confirm_remove().await.unwrap();
        rt.handle.request_remove(RecordId(2)).await.unwrap();

        let rejected = rt
            .wait_for(|e| matches!(e, ContentViewEvent::Rejected { .. }), WAIT)
            .await;
        assert!(rejected.is_some());

        let view = rt
            .wait_for_view(|v| v.records.len() == 1 && !v.busy, WAIT)
            .await
            .unwrap();
        assert_eq!(view.records[0].id, RecordId(2));
        assert_eq!(
            rt.remote.inner.recorded_calls(),
            vec![RemoteCall::List, RemoteCall::Delete(RecordId(1))]
        );
    }
}
