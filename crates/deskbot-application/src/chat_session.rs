//! Chat controller: message log, send cycle and session identifier lifecycle.

use deskbot_core::api::HelpdeskApi;
use deskbot_core::chat::{ChatImage, ChatMessage, Session};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Shown in place of the bot reply when the chat request fails.
pub const CHAT_ERROR_MESSAGE: &str = "⚠️ Error: Unable to get response from server.";
/// Shown when the backend answered without a reply text.
pub const EMPTY_REPLY_MESSAGE: &str = "No response received";

/// Result of a `send` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was sent: empty input, or a send is already in flight.
    Rejected,
    /// The bot reply was appended.
    Replied,
    /// The request failed; the fallback error message was appended.
    Failed,
}

/// Input buffer and pending image of the chat composer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub text: String,
    pub image: Option<ChatImage>,
}

/// Owns one conversation with the chatbot.
///
/// At most one chat request is in flight per session; further sends are
/// rejected rather than queued.
pub struct ChatSession {
    api: Arc<dyn HelpdeskApi>,
    session: RwLock<Session>,
    composer: Mutex<Composer>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the send settles, even if it is cancelled.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatSession {
    /// Creates a controller with a fresh session.
    pub fn new(api: Arc<dyn HelpdeskApi>) -> Self {
        Self {
            api,
            session: RwLock::new(Session::new()),
            composer: Mutex::new(Composer::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Starts a new chat: empties the log and issues a new session id.
    pub async fn start(&self) -> String {
        let mut session = self.session.write().await;
        *session = Session::new();
        tracing::info!(session_id = %session.id, "Started new chat session");
        session.id.clone()
    }

    pub async fn session_id(&self) -> String {
        self.session.read().await.id.clone()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.session.read().await.messages().to_vec()
    }

    /// Whether the escalation action is offered (last message is from the bot).
    pub async fn can_escalate(&self) -> bool {
        self.session.read().await.can_escalate()
    }

    /// True while a chat request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Input placeholder matching the loading state.
    pub fn placeholder(&self) -> &'static str {
        if self.is_loading() {
            "Waiting for response..."
        } else {
            "Type your message..."
        }
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.composer.lock().await.text = text.into();
    }

    pub async fn attach_image(&self, image: ChatImage) {
        self.composer.lock().await.image = Some(image);
    }

    pub async fn composer(&self) -> Composer {
        self.composer.lock().await.clone()
    }

    /// Sends the composer contents. The composer is cleared once the request
    /// settles; a rejected send leaves it untouched.
    pub async fn submit_input(&self) -> SendOutcome {
        let Composer { text, image } = self.composer.lock().await.clone();
        let outcome = self.send(&text, image).await;
        if outcome != SendOutcome::Rejected {
            *self.composer.lock().await = Composer::default();
        }
        outcome
    }

    /// Sends one chat turn.
    ///
    /// The user message is appended before the request is issued. Failures
    /// never propagate: they become a bot message carrying
    /// [`CHAT_ERROR_MESSAGE`].
    pub async fn send(&self, text: &str, image: Option<ChatImage>) -> SendOutcome {
        if text.trim().is_empty() && image.is_none() {
            return SendOutcome::Rejected;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Chat send ignored: a request is already in flight");
            return SendOutcome::Rejected;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let session_id = {
            let mut session = self.session.write().await;
            session.push(ChatMessage::user(text, image.as_ref()));
            session.id.clone()
        };

        let (reply, outcome) = match self.api.answer_chat(&session_id, text).await {
            Ok(reply) => (
                reply
                    .response
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY_MESSAGE.to_string()),
                SendOutcome::Replied,
            ),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Chat request failed");
                (CHAT_ERROR_MESSAGE.to_string(), SendOutcome::Failed)
            }
        };

        let mut session = self.session.write().await;
        if session.id == session_id {
            session.push(ChatMessage::bot(reply));
        } else {
            tracing::debug!(session_id = %session_id, "Dropping reply for a chat that was reset");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_api::MockApi;
    use deskbot_core::api::ChatReply;
    use deskbot_core::chat::Sender;
    use deskbot_core::error::DeskError;

    fn session_with(api: &Arc<MockApi>) -> Arc<ChatSession> {
        Arc::new(ChatSession::new(api.clone()))
    }

    #[tokio::test]
    async fn empty_send_is_noop() {
        let api = Arc::new(MockApi::new());
        let chat = session_with(&api);

        assert_eq!(chat.send("", None).await, SendOutcome::Rejected);
        assert_eq!(chat.send("   ", None).await, SendOutcome::Rejected);
        assert!(chat.messages().await.is_empty());
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn successful_send_appends_user_then_bot() {
        let api = Arc::new(MockApi::new());
        let chat = session_with(&api);

        assert_eq!(chat.send("hello", None).await, SendOutcome::Replied);

        let messages = chat.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "hello");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, "echo: hello");
        assert!(chat.can_escalate().await);
    }

    #[tokio::test]
    async fn image_only_send_is_accepted() {
        let api = Arc::new(MockApi::new());
        let chat = session_with(&api);

        let outcome = chat.send("", Some(ChatImage::new("/tmp/atm.png"))).await;
        assert_eq!(outcome, SendOutcome::Replied);
        let messages = chat.messages().await;
        assert_eq!(messages[0].image.as_deref(), Some("file:///tmp/atm.png"));
        assert_eq!(api.calls_to("answer_chat"), 1);
    }

    #[tokio::test]
    async fn failure_becomes_bot_error_message() {
        let api = Arc::new(MockApi::new());
        api.chat_replies
            .lock()
            .unwrap()
            .push_back(Err(DeskError::transport("connection reset")));
        let chat = session_with(&api);

        assert_eq!(chat.send("hello", None).await, SendOutcome::Failed);
        let messages = chat.messages().await;
        assert_eq!(messages.last().unwrap().text, CHAT_ERROR_MESSAGE);
        assert!(messages.last().unwrap().is_bot());
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn missing_reply_uses_placeholder_text() {
        let api = Arc::new(MockApi::new());
        api.chat_replies
            .lock()
            .unwrap()
            .push_back(Ok(ChatReply { response: None }));
        let chat = session_with(&api);

        chat.send("hello", None).await;
        assert_eq!(chat.messages().await[1].text, EMPTY_REPLY_MESSAGE);
    }

    #[tokio::test]
    async fn second_send_while_in_flight_is_rejected() {
        let api = Arc::new(MockApi::new());
        let release = api.gate_chat();
        let chat = session_with(&api);

        let first = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("first", None).await }
        });
        while !chat.is_loading() {
            tokio::task::yield_now().await;
        }

        // Optimistic user message is visible before the reply arrives.
        assert_eq!(chat.messages().await.len(), 1);
        assert_eq!(chat.placeholder(), "Waiting for response...");
        assert_eq!(chat.send("second", None).await, SendOutcome::Rejected);

        release.send(()).unwrap();
        assert_eq!(first.await.unwrap(), SendOutcome::Replied);

        assert_eq!(api.calls_to("answer_chat"), 1);
        let texts: Vec<String> = chat.messages().await.into_iter().map(|m| m.text).collect();
        assert_eq!(texts, ["first", "echo: first"]);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn composer_clears_only_after_settling() {
        let api = Arc::new(MockApi::new());
        let release = api.gate_chat();
        let chat = session_with(&api);
        chat.set_input("printer jammed").await;
        chat.attach_image(ChatImage::new("/tmp/p.png")).await;

        let pending = tokio::spawn({
            let chat = chat.clone();
            async move { chat.submit_input().await }
        });
        while !chat.is_loading() {
            tokio::task::yield_now().await;
        }
        assert_eq!(chat.composer().await.text, "printer jammed");

        release.send(()).unwrap();
        assert_eq!(pending.await.unwrap(), SendOutcome::Replied);
        assert_eq!(chat.composer().await, Composer::default());
    }

    #[tokio::test]
    async fn rejected_submit_keeps_composer() {
        let api = Arc::new(MockApi::new());
        let chat = session_with(&api);
        chat.set_input("  ").await;
        assert_eq!(chat.submit_input().await, SendOutcome::Rejected);
        assert_eq!(chat.composer().await.text, "  ");
    }

    #[tokio::test]
    async fn start_resets_log_and_id() {
        let api = Arc::new(MockApi::new());
        let chat = session_with(&api);
        chat.send("hello", None).await;
        let before = chat.session_id().await;

        let after = chat.start().await;
        assert_ne!(before, after);
        assert_eq!(chat.session_id().await, after);
        assert!(chat.messages().await.is_empty());
        assert!(!chat.can_escalate().await);
    }

    #[tokio::test]
    async fn reply_for_reset_chat_is_dropped() {
        let api = Arc::new(MockApi::new());
        let release = api.gate_chat();
        let chat = session_with(&api);

        let pending = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("old question", None).await }
        });
        while !chat.is_loading() {
            tokio::task::yield_now().await;
        }
        chat.start().await;
        release.send(()).unwrap();
        pending.await.unwrap();

        assert!(chat.messages().await.is_empty());
    }
}
