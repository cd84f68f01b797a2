//! Admin knowledge injection form.

use crate::notice::Notice;
use deskbot_core::api::{HelpdeskApi, KnowledgeRequest};
use deskbot_core::chat::new_record_id;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct KnowledgeState {
    open: bool,
    text: String,
    submitting: bool,
}

/// Submits free text to the chatbot's knowledge base.
pub struct KnowledgeInjection {
    api: Arc<dyn HelpdeskApi>,
    state: Mutex<KnowledgeState>,
}

impl KnowledgeInjection {
    pub fn new(api: Arc<dyn HelpdeskApi>) -> Self {
        Self {
            api,
            state: Mutex::new(KnowledgeState::default()),
        }
    }

    pub async fn open(&self) {
        self.state.lock().await.open = true;
    }

    /// Closes the dialog; the typed text is kept for the next open.
    pub async fn close(&self) {
        self.state.lock().await.open = false;
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.open
    }

    pub async fn is_submitting(&self) -> bool {
        self.state.lock().await.submitting
    }

    pub async fn text(&self) -> String {
        self.state.lock().await.text.clone()
    }

    pub async fn set_text(&self, text: impl Into<String>) {
        self.state.lock().await.text = text.into();
    }

    /// Submits the current text under a freshly generated record id.
    ///
    /// Returns `None` while a previous submission is still running.
    pub async fn submit(&self) -> Option<Notice> {
        let text = {
            let mut state = self.state.lock().await;
            if state.submitting {
                return None;
            }
            if state.text.trim().is_empty() {
                return Some(Notice::Invalid("Please enter some text".to_string()));
            }
            state.submitting = true;
            state.text.clone()
        };

        let request = KnowledgeRequest {
            record_id: new_record_id(),
            string_text: text,
        };

        let notice = match self.api.add_knowledge(&request).await {
            Ok(reply) if reply.is_success() => {
                tracing::info!(record_id = %request.record_id, "Knowledge added");
                Notice::Success("✅ Knowledge added successfully!".to_string())
            }
            Ok(reply) => {
                tracing::warn!(status = ?reply.status, "Knowledge was not accepted");
                Notice::Failure("❌ Failed to add knowledge".to_string())
            }
            Err(e) if e.is_backend() => {
                tracing::warn!(error = %e, "Knowledge was not accepted");
                Notice::Failure("❌ Failed to add knowledge".to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Knowledge request failed");
                Notice::Failure("⚠️ Something went wrong".to_string())
            }
        };

        let mut state = self.state.lock().await;
        state.submitting = false;
        if notice.is_success() {
            state.open = false;
            state.text.clear();
        }
        Some(notice)
    }
}
