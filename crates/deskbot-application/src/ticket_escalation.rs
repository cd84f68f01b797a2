//! Escalation dialog: turns a chat session into a ticket.

use crate::notice::Notice;
use deskbot_core::api::{CreateTicketRequest, HelpdeskApi};
use deskbot_core::ticket::{AttachmentPreview, PendingAttachment};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Displayed in the text field while the draft is being generated.
pub const DRAFT_PLACEHOLDER: &str = "⏳ Generating ticket text...";

#[derive(Debug, Default)]
struct EscalationState {
    open: bool,
    text: String,
    attachments: Vec<PendingAttachment>,
    draft_loading: bool,
    submitting: bool,
    /// Bumped by every open and close; a draft applies only to its own opening.
    generation: u64,
}

/// Controller for the "raise a ticket" dialog of one chat session.
pub struct TicketEscalation {
    api: Arc<dyn HelpdeskApi>,
    record_id: String,
    state: Mutex<EscalationState>,
}

impl TicketEscalation {
    /// Binds the dialog to a chat session id. The dialog starts closed.
    pub fn new(api: Arc<dyn HelpdeskApi>, record_id: impl Into<String>) -> Self {
        Self {
            api,
            record_id: record_id.into(),
            state: Mutex::new(EscalationState::default()),
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Opens the dialog and fetches the backend's draft for this session.
    ///
    /// A missing, empty or failed draft leaves the text as it was. A draft
    /// that settles after the dialog was closed or reopened is discarded.
    pub async fn open(&self) {
        let generation = {
            let mut state = self.state.lock().await;
            state.open = true;
            state.draft_loading = true;
            state.generation += 1;
            state.generation
        };

        let draft = match self.api.ticket_draft(&self.record_id).await {
            Ok(draft) => draft.ticket_text.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(
                    record_id = %self.record_id,
                    error = %e,
                    "Failed to fetch ticket draft"
                );
                None
            }
        };

        let mut state = self.state.lock().await;
        if !state.open || state.generation != generation {
            tracing::debug!(record_id = %self.record_id, "Discarding draft for a closed dialog");
            return;
        }
        if let Some(text) = draft {
            state.text = text;
        }
        state.draft_loading = false;
    }

    /// Closes the dialog, discarding text and pending attachments.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.open = false;
        state.draft_loading = false;
        state.generation += 1;
        state.text.clear();
        state.attachments.clear();
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.open
    }

    pub async fn is_draft_loading(&self) -> bool {
        self.state.lock().await.draft_loading
    }

    pub async fn is_submitting(&self) -> bool {
        self.state.lock().await.submitting
    }

    /// Editable while no draft request is pending.
    pub async fn is_text_enabled(&self) -> bool {
        !self.state.lock().await.draft_loading
    }

    pub async fn text(&self) -> String {
        self.state.lock().await.text.clone()
    }

    /// Text field contents as shown: the placeholder while drafting.
    pub async fn display_text(&self) -> String {
        let state = self.state.lock().await;
        if state.draft_loading {
            DRAFT_PLACEHOLDER.to_string()
        } else {
            state.text.clone()
        }
    }

    /// Replaces the ticket text. Ignored while the draft is loading.
    pub async fn set_text(&self, text: impl Into<String>) {
        let mut state = self.state.lock().await;
        if !state.draft_loading {
            state.text = text.into();
        }
    }

    pub async fn add_attachment(&self, attachment: PendingAttachment) {
        self.state.lock().await.attachments.push(attachment);
    }

    /// Removes one attachment by position, leaving the others in order.
    pub async fn remove_attachment(&self, index: usize) -> Option<PendingAttachment> {
        let mut state = self.state.lock().await;
        (index < state.attachments.len()).then(|| state.attachments.remove(index))
    }

    pub async fn previews(&self) -> Vec<AttachmentPreview> {
        self.state
            .lock()
            .await
            .attachments
            .iter()
            .map(PendingAttachment::preview)
            .collect()
    }

    /// Uploads attachments and creates the ticket.
    ///
    /// Returns `None` when the submit button would be disabled (draft loading
    /// or a submit already running). Uploads run concurrently; any that fail
    /// are left out of the ticket. The dialog closes only on success.
    pub async fn submit(&self) -> Option<Notice> {
        let (text, attachments) = {
            let mut state = self.state.lock().await;
            if state.draft_loading || state.submitting {
                return None;
            }
            if state.text.trim().is_empty() {
                return Some(Notice::Invalid("Please enter issue description".to_string()));
            }
            state.submitting = true;
            (state.text.clone(), state.attachments.clone())
        };

        let ticket_files = self.upload_all(&attachments).await;
        let request = CreateTicketRequest {
            record_id: self.record_id.clone(),
            ticket_text: text,
            ticket_files,
        };

        let notice = match self.api.create_ticket(&request).await {
            Ok(reply) => Notice::Success(format!(
                "✅ {}",
                reply.status.as_deref().unwrap_or("Ticket created")
            )),
            Err(e) if e.is_backend() => Notice::Failure(format!(
                "❌ Failed: {}",
                e.backend_message().unwrap_or("Something went wrong")
            )),
            Err(e) => {
                tracing::warn!(record_id = %self.record_id, error = %e, "Ticket creation failed");
                Notice::Failure("⚠️ Error while raising ticket".to_string())
            }
        };

        let mut state = self.state.lock().await;
        state.submitting = false;
        if notice.is_success() {
            tracing::info!(
                record_id = %self.record_id,
                files = request.ticket_files.len(),
                "Ticket created"
            );
            state.open = false;
            state.text.clear();
            state.attachments.clear();
        }
        Some(notice)
    }

    /// Uploads every attachment concurrently and keeps the URLs that came
    /// back, in selection order.
    async fn upload_all(&self, attachments: &[PendingAttachment]) -> Vec<String> {
        let uploads = attachments.iter().map(|attachment| async move {
            match self.api.upload_file(attachment).await {
                Ok(uploaded) => uploaded.file_url.filter(|url| !url.is_empty()),
                Err(e) => {
                    tracing::warn!(file = %attachment.name, error = %e, "Attachment upload failed");
                    None
                }
            }
        });
        join_all(uploads).await.into_iter().flatten().collect()
    }
}
