//! Backend contract.
//!
//! [`HelpdeskApi`] is the seam between controllers and transport: the
//! application layer only ever talks to this trait, and the interaction crate
//! provides the HTTP implementation.

use crate::error::Result;
use crate::ticket::{PendingAttachment, Ticket, TicketStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which ticket listing endpoint to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketScope {
    /// Every ticket, as seen by end users.
    All,
    /// Every ticket, as seen by the admin.
    Admin,
    /// Tickets routed to one department.
    Department(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    #[serde(rename = "recordId")]
    pub record_id: &'a str,
    pub user_message: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftRequest<'a> {
    #[serde(rename = "recordId")]
    pub record_id: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketDraft {
    #[serde(default)]
    pub ticket_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadedFile {
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTicketRequest {
    #[serde(rename = "recordId")]
    pub record_id: String,
    pub ticket_text: String,
    pub ticket_files: Vec<String>,
}

/// Generic `{status, message}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusReply {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeRequest {
    #[serde(rename = "recordId")]
    pub record_id: String,
    pub string_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketUpdateRequest {
    #[serde(rename = "recordId")]
    pub record_id: String,
    pub remarks: String,
    pub status: TicketStatus,
}

/// The backend endpoints the client consumes.
///
/// Non-success HTTP statuses surface as `DeskError::Backend` carrying the
/// body's `message`; connection failures as `DeskError::Transport`.
#[async_trait]
pub trait HelpdeskApi: Send + Sync {
    /// `POST /chat/answer_chat`
    async fn answer_chat(&self, record_id: &str, user_message: &str) -> Result<ChatReply>;

    /// `POST /chat/get_create_ticket_data`
    async fn ticket_draft(&self, record_id: &str) -> Result<TicketDraft>;

    /// `POST /file/upload_and_return_link` (multipart field `file`)
    async fn upload_file(&self, attachment: &PendingAttachment) -> Result<UploadedFile>;

    /// `POST /chat/create_ticket`
    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<StatusReply>;

    /// `GET /chat/get_all_tickets`, `/admin/get_all_tickets` or
    /// `/department/get_all_tickets_for_department`
    async fn list_tickets(&self, scope: &TicketScope) -> Result<Vec<Ticket>>;

    /// `POST /admin/add_knowledge_to_chatbot`
    async fn add_knowledge(&self, request: &KnowledgeRequest) -> Result<StatusReply>;

    /// `POST /department/update_ticket_status`
    async fn update_ticket_status(&self, request: &TicketUpdateRequest)
        -> Result<serde_json::Value>;

    /// `GET /department/get_ai_explanation_for_ticket`
    async fn ai_explanation(&self, record_id: &str) -> Result<serde_json::Value>;
}
