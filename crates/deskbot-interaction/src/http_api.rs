//! HttpHelpdeskApi - reqwest implementation of the helpdesk backend contract.

use async_trait::async_trait;
use deskbot_core::api::{
    ChatReply, ChatRequest, CreateTicketRequest, DraftRequest, HelpdeskApi, KnowledgeRequest,
    StatusReply, TicketDraft, TicketScope, TicketUpdateRequest, UploadedFile,
};
use deskbot_core::config::ClientConfig;
use deskbot_core::error::{DeskError, Result};
use deskbot_core::ticket::{PendingAttachment, Ticket};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Talks to the helpdesk backend over HTTP(S).
#[derive(Clone)]
pub struct HttpHelpdeskApi {
    client: Client,
    config: ClientConfig,
}

impl HttpHelpdeskApi {
    /// Creates a client for the configured base URL.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DeskError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.config.endpoint(path)).json(body);
        self.execute(path, request).await
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self.client.get(self.config.endpoint(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(path, request).await
    }

    async fn execute<T>(&self, path: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.send(path, request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Vec<u8>> {
        tracing::debug!(endpoint = %path, "Sending helpdesk request");
        let response = request
            .send()
            .await
            .map_err(|e| DeskError::transport(format!("{} request failed: {}", path, e)))?;
        read_body(path, response).await
    }
}

/// Returns the body of a successful response, or `DeskError::Backend` for
/// non-success statuses, keeping the body's `message` field when present.
async fn read_body(path: &str, response: Response) -> Result<Vec<u8>> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| DeskError::transport(format!("Failed to read {} response: {}", path, e)))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));
        tracing::warn!(
            endpoint = %path,
            status = status.as_u16(),
            "Helpdesk backend returned an error"
        );
        return Err(DeskError::backend(status.as_u16(), message));
    }

    Ok(body.to_vec())
}

#[async_trait]
impl HelpdeskApi for HttpHelpdeskApi {
    async fn answer_chat(&self, record_id: &str, user_message: &str) -> Result<ChatReply> {
        let body = ChatRequest {
            record_id,
            user_message,
        };
        self.post_json("/chat/answer_chat", &body).await
    }

    async fn ticket_draft(&self, record_id: &str) -> Result<TicketDraft> {
        self.post_json("/chat/get_create_ticket_data", &DraftRequest { record_id })
            .await
    }

    async fn upload_file(&self, attachment: &PendingAttachment) -> Result<UploadedFile> {
        let part = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.name.clone())
            .mime_str(&attachment.mime)
            .map_err(|e| DeskError::internal(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part("file", part);

        let path = "/file/upload_and_return_link";
        let request = self.client.post(self.config.endpoint(path)).multipart(form);
        self.execute(path, request).await
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<StatusReply> {
        self.post_json("/chat/create_ticket", request).await
    }

    async fn list_tickets(&self, scope: &TicketScope) -> Result<Vec<Ticket>> {
        let tickets: Option<Vec<Ticket>> = match scope {
            TicketScope::All => self.get_json("/chat/get_all_tickets", &[]).await?,
            TicketScope::Admin => self.get_json("/admin/get_all_tickets", &[]).await?,
            TicketScope::Department(department) => {
                self.get_json(
                    "/department/get_all_tickets_for_department",
                    &[("department", department.as_str())],
                )
                .await?
            }
        };
        Ok(tickets.unwrap_or_default())
    }

    async fn add_knowledge(&self, request: &KnowledgeRequest) -> Result<StatusReply> {
        self.post_json("/admin/add_knowledge_to_chatbot", request)
            .await
    }

    async fn update_ticket_status(
        &self,
        request: &TicketUpdateRequest,
    ) -> Result<serde_json::Value> {
        self.post_json("/department/update_ticket_status", request)
            .await
    }

    /// A body that is not JSON is returned as a JSON string.
    async fn ai_explanation(&self, record_id: &str) -> Result<serde_json::Value> {
        let path = "/department/get_ai_explanation_for_ticket";
        let request = self
            .client
            .get(self.config.endpoint(path))
            .query(&[("recordId", record_id)]);
        let body = self.send(path, request).await?;
        Ok(serde_json::from_slice(&body).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
        }))
    }
}
