//! Scriptable in-memory `HelpdeskApi` used by the controller tests.

use async_trait::async_trait;
use deskbot_core::api::{
    ChatReply, CreateTicketRequest, HelpdeskApi, KnowledgeRequest, StatusReply, TicketDraft,
    TicketScope, TicketUpdateRequest, UploadedFile,
};
use deskbot_core::error::{DeskError, Result};
use deskbot_core::ticket::{PendingAttachment, Ticket};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Default)]
pub struct MockApi {
    pub calls: Mutex<Vec<String>>,
    pub chat_replies: Mutex<VecDeque<Result<ChatReply>>>,
    /// When set, the next `answer_chat` waits for this signal.
    pub chat_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub draft: Mutex<Option<Result<TicketDraft>>>,
    pub draft_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub created: Mutex<Vec<CreateTicketRequest>>,
    pub create_reply: Mutex<Option<Result<StatusReply>>>,
    pub tickets: Mutex<Vec<Ticket>>,
    pub list_error: Mutex<Option<DeskError>>,
    pub knowledge: Mutex<Vec<KnowledgeRequest>>,
    pub knowledge_reply: Mutex<Option<Result<StatusReply>>>,
    pub updates: Mutex<Vec<TicketUpdateRequest>>,
    pub update_reply: Mutex<Option<Result<Value>>>,
    /// Pending explanation responses, keyed by ticket id.
    pub explanation_gates: Mutex<HashMap<String, oneshot::Receiver<Result<Value>>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == endpoint)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Makes the next chat turn wait until the returned sender fires.
    pub fn gate_chat(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.chat_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn gate_draft(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.draft_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Holds the explanation for `record_id` until the sender delivers it.
    pub fn gate_explanation(&self, record_id: &str) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.explanation_gates
            .lock()
            .unwrap()
            .insert(record_id.to_string(), rx);
        tx
    }

    fn record(&self, endpoint: &str) {
        self.calls.lock().unwrap().push(endpoint.to_string());
    }
}

#[async_trait]
impl HelpdeskApi for MockApi {
    async fn answer_chat(&self, _record_id: &str, user_message: &str) -> Result<ChatReply> {
        self.record("answer_chat");
        let gate = self.chat_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let scripted = self.chat_replies.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(ChatReply {
                response: Some(format!("echo: {}", user_message)),
            })
        })
    }

    async fn ticket_draft(&self, _record_id: &str) -> Result<TicketDraft> {
        self.record("ticket_draft");
        let gate = self.draft_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.draft
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(TicketDraft::default()))
    }

    async fn upload_file(&self, attachment: &PendingAttachment) -> Result<UploadedFile> {
        self.record("upload_file");
        if attachment.name.starts_with("fail") {
            return Err(DeskError::transport("upload refused"));
        }
        if attachment.name.starts_with("nourl") {
            return Ok(UploadedFile { file_url: None });
        }
        Ok(UploadedFile {
            file_url: Some(format!("https://files.example/{}", attachment.name)),
        })
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<StatusReply> {
        self.record("create_ticket");
        self.created.lock().unwrap().push(request.clone());
        self.create_reply.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(StatusReply {
                status: Some("Ticket raised".to_string()),
                message: None,
            })
        })
    }

    async fn list_tickets(&self, scope: &TicketScope) -> Result<Vec<Ticket>> {
        self.record(match scope {
            TicketScope::All => "list_all",
            TicketScope::Admin => "list_admin",
            TicketScope::Department(_) => "list_department",
        });
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        let tickets = self.tickets.lock().unwrap().clone();
        Ok(match scope {
            TicketScope::Department(department) => tickets
                .into_iter()
                .filter(|t| &t.department == department)
                .collect(),
            _ => tickets,
        })
    }

    async fn add_knowledge(&self, request: &KnowledgeRequest) -> Result<StatusReply> {
        self.record("add_knowledge");
        self.knowledge.lock().unwrap().push(request.clone());
        self.knowledge_reply.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(StatusReply {
                status: Some("success".to_string()),
                message: None,
            })
        })
    }

    async fn update_ticket_status(&self, request: &TicketUpdateRequest) -> Result<Value> {
        self.record("update_ticket_status");
        self.updates.lock().unwrap().push(request.clone());
        self.update_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(json!({"status": request.status})))
    }

    async fn ai_explanation(&self, record_id: &str) -> Result<Value> {
        self.record("ai_explanation");
        let gate = self.explanation_gates.lock().unwrap().remove(record_id);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(DeskError::internal("gate dropped"))),
            None => Ok(json!(format!("explanation for {}", record_id))),
        }
    }
}

pub fn ticket(record_id: &str, department: &str, text: &str) -> Ticket {
    Ticket {
        record_id: record_id.to_string(),
        ticket_text: text.to_string(),
        ticket_files: Vec::new(),
        department: department.to_string(),
        status: None,
    }
}
