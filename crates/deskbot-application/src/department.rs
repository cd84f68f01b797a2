//! Department actions: status/remarks updates and AI explanations.

use crate::notice::Notice;
use crate::ticket_store::TicketStore;
use deskbot_core::api::{HelpdeskApi, TicketUpdateRequest};
use deskbot_core::ticket::TicketStatus;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const NO_EXPLANATION: &str = "No explanation available.";
pub const EXPLANATION_ERROR: &str = "⚠️ Error while fetching explanation.";

/// The explanation currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub record_id: String,
    pub text: String,
}

#[derive(Debug, Default)]
struct ExplainState {
    /// Last issued token; tokens increase monotonically.
    last_token: u64,
    /// Current request token per ticket, present while that request is pending.
    pending: HashMap<String, u64>,
    /// Token of the newest response ever displayed; dismissing keeps it.
    last_shown: u64,
    /// Explanation on display.
    shown: Option<Explanation>,
}

/// Department-side actions over the shared ticket store.
pub struct DepartmentDesk {
    api: Arc<dyn HelpdeskApi>,
    store: TicketStore,
    explain: Mutex<ExplainState>,
}

impl DepartmentDesk {
    pub fn new(api: Arc<dyn HelpdeskApi>, store: TicketStore) -> Self {
        Self {
            api,
            store,
            explain: Mutex::new(ExplainState::default()),
        }
    }

    /// Sends a status/remarks update and patches the local copy on success.
    ///
    /// The ticket is not re-fetched; the store is marked stale and the next
    /// board fetch reconciles it.
    pub async fn update_ticket(
        &self,
        record_id: &str,
        status: Option<TicketStatus>,
        remarks: &str,
    ) -> Notice {
        let Some(status) = status else {
            return Notice::Invalid("Please select a status and add remarks".to_string());
        };

        let request = TicketUpdateRequest {
            record_id: record_id.to_string(),
            remarks: remarks.to_string(),
            status,
        };

        match self.api.update_ticket_status(&request).await {
            Ok(_) => {
                if !self.store.apply_update(record_id, status, remarks).await {
                    tracing::debug!(record_id, "Updated ticket is not in the local list");
                }
                tracing::info!(record_id, %status, "Ticket updated");
                Notice::Success("✅ Ticket updated successfully".to_string())
            }
            Err(e) if e.is_backend() => Notice::Failure(format!(
                "❌ Failed: {}",
                e.backend_message().unwrap_or("Something went wrong")
            )),
            Err(e) => {
                tracing::warn!(record_id, error = %e, "Ticket update failed");
                Notice::Failure("⚠️ Error updating ticket".to_string())
            }
        }
    }

    /// Fetches the AI explanation for one ticket.
    ///
    /// Every call takes a fresh token. The response is displayed only if it
    /// is still the current request for its ticket and newer than whatever is
    /// on display, so late responses never overwrite newer ones. Returns
    /// whether the response was displayed.
    pub async fn explain(&self, record_id: &str) -> bool {
        let token = {
            let mut state = self.explain.lock().await;
            state.last_token += 1;
            let token = state.last_token;
            state.pending.insert(record_id.to_string(), token);
            token
        };

        let text = match self.api.ai_explanation(record_id).await {
            Ok(value) => explanation_text(value),
            Err(e) => {
                tracing::warn!(record_id, error = %e, "Failed to fetch AI explanation");
                EXPLANATION_ERROR.to_string()
            }
        };

        let mut state = self.explain.lock().await;
        if state.pending.get(record_id) != Some(&token) {
            tracing::debug!(record_id, token, "Discarding superseded explanation");
            return false;
        }
        state.pending.remove(record_id);

        let newer = token > state.last_shown;
        if newer {
            state.last_shown = token;
            state.shown = Some(Explanation {
                record_id: record_id.to_string(),
                text,
            });
        } else {
            tracing::debug!(record_id, token, "Discarding explanation older than the one shown");
        }
        newer
    }

    /// Whether an explanation request for this ticket is pending.
    pub async fn is_explaining(&self, record_id: &str) -> bool {
        self.explain.lock().await.pending.contains_key(record_id)
    }

    pub async fn explaining_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.explain.lock().await.pending.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn explanation(&self) -> Option<Explanation> {
        self.explain.lock().await.shown.clone()
    }

    /// Closes the explanation dialog. Responses older than the one just
    /// dismissed still cannot reopen it.
    pub async fn dismiss_explanation(&self) {
        self.explain.lock().await.shown = None;
    }
}

fn explanation_text(value: Value) -> String {
    match value {
        Value::Null => NO_EXPLANATION.to_string(),
        Value::String(s) if s.is_empty() => NO_EXPLANATION.to_string(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TicketBoard;
    use crate::mock_api::{MockApi, ticket};
    use deskbot_core::error::DeskError;
    use deskbot_core::ticket::BoardVariant;
    use serde_json::json;

    async fn desk_with_board(api: &Arc<MockApi>) -> (Arc<DepartmentDesk>, TicketBoard) {
        let store = TicketStore::new();
        let board = TicketBoard::new(api.clone(), BoardVariant::Department, store.clone());
        board.list(Some("Network")).await.unwrap();
        (Arc::new(DepartmentDesk::new(api.clone(), store)), board)
    }

    #[tokio::test]
    async fn update_requires_status() {
        let api = Arc::new(MockApi::new());
        let (desk, _) = desk_with_board(&api).await;
        let notice = desk.update_ticket("T", None, "fixed").await;
        assert_eq!(
            notice,
            Notice::Invalid("Please select a status and add remarks".into())
        );
        assert_eq!(api.calls_to("update_ticket_status"), 0);
    }

    #[tokio::test]
    async fn resolved_update_patches_without_refetch() {
        let api = Arc::new(MockApi::new());
        *api.tickets.lock().unwrap() = vec![ticket("T", "Network", "Branch router offline")];
        let (desk, board) = desk_with_board(&api).await;

        let notice = desk
            .update_ticket("T", Some(TicketStatus::Resolved), "fixed cable")
            .await;
        assert!(notice.is_success());

        let card = board.card("T").await.unwrap();
        assert!(card.body.ends_with("[Updated: fixed cable]"));
        assert_eq!(card.status.to_string(), "Resolved");
        assert_eq!(api.calls_to("list_department"), 1);
        assert!(board.store().is_stale().await);

        let sent = api.updates.lock().unwrap().clone();
        assert_eq!(sent[0].status, TicketStatus::Resolved);
        assert_eq!(sent[0].remarks, "fixed cable");
    }

    #[tokio::test]
    async fn failed_update_leaves_ticket_untouched() {
        let api = Arc::new(MockApi::new());
        *api.tickets.lock().unwrap() = vec![ticket("T", "Network", "Router offline")];
        *api.update_reply.lock().unwrap() = Some(Err(DeskError::transport("reset")));
        let (desk, board) = desk_with_board(&api).await;

        let notice = desk
            .update_ticket("T", Some(TicketStatus::Closed), "done")
            .await;
        assert_eq!(notice, Notice::Failure("⚠️ Error updating ticket".into()));
        assert_eq!(board.card("T").await.unwrap().body, "Router offline");
        assert!(!board.store().is_stale().await);
    }

    #[tokio::test]
    async fn later_request_wins_when_answered_first() {
        let api = Arc::new(MockApi::new());
        let (desk, _) = desk_with_board(&api).await;
        let answer_a = api.gate_explanation("A");
        let answer_b = api.gate_explanation("B");

        let request_a = tokio::spawn({
            let desk = desk.clone();
            async move { desk.explain("A").await }
        });
        while !desk.is_explaining("A").await {
            tokio::task::yield_now().await;
        }
        let request_b = tokio::spawn({
            let desk = desk.clone();
            async move { desk.explain("B").await }
        });
        while !desk.is_explaining("B").await {
            tokio::task::yield_now().await;
        }

        answer_b.send(Ok(json!("B explanation"))).unwrap();
        assert!(request_b.await.unwrap());
        answer_a.send(Ok(json!("A explanation"))).unwrap();
        assert!(!request_a.await.unwrap());

        let shown = desk.explanation().await.unwrap();
        assert_eq!(shown.record_id, "B");
        assert_eq!(shown.text, "B explanation");
        assert!(!desk.is_explaining("A").await);
        assert!(desk.explaining_ids().await.is_empty());
    }

    #[tokio::test]
    async fn older_response_does_not_reopen_dismissed_dialog() {
        let api = Arc::new(MockApi::new());
        let (desk, _) = desk_with_board(&api).await;
        let answer_a = api.gate_explanation("A");

        let request_a = tokio::spawn({
            let desk = desk.clone();
            async move { desk.explain("A").await }
        });
        while !desk.is_explaining("A").await {
            tokio::task::yield_now().await;
        }

        assert!(desk.explain("B").await);
        desk.dismiss_explanation().await;

        answer_a.send(Ok(json!("A old"))).unwrap();
        assert!(!request_a.await.unwrap());
        assert_eq!(desk.explanation().await, None);
        assert!(!desk.is_explaining("A").await);

        assert!(desk.explain("A").await);
        assert_eq!(desk.explanation().await.unwrap().text, "explanation for A");
    }

    #[tokio::test]
    async fn repeated_request_for_same_ticket_discards_stale_response() {
        let api = Arc::new(MockApi::new());
        let (desk, _) = desk_with_board(&api).await;
        let first = api.gate_explanation("A");

        let stale = tokio::spawn({
            let desk = desk.clone();
            async move { desk.explain("A").await }
        });
        while !desk.is_explaining("A").await {
            tokio::task::yield_now().await;
        }

        // Second request for A is answered immediately by the mock.
        assert!(desk.explain("A").await);
        first.send(Ok(json!("old text"))).unwrap();
        assert!(!stale.await.unwrap());

        assert_eq!(desk.explanation().await.unwrap().text, "explanation for A");
        assert!(!desk.is_explaining("A").await);
    }

    #[tokio::test]
    async fn explanation_fallbacks() {
        let api = Arc::new(MockApi::new());
        let (desk, _) = desk_with_board(&api).await;

        api.gate_explanation("E").send(Ok(json!(""))).unwrap();
        desk.explain("E").await;
        assert_eq!(desk.explanation().await.unwrap().text, NO_EXPLANATION);

        api.gate_explanation("F")
            .send(Err(DeskError::transport("down")))
            .unwrap();
        desk.explain("F").await;
        assert_eq!(desk.explanation().await.unwrap().text, EXPLANATION_ERROR);

        api.gate_explanation("G")
            .send(Ok(json!({"summary": "loose cable"})))
            .unwrap();
        desk.explain("G").await;
        assert_eq!(
            desk.explanation().await.unwrap().text,
            r#"{"summary":"loose cable"}"#
        );

        desk.dismiss_explanation().await;
        assert_eq!(desk.explanation().await, None);
    }
}
