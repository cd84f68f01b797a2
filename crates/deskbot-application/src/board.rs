//! Ticket boards for the user, department and admin views.

use crate::ticket_store::TicketStore;
use deskbot_core::api::{HelpdeskApi, TicketScope};
use deskbot_core::error::{DeskError, Result};
use deskbot_core::ticket::{BoardVariant, TicketCard};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Read side of a ticket board: fetches into the shared [`TicketStore`] and
/// renders cards with per-ticket expand/collapse state.
pub struct TicketBoard {
    api: Arc<dyn HelpdeskApi>,
    variant: BoardVariant,
    store: TicketStore,
    department: Mutex<Option<String>>,
    expanded: Mutex<HashSet<String>>,
    loading: AtomicBool,
}

impl TicketBoard {
    pub fn new(api: Arc<dyn HelpdeskApi>, variant: BoardVariant, store: TicketStore) -> Self {
        Self {
            api,
            variant,
            store,
            department: Mutex::new(None),
            expanded: Mutex::new(HashSet::new()),
            loading: AtomicBool::new(false),
        }
    }

    pub fn variant(&self) -> BoardVariant {
        self.variant
    }

    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn department(&self) -> Option<String> {
        self.department.lock().await.clone()
    }

    /// Fetches tickets and replaces the store contents.
    ///
    /// The department board needs a department, either passed here or
    /// remembered from the previous call; the user and admin boards ignore
    /// the filter. On failure the previous list is kept.
    pub async fn list(&self, department: Option<&str>) -> Result<usize> {
        let scope = match self.variant {
            BoardVariant::User => TicketScope::All,
            BoardVariant::Admin => TicketScope::Admin,
            BoardVariant::Department => {
                let mut selected = self.department.lock().await;
                if let Some(department) = department {
                    *selected = Some(department.to_string());
                }
                let department = selected
                    .clone()
                    .ok_or_else(|| DeskError::validation("Select a department"))?;
                TicketScope::Department(department)
            }
        };

        self.loading.store(true, Ordering::Release);
        let fetched = self.api.list_tickets(&scope).await;
        self.loading.store(false, Ordering::Release);

        match fetched {
            Ok(tickets) => {
                let count = tickets.len();
                tracing::debug!(variant = ?self.variant, count, "Fetched tickets");
                self.store.replace_all(tickets).await;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(variant = ?self.variant, error = %e, "Failed to fetch tickets");
                Err(e)
            }
        }
    }

    /// Cards in backend order.
    pub async fn cards(&self) -> Vec<TicketCard> {
        let expanded = self.expanded.lock().await.clone();
        self.store
            .snapshot()
            .await
            .iter()
            .map(|t| TicketCard::build(t, self.variant, expanded.contains(&t.record_id)))
            .collect()
    }

    pub async fn card(&self, record_id: &str) -> Option<TicketCard> {
        let ticket = self.store.get(record_id).await?;
        let expanded = self.expanded.lock().await.contains(record_id);
        Some(TicketCard::build(&ticket, self.variant, expanded))
    }

    /// Flips expand/collapse for one ticket and returns the new state.
    ///
    /// The user board keeps a single ticket expanded.
    pub async fn toggle(&self, record_id: &str) -> bool {
        let mut expanded = self.expanded.lock().await;
        if expanded.remove(record_id) {
            return false;
        }
        if self.variant.single_expansion() {
            expanded.clear();
        }
        expanded.insert(record_id.to_string());
        true
    }

    /// Message for an empty board, or `None` when there is something to show.
    pub async fn empty_message(&self) -> Option<String> {
        if self.is_loading() || !self.store.is_empty().await {
            return None;
        }
        match (self.variant, self.department().await) {
            (BoardVariant::Department, Some(department)) => {
                Some(format!("No tickets found for {}", department))
            }
            (BoardVariant::Department, None) => None,
            _ => Some("No tickets found.".to_string()),
        }
    }
}
