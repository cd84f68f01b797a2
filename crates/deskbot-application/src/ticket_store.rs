//! Shared client-side copy of the ticket list.

use deskbot_core::ticket::{Ticket, TicketStatus};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreState {
    tickets: Vec<Ticket>,
    /// Set by optimistic patches; cleared by the next full fetch.
    stale: bool,
}

/// Client-side copy of the last fetched ticket list.
///
/// Boards write full fetches into the store and department updates patch it
/// in place. Policy: optimistic apply, reconcile on next full fetch. A patch
/// marks the store stale; `replace_all` from a fetch replaces every patched
/// ticket with the backend's version.
#[derive(Clone, Default)]
pub struct TicketStore {
    state: Arc<RwLock<StoreState>>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with a fresh fetch.
    pub async fn replace_all(&self, tickets: Vec<Ticket>) {
        let mut state = self.state.write().await;
        state.tickets = tickets;
        state.stale = false;
    }

    pub async fn snapshot(&self) -> Vec<Ticket> {
        self.state.read().await.tickets.clone()
    }

    pub async fn get(&self, record_id: &str) -> Option<Ticket> {
        let state = self.state.read().await;
        state
            .tickets
            .iter()
            .find(|t| t.record_id == record_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.tickets.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.tickets.is_empty()
    }

    /// Optimistically applies a status/remarks update to the local copy.
    ///
    /// Returns `false` when the ticket is not in the store.
    pub async fn apply_update(&self, record_id: &str, status: TicketStatus, remarks: &str) -> bool {
        let mut state = self.state.write().await;
        let Some(ticket) = state.tickets.iter_mut().find(|t| t.record_id == record_id) else {
            return false;
        };
        ticket.apply_update(status, remarks);
        state.stale = true;
        true
    }

    /// Drops the local copy; the next read should re-fetch.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.tickets.clear();
        state.stale = true;
    }

    /// Whether local data diverges from the last fetch.
    pub async fn is_stale(&self) -> bool {
        self.state.read().await.stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_api::ticket;

    #[tokio::test]
    async fn patch_marks_stale_until_next_fetch() {
        let store = TicketStore::new();
        store
            .replace_all(vec![ticket("T", "Network", "Link down")])
            .await;
        assert!(!store.is_stale().await);

        assert!(store.apply_update("T", TicketStatus::Resolved, "fixed cable").await);
        assert!(store.is_stale().await);
        let patched = store.get("T").await.unwrap();
        assert_eq!(patched.status, Some(TicketStatus::Resolved));

        store
            .replace_all(vec![ticket("T", "Network", "Link down")])
            .await;
        assert!(!store.is_stale().await);
        assert_eq!(store.get("T").await.unwrap().status, None);
    }

    #[tokio::test]
    async fn patch_unknown_ticket_is_noop() {
        let store = TicketStore::new();
        assert!(!store.apply_update("missing", TicketStatus::Closed, "").await);
        assert!(!store.is_stale().await);
    }

    #[tokio::test]
    async fn invalidate_clears_contents() {
        let store = TicketStore::new();
        store.replace_all(vec![ticket("A", "Finance", "x")]).await;
        store.invalidate().await;
        assert!(store.is_empty().await);
        assert!(store.is_stale().await);
    }
}
