use std::sync::Arc;

use anyhow::Result;
use deskbot_application::{DepartmentDesk, TicketBoard, TicketStore};
use deskbot_core::api::HelpdeskApi;
use deskbot_core::ticket::{BoardVariant, Department, TicketStatus};

use super::{print_card, report};

/// Loads the department board, applies the update and prints the patched card.
pub async fn run(
    api: Arc<dyn HelpdeskApi>,
    record_id: &str,
    status: Option<TicketStatus>,
    remarks: &str,
    department: Department,
) -> Result<()> {
    let store = TicketStore::new();
    let board = TicketBoard::new(api.clone(), BoardVariant::Department, store.clone());
    let department = department.to_string();
    board.list(Some(department.as_str())).await?;

    let desk = DepartmentDesk::new(api, store);
    report(desk.update_ticket(record_id, status, remarks).await)?;

    board.toggle(record_id).await;
    if let Some(card) = board.card(record_id).await {
        print_card(&card);
    }
    Ok(())
}
