use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use deskbot_application::{TicketBoard, TicketStore};
use deskbot_core::api::HelpdeskApi;
use deskbot_core::ticket::{BoardVariant, Department};

use super::print_card;

pub async fn run(
    api: Arc<dyn HelpdeskApi>,
    department: Option<Department>,
    admin: bool,
    expand: &[String],
) -> Result<()> {
    let variant = match (admin, department) {
        (true, _) => BoardVariant::Admin,
        (false, Some(_)) => BoardVariant::Department,
        (false, None) => BoardVariant::User,
    };
    let board = TicketBoard::new(api, variant, TicketStore::new());
    let department = department.map(|d| d.to_string());
    board.list(department.as_deref()).await?;

    for id in expand {
        let matched = board
            .cards()
            .await
            .into_iter()
            .find(|c| c.record_id.starts_with(id.trim_end_matches("...")));
        match matched {
            Some(card) if !card.expanded => {
                board.toggle(&card.record_id).await;
            }
            Some(_) => {}
            None => eprintln!("{}", format!("No ticket matching {}", id).yellow()),
        }
    }

    if let Some(message) = board.empty_message().await {
        println!("{}", message.bright_black());
        return Ok(());
    }
    for card in board.cards().await {
        print_card(&card);
    }
    Ok(())
}
