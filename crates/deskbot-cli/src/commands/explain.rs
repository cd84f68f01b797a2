use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use deskbot_application::{DepartmentDesk, TicketStore};
use deskbot_core::api::HelpdeskApi;
use futures::future::join_all;

/// Requests every explanation at once and prints each one as it is displayed.
/// A response that settles after a newer one has been shown is dropped.
pub async fn run(api: Arc<dyn HelpdeskApi>, record_ids: &[String]) -> Result<()> {
    let desk = DepartmentDesk::new(api, TicketStore::new());

    join_all(record_ids.iter().map(|id| {
        let desk = &desk;
        async move {
            if !desk.explain(id).await {
                eprintln!("{}", format!("Explanation for {} superseded", id).bright_black());
                return;
            }
            if let Some(explanation) = desk.explanation().await {
                println!(
                    "{}",
                    format!("AI explanation for {}", explanation.record_id)
                        .bright_magenta()
                        .bold()
                );
                println!("{}\n", explanation.text);
            }
        }
    }))
    .await;

    Ok(())
}
