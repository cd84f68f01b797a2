use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use deskbot_core::api::HelpdeskApi;
use deskbot_core::config::ClientConfig;
use deskbot_core::ticket::{Department, TicketStatus};
use deskbot_interaction::HttpHelpdeskApi;

mod commands;

#[derive(Parser)]
#[command(name = "deskbot")]
#[command(
    about = "Deskbot staff tools: ticket boards, updates and chatbot knowledge",
    long_about = None
)]
struct Cli {
    /// Backend base URL (overrides DESKBOT_API and config.toml)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tickets (all tickets by default)
    Tickets {
        /// Only tickets routed to this department
        #[arg(long, conflicts_with = "admin")]
        department: Option<Department>,
        /// Use the admin board
        #[arg(long)]
        admin: bool,
        /// Show the full text and files of these tickets
        #[arg(long, value_name = "ID")]
        expand: Vec<String>,
    },
    /// Update a ticket's status and remarks
    Update {
        record_id: String,
        #[arg(long)]
        status: Option<TicketStatus>,
        #[arg(long, default_value = "")]
        remarks: String,
        /// Department board the ticket is listed on
        #[arg(long)]
        department: Department,
    },
    /// Ask the AI to explain one or more tickets
    Explain {
        #[arg(required = true, value_name = "ID")]
        record_ids: Vec<String>,
    },
    /// Add free text to the chatbot's knowledge base
    Knowledge { text: String },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::resolve(cli.api)?;
    tracing::debug!(base_url = %config.base_url, "Resolved backend");
    let api: Arc<dyn HelpdeskApi> = Arc::new(HttpHelpdeskApi::new(config)?);

    match cli.command {
        Commands::Tickets {
            department,
            admin,
            expand,
        } => commands::tickets::run(api, department, admin, &expand).await?,
        Commands::Update {
            record_id,
            status,
            remarks,
            department,
        } => commands::update::run(api, &record_id, status, &remarks, department).await?,
        Commands::Explain { record_ids } => commands::explain::run(api, &record_ids).await?,
        Commands::Knowledge { text } => commands::knowledge::run(api, text).await?,
    }

    Ok(())
}
