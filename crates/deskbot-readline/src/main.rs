mod escalation;
mod helper;
mod render;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use deskbot_application::{ChatSession, SendOutcome, TicketBoard, TicketEscalation, TicketStore};
use deskbot_core::api::HelpdeskApi;
use deskbot_core::chat::ChatImage;
use deskbot_core::config::ClientConfig;
use deskbot_core::ticket::BoardVariant;
use deskbot_interaction::HttpHelpdeskApi;

use helper::CliHelper;

#[derive(Parser)]
#[command(name = "deskbot-chat")]
#[command(about = "Chat with the support bot and raise tickets", long_about = None)]
struct Args {
    /// Backend base URL (overrides DESKBOT_API and config.toml)
    #[arg(long)]
    api: Option<String>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("{}", "Type a message to chat with the bot.".bright_black());
    println!("{}", "  /new            start a new chat".bright_black());
    println!("{}", "  /image <path>   attach an image to the next message".bright_black());
    println!("{}", "  /ticket         raise a ticket for this chat".bright_black());
    println!("{}", "  /tickets        list support tickets".bright_black());
    println!("{}", "  /expand <id>    show or hide a ticket's details".bright_black());
    println!("{}", "  quit            exit".bright_black());
}

/// Entry point for the end-user chat REPL.
///
/// Each line is one chat turn; the reply is awaited before the next prompt,
/// so only one chat request is ever outstanding.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = ClientConfig::resolve(args.api)?;
    tracing::debug!(base_url = %config.base_url, "Resolved backend");
    let api: Arc<dyn HelpdeskApi> = Arc::new(HttpHelpdeskApi::new(config)?);
    let chat = ChatSession::new(api.clone());
    let board = TicketBoard::new(api.clone(), BoardVariant::User, TicketStore::new());

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Deskbot Support Chat ===".bright_magenta().bold());
    print_help();
    println!();

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            println!("{}", "Goodbye!".bright_green());
            break;
        }
        let _ = rl.add_history_entry(&line);
        let (command, arg) = trimmed.split_once(' ').unwrap_or((trimmed, ""));

        match command {
            "/help" => print_help(),
            "/new" => {
                chat.start().await;
                println!("{}", "🔄 New chat started.".bright_green());
            }
            "/image" if !arg.trim().is_empty() => {
                let path = arg.trim();
                if std::path::Path::new(path).is_file() {
                    chat.attach_image(ChatImage::new(path)).await;
                    println!(
                        "{}",
                        format!("📎 {} will be sent with your next message", path).bright_black()
                    );
                } else {
                    println!("{}", format!("No such file: {}", path).red());
                }
            }
            "/ticket" => {
                if !chat.can_escalate().await {
                    println!(
                        "{}",
                        "Chat with the bot first; tickets are raised from its last reply."
                            .bright_black()
                    );
                    continue;
                }
                let dialog = TicketEscalation::new(api.clone(), chat.session_id().await);
                escalation::run(&mut rl, &dialog).await?;
            }
            "/tickets" => {
                println!("{}", "⏳ Loading tickets...".bright_black());
                if let Err(e) = board.list(None).await {
                    println!("{}", format!("Could not load tickets: {}", e).red());
                }
                if let Some(message) = board.empty_message().await {
                    println!("{}", message.bright_black());
                }
                for card in board.cards().await {
                    render::print_card(&card);
                }
            }
            "/expand" if !arg.trim().is_empty() => {
                let prefix = arg.trim().trim_start_matches('#').trim_end_matches("...");
                let target = board
                    .cards()
                    .await
                    .into_iter()
                    .find(|c| c.record_id.starts_with(prefix));
                match target {
                    Some(card) => {
                        board.toggle(&card.record_id).await;
                        if let Some(card) = board.card(&card.record_id).await {
                            render::print_card(&card);
                        }
                    }
                    None => println!("{}", format!("No ticket matching {}", prefix).red()),
                }
            }
            _ if command.starts_with('/') => {
                println!("{}", "Unknown command".bright_black());
            }
            _ => {
                chat.set_input(line.clone()).await;
                println!("{}", chat.placeholder().bright_black());
                let outcome = chat.submit_input().await;
                if outcome == SendOutcome::Rejected {
                    continue;
                }
                if let Some(reply) = chat.messages().await.last() {
                    render::print_message(reply);
                }
                if chat.can_escalate().await {
                    render::print_escalation_hint();
                }
            }
        }
    }

    Ok(())
}
