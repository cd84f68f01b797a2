//! Interactive "raise a ticket" dialog.

use colored::Colorize;
use deskbot_application::ticket_escalation::DRAFT_PLACEHOLDER;
use deskbot_application::{Notice, TicketEscalation};
use deskbot_core::ticket::PendingAttachment;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use crate::helper::{CliHelper, Mode};
use crate::render::print_preview;

/// Runs the escalation dialog until the ticket is created or the user cancels.
pub async fn run(
    rl: &mut Editor<CliHelper, DefaultHistory>,
    dialog: &TicketEscalation,
) -> anyhow::Result<()> {
    println!("{}", "=== Raise a Ticket ===".bright_magenta().bold());
    println!("{}", DRAFT_PLACEHOLDER.bright_black());
    dialog.open().await;
    set_mode(rl, Mode::Ticket);
    let result = prompt(rl, dialog).await;
    set_mode(rl, Mode::Chat);
    result
}

fn set_mode(rl: &mut Editor<CliHelper, DefaultHistory>, mode: Mode) {
    if let Some(helper) = rl.helper_mut() {
        helper.set_mode(mode);
    }
}

async fn prompt(
    rl: &mut Editor<CliHelper, DefaultHistory>,
    dialog: &TicketEscalation,
) -> anyhow::Result<()> {
    let draft = dialog.text().await;
    if draft.is_empty() {
        println!("{}", "Describe your issue...".bright_black());
    } else {
        println!("{}", "Suggested ticket text:".bright_yellow());
        println!("{}", draft);
    }
    println!(
        "{}",
        concat!(
            "Type text to replace the description, /attach <path>, /remove <n>, ",
            "/files, /show, /submit or /cancel."
        )
        .bright_black()
    );

    loop {
        let line = match rl.readline("ticket> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                dialog.close().await;
                println!("{}", "Ticket cancelled.".yellow());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        let (command, arg) = trimmed.split_once(' ').unwrap_or((trimmed, ""));

        match command {
            "/cancel" => {
                dialog.close().await;
                println!("{}", "Ticket cancelled.".yellow());
                return Ok(());
            }
            "/attach" if !arg.is_empty() => match PendingAttachment::from_path(arg.trim()) {
                Ok(attachment) => {
                    let preview = attachment.preview();
                    dialog.add_attachment(attachment).await;
                    print_preview(dialog.previews().await.len() - 1, &preview);
                }
                Err(e) => println!("{}", format!("Cannot attach {}: {}", arg, e).red()),
            },
            "/remove" => match arg.trim().parse::<usize>() {
                Ok(n) if n > 0 => match dialog.remove_attachment(n - 1).await {
                    Some(removed) => println!("{}", format!("Removed {}", removed.name).yellow()),
                    None => println!("{}", format!("No attachment #{}", n).red()),
                },
                _ => println!("{}", "Usage: /remove <n>".red()),
            },
            "/files" => {
                let previews = dialog.previews().await;
                if previews.is_empty() {
                    println!("{}", "No files selected.".bright_black());
                }
                for (i, preview) in previews.iter().enumerate() {
                    print_preview(i, preview);
                }
            }
            "/show" => println!("{}", dialog.display_text().await),
            "/submit" => {
                println!("{}", "Submitting...".bright_black());
                match dialog.submit().await {
                    Some(notice @ Notice::Success(_)) => {
                        println!("{}", notice.message().bright_green());
                        return Ok(());
                    }
                    Some(notice) => println!("{}", notice.message().red()),
                    None => println!("{}", "Please wait...".bright_black()),
                }
            }
            "" => {}
            _ if command.starts_with('/') => {
                println!("{}", format!("Unknown command: {}", command).bright_black())
            }
            _ => {
                let _ = rl.add_history_entry(&line);
                dialog.set_text(trimmed).await;
            }
        }
    }
}
