pub mod explain;
pub mod knowledge;
pub mod tickets;
pub mod update;

use anyhow::Result;
use colored::Colorize;
use deskbot_application::Notice;
use deskbot_core::ticket::{BadgeTone, FileLink, TicketCard};

/// Prints a notice; anything but success becomes the command's error.
pub(crate) fn report(notice: Notice) -> Result<()> {
    match notice {
        Notice::Success(message) => {
            println!("{}", message.bright_green());
            Ok(())
        }
        Notice::Failure(message) | Notice::Invalid(message) => anyhow::bail!(message),
    }
}

pub(crate) fn print_card(card: &TicketCard) {
    let status = format!("[{}]", card.status);
    let status = match card.tone {
        BadgeTone::Pending => status.yellow(),
        BadgeTone::Active => status.blue(),
        BadgeTone::Done => status.green(),
        BadgeTone::Muted => status.bright_black(),
    };
    println!(
        "{} {} {}",
        card.record_id.bold(),
        status,
        card.department.bright_magenta()
    );
    for line in card.body.lines() {
        println!("    {}", line);
    }
    if card.truncatable && !card.expanded {
        println!("    {}", format!("(--expand {} for more)", card.short_id).bright_black());
    }
    if card.expanded {
        for link in &card.files {
            match link {
                FileLink::Image { url } => println!("    🖼  {}", url.underline()),
                FileLink::Document { url, label } => {
                    println!("    📄 {}: {}", label, url.underline())
                }
            }
        }
    } else if !card.files.is_empty() {
        println!("    {}", format!("{} file(s) attached", card.files.len()).bright_black());
    }
    println!();
}
