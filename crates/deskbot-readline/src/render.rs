//! Terminal rendering for chat messages and the user ticket sidebar.

use colored::Colorize;
use deskbot_core::chat::{ChatMessage, Sender};
use deskbot_core::ticket::{AttachmentKind, AttachmentPreview, BadgeTone, FileLink, TicketCard};

pub fn print_message(message: &ChatMessage) {
    match message.sender {
        Sender::User => {
            if !message.text.is_empty() {
                println!("{}", format!("> {}", message.text).green());
            }
            if let Some(image) = &message.image {
                println!("{}", format!("  [image] {}", image).green());
            }
        }
        Sender::Bot => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn print_escalation_hint() {
    println!(
        "{}",
        "🚨 Issue not resolved? Type /ticket to raise a problem".bright_black()
    );
}

fn badge(card: &TicketCard) -> colored::ColoredString {
    let label = format!("[{}]", card.status);
    match card.tone {
        BadgeTone::Pending => label.yellow(),
        BadgeTone::Active => label.blue(),
        BadgeTone::Done => label.green(),
        BadgeTone::Muted => label.bright_black(),
    }
}

/// Compact sidebar entry; the body and files only show when expanded.
pub fn print_card(card: &TicketCard) {
    println!(
        "{} {} {}",
        format!("#{}", card.short_id).bright_black(),
        card.department.bright_magenta(),
        badge(card)
    );
    if card.expanded {
        println!("  {}", card.body);
        for link in &card.files {
            match link {
                FileLink::Image { url } => println!("  🖼  {}", url.underline()),
                FileLink::Document { url, label } => {
                    println!("  📄 {} {}", label, url.underline())
                }
            }
        }
    }
}

pub fn print_preview(index: usize, preview: &AttachmentPreview) {
    let icon = match preview.kind {
        AttachmentKind::Image => "🖼 ",
        AttachmentKind::Document => "📄",
    };
    println!(
        "  {}. {} {} {}",
        index + 1,
        icon,
        preview.name,
        format!("({})", preview.size_label).bright_black()
    );
}
