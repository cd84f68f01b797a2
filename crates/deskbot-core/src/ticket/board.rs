//! Rendering rules shared by every ticket board.
//!
//! These are pure functions over [`Ticket`]; expansion state itself is owned
//! by the board controller.

use super::model::{Ticket, TicketStatus};
use std::borrow::Cow;

/// File extensions rendered as inline thumbnails.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Which board is rendering: each variant has its own endpoint and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardVariant {
    User,
    Department,
    Admin,
}

impl BoardVariant {
    /// Collapsed bodies longer than this many characters are truncated.
    pub fn truncate_at(self) -> usize {
        match self {
            BoardVariant::User => 80,
            BoardVariant::Department | BoardVariant::Admin => 120,
        }
    }

    /// The user sidebar shows one expanded ticket at a time.
    pub fn single_expansion(self) -> bool {
        matches!(self, BoardVariant::User)
    }
}

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Pending,
    Active,
    Done,
    Muted,
}

impl From<TicketStatus> for BadgeTone {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Open => BadgeTone::Pending,
            TicketStatus::InProgress => BadgeTone::Active,
            TicketStatus::Resolved => BadgeTone::Done,
            TicketStatus::Closed => BadgeTone::Muted,
        }
    }
}

/// How a ticket attachment is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLink {
    /// Inline thumbnail linking to the full image.
    Image { url: String },
    /// Generic download link, labelled "File N".
    Document { url: String, label: String },
}

impl FileLink {
    pub fn url(&self) -> &str {
        match self {
            FileLink::Image { url } | FileLink::Document { url, .. } => url,
        }
    }
}

/// True when the URL ends in one of [`IMAGE_EXTENSIONS`], case-insensitively.
pub fn is_image_url(url: &str) -> bool {
    url.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    })
}

pub fn file_links(files: &[String]) -> Vec<FileLink> {
    files
        .iter()
        .enumerate()
        .map(|(i, url)| {
            if is_image_url(url) {
                FileLink::Image { url: url.clone() }
            } else {
                FileLink::Document {
                    url: url.clone(),
                    label: format!("File {}", i + 1),
                }
            }
        })
        .collect()
}

/// Whether a body needs the expand/collapse toggle at this limit.
pub fn is_truncatable(text: &str, limit: usize) -> bool {
    text.chars().count() > limit
}

/// Body as rendered on a card. Collapsed bodies over `limit` characters are
/// cut at `limit` and suffixed with `...`.
pub fn render_body(text: &str, limit: usize, expanded: bool) -> Cow<'_, str> {
    if expanded || !is_truncatable(text, limit) {
        return Cow::Borrowed(text);
    }
    let cut: String = text.chars().take(limit).collect();
    Cow::Owned(format!("{}...", cut))
}

/// Abbreviated id used in compact listings.
pub fn short_id(record_id: &str) -> String {
    let prefix: String = record_id.chars().take(8).collect();
    format!("{}...", prefix)
}

/// Everything a front-end needs to draw one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCard {
    pub record_id: String,
    pub short_id: String,
    pub department: String,
    pub status: TicketStatus,
    pub tone: BadgeTone,
    pub body: String,
    /// Whether the expand/collapse toggle is shown.
    pub truncatable: bool,
    pub expanded: bool,
    pub files: Vec<FileLink>,
}

impl TicketCard {
    pub fn build(ticket: &Ticket, variant: BoardVariant, expanded: bool) -> Self {
        let limit = variant.truncate_at();
        let status = ticket.display_status();
        Self {
            record_id: ticket.record_id.clone(),
            short_id: short_id(&ticket.record_id),
            department: ticket.department.clone(),
            status,
            tone: status.into(),
            body: render_body(&ticket.ticket_text, limit, expanded).into_owned(),
            truncatable: is_truncatable(&ticket.ticket_text, limit),
            expanded,
            files: file_links(&ticket.ticket_files),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(text: &str, files: &[&str]) -> Ticket {
        Ticket {
            record_id: "0123456789abcdef".into(),
            ticket_text: text.into(),
            ticket_files: files.iter().map(|s| s.to_string()).collect(),
            department: "Finance".into(),
            status: None,
        }
    }

    #[test]
    fn image_detection_matches_extension_set() {
        assert!(is_image_url("https://cdn.example.com/a/receipt.PNG"));
        assert!(is_image_url("https://cdn.example.com/photo.jpeg"));
        assert!(is_image_url("x.WebP"));
        assert!(!is_image_url("https://cdn.example.com/statement.pdf"));
        assert!(!is_image_url("https://cdn.example.com/png"));
        assert!(!is_image_url("https://cdn.example.com/receipt.png?sig=1"));
        assert!(!is_image_url("https://cdn.example.com/archive.png.zip"));
    }

    #[test]
    fn documents_are_numbered_by_position() {
        let links = file_links(&[
            "https://h/a.png".to_string(),
            "https://h/b.pdf".to_string(),
        ]);
        assert_eq!(
            links[1],
            FileLink::Document {
                url: "https://h/b.pdf".into(),
                label: "File 2".into()
            }
        );
        assert!(matches!(links[0], FileLink::Image { .. }));
    }

    #[test]
    fn short_bodies_are_not_truncated() {
        let text = "a".repeat(80);
        assert_eq!(render_body(&text, 80, false), text);
        assert!(!is_truncatable(&text, 80));
    }

    #[test]
    fn long_bodies_are_cut_at_the_limit() {
        let text = "b".repeat(121);
        let rendered = render_body(&text, 120, false);
        assert_eq!(rendered.len(), 123);
        assert!(rendered.ends_with("b..."));
        assert_eq!(render_body(&text, 120, true), text);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(81);
        let rendered = render_body(&text, 80, false);
        assert_eq!(rendered.chars().count(), 83);
    }

    #[test]
    fn card_for_unset_status_shows_open() {
        for variant in [BoardVariant::User, BoardVariant::Department, BoardVariant::Admin] {
            let card = TicketCard::build(&ticket("short", &[]), variant, false);
            assert_eq!(card.status.to_string(), "Open");
            assert_eq!(card.tone, BadgeTone::Pending);
        }
    }

    #[test]
    fn variants_use_their_own_threshold() {
        let text = "c".repeat(100);
        let user = TicketCard::build(&ticket(&text, &[]), BoardVariant::User, false);
        let admin = TicketCard::build(&ticket(&text, &[]), BoardVariant::Admin, false);
        assert!(user.truncatable);
        assert!(!admin.truncatable);
        assert_eq!(user.short_id, "01234567...");
    }
}
