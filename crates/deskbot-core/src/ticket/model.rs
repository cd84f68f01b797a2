//! Ticket domain model.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Canonical ticket lifecycle states.
///
/// Backends have been seen to send only a subset of these (`Open`/`Resolved`),
/// and sometimes no status at all; see [`Ticket::display_status`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    #[strum(to_string = "In Progress", serialize = "in_progress", serialize = "inprogress")]
    InProgress,
    Resolved,
    Closed,
}

/// Departments a ticket can be routed to.
///
/// Tickets carry their department as a plain string on the wire; this enum
/// is the selectable set offered to department staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Department {
    Finance,
    Network,
    #[strum(to_string = "ATM switch", serialize = "atm")]
    AtmSwitch,
    #[strum(to_string = "Mail Messaging", serialize = "mail")]
    MailMessaging,
}

/// A support request as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "recordId")]
    pub record_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticket_text: String,
    /// Backend-hosted URLs, in upload order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticket_files: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<TicketStatus>,
}

impl Ticket {
    /// Status shown to users. A ticket without a status is `Open`.
    pub fn display_status(&self) -> TicketStatus {
        self.status.unwrap_or(TicketStatus::Open)
    }

    /// Applies a department update locally: sets the status and appends the
    /// remarks annotation to the body.
    pub fn apply_update(&mut self, status: TicketStatus, remarks: &str) {
        self.status = Some(status);
        if !remarks.trim().is_empty() {
            self.ticket_text.push_str(&format!("\n\n[Updated: {}]", remarks));
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unknown or empty status strings become `None` instead of failing the
/// whole ticket list.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<TicketStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        match TicketStatus::from_str(trimmed) {
            Ok(status) => Some(status),
            Err(_) => {
                tracing::warn!(status = %trimmed, "Unrecognized ticket status; treating as unset");
                None
            }
        }
    }))
}
