//! Ticket domain module.
//!
//! - `model`: wire and domain types (`Ticket`, `TicketStatus`, `Department`)
//! - `board`: rendering rules shared by all boards (`TicketCard`, `FileLink`)
//! - `attachment`: files selected for upload (`PendingAttachment`)

mod attachment;
pub mod board;
mod model;

pub use attachment::{AttachmentKind, AttachmentPreview, PendingAttachment};
pub use board::{BadgeTone, BoardVariant, FileLink, TicketCard};
pub use model::{Department, Ticket, TicketStatus};
