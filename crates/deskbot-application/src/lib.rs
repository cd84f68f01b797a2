//! Application layer for Deskbot.
//!
//! Controllers that sit between a front-end and the
//! [`HelpdeskApi`](deskbot_core::api::HelpdeskApi): each one owns the state
//! of one screen or dialog and merges backend responses into it.

pub mod board;
pub mod chat_session;
pub mod department;
pub mod knowledge;
pub mod notice;
pub mod ticket_escalation;
pub mod ticket_store;

#[cfg(test)]
mod mock_api;

pub use board::TicketBoard;
pub use chat_session::{ChatSession, Composer, SendOutcome};
pub use department::{DepartmentDesk, Explanation};
pub use knowledge::KnowledgeInjection;
pub use notice::Notice;
pub use ticket_escalation::TicketEscalation;
pub use ticket_store::TicketStore;
