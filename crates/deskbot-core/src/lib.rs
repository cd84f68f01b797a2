//! Domain layer for Deskbot.
//!
//! Holds the conversation and ticket models, the rendering rules shared by
//! every ticket board, the [`HelpdeskApi`](api::HelpdeskApi) contract and the
//! client configuration.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod ticket;

// Re-export common error type
pub use error::DeskError;
