//! Chat domain module.
//!
//! - `message`: message types (`Sender`, `ChatMessage`, `ChatImage`)
//! - `session`: the conversation record (`Session`)

mod message;
mod session;

pub use message::{ChatImage, ChatMessage, Sender};
pub use session::{new_record_id, Session};
