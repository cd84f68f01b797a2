//! Transport layer for Deskbot.
//!
//! Provides [`HttpHelpdeskApi`], the HTTP implementation of
//! [`deskbot_core::api::HelpdeskApi`].

mod http_api;

pub use http_api::HttpHelpdeskApi;
