//! Shared helpers.

pub mod http;

pub use http::{build_client, USER_AGENT};
