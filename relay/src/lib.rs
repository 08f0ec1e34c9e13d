//! Webhook relay - forwards GitHub Sponsors and Sentry webhooks to Discord.
//!
//! ## Architecture
//!
//! ```text
//! Webhook → signature check → classify → format → Discord
//! ```
//!
//! The HTTP response is sent as soon as the event is classified; formatting
//! and delivery run in a background task.

pub mod config;
pub mod dispatch;
pub mod event;
pub mod format;
pub mod profile;
pub mod util;
pub mod web;

// Re-export commonly used types
pub use config::{Config, Environment};
pub use dispatch::{Dispatcher, DispatchError};
pub use format::OutboundMessage;
pub use profile::ProfileClient;
pub use web::{router, AppState};
