//! Headless client for the action execution engine.
//!
//! Loads a scenario from the content directory, plays a script of raw
//! requests through the runtime, and renders the resulting events as
//! messages.
pub mod config;
pub mod message;
pub mod presentation;
pub mod session;

pub use config::ClientConfig;
pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use presentation::describe;
pub use session::{ScriptSummary, Session};
