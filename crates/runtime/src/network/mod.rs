//! Network boundary.
//!
//! The engine never owns a transport. A non-authoritative peer hands enriched
//! requests to a [`RequestForwarder`] and later receives the host's accepted
//! stream through the authoritative intake. [`wire`] fixes the JSON layout
//! both ends agree on, and [`RequestLog`] keeps the accepted stream on disk so
//! a session can be replayed.
mod error;
mod forwarder;
mod log;
pub mod wire;

pub use error::{NetworkError, Result};
pub use forwarder::{ChannelForwarder, RequestForwarder};
pub use log::{RequestLog, replay};
