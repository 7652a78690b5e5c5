//! Runtime orchestration for the action execution engine.
//!
//! This crate wires the deterministic rules of `game-core` into a running
//! session: requests are validated and queued by the scheduler, a worker task
//! ticks the active action on a fixed timestep, and peers exchange enriched
//! requests across the network boundary.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`scheduler`] owns the action registry and the FIFO queue
//! - [`network`] holds the forwarding seam, the wire codec, and the request log
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod network;
pub mod runtime;
pub mod scheduler;

mod workers;

#[cfg(test)]
mod testing;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, NetworkEvent, QueueEvent, Topic};
pub use network::{ChannelForwarder, NetworkError, RequestForwarder, RequestLog};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scheduler::{
    ActionQueue, ActionRegistry, Authority, DEFAULT_CAPACITY, RegistryError, Rejection,
    Submission, TickReport,
};
