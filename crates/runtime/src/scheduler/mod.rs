//! Request intake and sequential execution.
//!
//! [`ActionRegistry`] binds one definition to each action kind and is sealed
//! when a session starts. [`ActionQueue`] validates intents, decides whether
//! they run here or go to the authoritative peer, and ticks at most one active
//! action at a time.
mod authority;
mod queue;
mod registry;
mod rejection;

pub use authority::Authority;
pub use queue::{ActionQueue, DEFAULT_CAPACITY, Submission, TickReport};
pub use registry::{ActionRegistry, RegistryError};
pub use rejection::Rejection;
