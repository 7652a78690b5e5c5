//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single writer of the game state: it owns the
//! action queue and ticks it on a fixed timestep.

mod simulation;

pub use simulation::{Command, SimulationWorker};
