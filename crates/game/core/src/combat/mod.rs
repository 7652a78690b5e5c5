//! Combat outcome computation.
//!
//! Pure functions turning a validated strike or fire mission into an
//! [`Outcome`] without touching the world, so the sending and the receiving
//! peer compute identical results. Direct attacks, counters, and fire missions
//! all funnel through [`compute_outcome`].
//!
//! - `damage`: armor-reduced damage totals and the single health writer
//! - `result`: [`Outcome`] and the idle/down/dead decision
//! - `plan`: strike and barrage plans carried by enriched requests

pub mod damage;
pub mod plan;
pub mod result;

pub use damage::{apply_outcome, total_damage};
pub use plan::{BarragePlan, StrikePlan, plan_barrage, plan_strike};
pub use result::{Outcome, ResultState, compute_outcome, resolve_state};
