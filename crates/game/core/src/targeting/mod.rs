//! Reachability and targeting resolution.
//!
//! Consumes [`crate::spatial`] plus unit stats, passability, and alliances to
//! answer "where may this unit move" and "who may strike this target".

mod attackers;
mod reachability;

pub use attackers::{
    attack_reach, get_attackers, get_counter_movers, in_attack_range, select_counter_target,
    units_in_area,
};
pub use reachability::{can_bypass, extract_path, generate_reachable_tiles, is_walkable};
