//! Damage totals and application.

use crate::state::UnitStatus;
use crate::view::WorldMut;

use super::{Outcome, ResultState};

/// Total damage dealt to a target by a group of attackers.
///
/// # Formula
///
/// ```text
/// total = Σ max(0, attacker_damage - armor)
/// ```
///
/// Each attacker is reduced by armor separately, so weak attackers contribute
/// nothing against heavy armor instead of pooling through it.
pub fn total_damage<I>(attacker_damage: I, armor: u32) -> u32
where
    I: IntoIterator<Item = u32>,
{
    attacker_damage
        .into_iter()
        .map(|damage| damage.saturating_sub(armor))
        .fold(0u32, u32::saturating_add)
}

/// Writes an outcome into the target's health component.
///
/// Returns `false` (and changes nothing) when the target vanished or is no
/// longer alive; the action lifecycle treats that as a skipped effect. A
/// downed unit is never brought back by a strike.
pub fn apply_outcome(world: &mut dyn WorldMut, outcome: &Outcome) -> bool {
    let Some(target) = world.unit(outcome.target) else {
        return false;
    };
    if !target.is_alive() {
        return false;
    }

    let (current, status) = match outcome.result {
        ResultState::Idle => (
            target.health.current.saturating_sub(outcome.damage),
            UnitStatus::Idle,
        ),
        ResultState::Down => (0, UnitStatus::Down),
        ResultState::Dead => (0, UnitStatus::Dead),
    };
    world.set_health(outcome.target, current, status)
}
