//! Outcome types and the result-state decision.

use crate::state::{EntityId, UnitFlags, UnitState, UnitStatus};

use super::total_damage;

/// Condition a target is left in after being hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResultState {
    Idle,
    Down,
    Dead,
}

impl From<ResultState> for UnitStatus {
    fn from(result: ResultState) -> Self {
        match result {
            ResultState::Idle => UnitStatus::Idle,
            ResultState::Down => UnitStatus::Down,
            ResultState::Dead => UnitStatus::Dead,
        }
    }
}

/// Damage and resulting condition for one target. Never mutated after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub target: EntityId,
    pub damage: u32,
    pub result: ResultState,
}

/// Decides the result state of a hit.
///
/// A hit that empties health downs a revivable target unless it is fatal;
/// everything else that empties health kills.
pub fn resolve_state(health: u32, damage: u32, revivable: bool, fatal: bool) -> ResultState {
    if health > damage {
        ResultState::Idle
    } else if revivable && !fatal {
        ResultState::Down
    } else {
        ResultState::Dead
    }
}

/// Computes the outcome of `attacker_damage` striking `target`.
pub fn compute_outcome<I>(target: &UnitState, attacker_damage: I, fatal: bool) -> Outcome
where
    I: IntoIterator<Item = u32>,
{
    let damage = total_damage(attacker_damage, target.health.armor);
    Outcome {
        target: target.id,
        damage,
        result: resolve_state(
            target.health.current,
            damage,
            target.has(UnitFlags::REVIVABLE),
            fatal,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Health, Position, TeamId};

    #[test]
    fn emptied_revivable_target_goes_down() {
        assert_eq!(resolve_state(10, 10, true, false), ResultState::Down);
    }

    #[test]
    fn fatal_hit_kills_revivable_target() {
        assert_eq!(resolve_state(10, 10, true, true), ResultState::Dead);
        assert_eq!(resolve_state(10, 12, false, false), ResultState::Dead);
    }

    #[test]
    fn surviving_target_stays_idle() {
        assert_eq!(resolve_state(10, 4, true, false), ResultState::Idle);
    }

    #[test]
    fn outcome_uses_target_armor() {
        let target = UnitState::new(EntityId(9), TeamId(1), Position::ORIGIN)
            .with_health(Health::new(4, 2))
            .with_flags(UnitFlags::REVIVABLE);

        let outcome = compute_outcome(&target, [5], false);
        assert_eq!(outcome.damage, 3);
        assert_eq!(outcome.result, ResultState::Idle);

        let outcome = compute_outcome(&target, [5, 3], false);
        assert_eq!(outcome.damage, 4);
        assert_eq!(outcome.result, ResultState::Down);
    }
}
