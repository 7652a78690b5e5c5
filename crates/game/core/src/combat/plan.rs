//! Strike and barrage plans.
//!
//! A plan is the derived half of an attack request: who strikes, whether the
//! hit is fatal, and the precomputed outcome. The sender computes it during
//! validation and ships it so every peer applies the same numbers.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::spatial::Rect;
use crate::state::{EntityId, Position, UnitFlags};
use crate::targeting::units_in_area;
use crate::view::WorldView;

use super::{Outcome, compute_outcome};

/// Attackers bound to one direct strike and its outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikePlan {
    pub attackers: ArrayVec<EntityId, { GameConfig::MAX_ATTACKERS }>,
    /// Any bulldozer among the attackers makes the hit fatal.
    pub fatal: bool,
    pub outcome: Outcome,
}

/// Area and per-victim outcomes of a fire mission.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarragePlan {
    pub area: Rect,
    pub fatal: bool,
    pub outcomes: Vec<Outcome>,
}

impl BarragePlan {
    pub fn outcome_for(&self, target: EntityId) -> Option<&Outcome> {
        self.outcomes.iter().find(|outcome| outcome.target == target)
    }
}

/// Plans `attackers` striking `target` together.
///
/// Returns `None` when the target is not alive, an attacker is missing or
/// unarmed, or no attacker is given. Attackers past
/// [`GameConfig::MAX_ATTACKERS`] are ignored.
pub fn plan_strike<W: WorldView + ?Sized>(
    world: &W,
    target: EntityId,
    attackers: &[EntityId],
) -> Option<StrikePlan> {
    let target = world.unit(target).filter(|unit| unit.is_alive())?;

    let mut bound = ArrayVec::new();
    let mut damage = ArrayVec::<u32, { GameConfig::MAX_ATTACKERS }>::new();
    let mut fatal = false;
    for id in attackers {
        if bound.is_full() {
            break;
        }
        let attacker = world.unit(*id)?;
        let combat = attacker.combat?;
        bound.push(*id);
        damage.push(combat.damage);
        fatal |= attacker.has(UnitFlags::BULLDOZER);
    }
    if bound.is_empty() {
        return None;
    }

    Some(StrikePlan {
        attackers: bound,
        fatal,
        outcome: compute_outcome(target, damage, fatal),
    })
}

/// Plans a fire mission by `actor` centred on `target`.
///
/// Every live unit other than the caller inside the blast square is hit once
/// with the caller's damage. Returns `None` if the caller is missing or has no
/// combat component; the outcome list may be empty.
pub fn plan_barrage<W>(world: &W, actor: EntityId, target: Position) -> Option<BarragePlan>
where
    W: WorldView + ?Sized,
{
    let actor = world.unit(actor)?;
    let combat = actor.combat?;
    let area = Rect::tile(target).inflate(world.config().fire_mission_radius);
    let fatal = actor.has(UnitFlags::BULLDOZER);

    let outcomes = units_in_area(world, area, Some(actor.id))
        .into_iter()
        .filter_map(|id| world.unit(id))
        .map(|victim| compute_outcome(victim, [combat.damage], fatal))
        .collect();

    Some(BarragePlan {
        area,
        fatal,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ResultState;
    use crate::state::{
        CombatStats, GameState, Health, MapDimensions, TeamId, TerrainKind, TileMap, TurnState,
        UnitState,
    };

    fn field() -> GameState {
        GameState::new(
            GameConfig::default(),
            TileMap::filled(MapDimensions::new(8, 8), TerrainKind::Plain),
            TurnState::default(),
        )
    }

    fn armed(id: u32, team: u8, x: i32, y: i32, damage: u32) -> UnitState {
        UnitState::new(EntityId(id), TeamId(team), Position::new(x, y))
            .with_combat(CombatStats::new(damage, 1))
    }

    #[test]
    fn strike_sums_armor_reduced_damage() {
        let mut state = field();
        state
            .add_unit(armed(1, 1, 3, 3, 1).with_health(Health::new(10, 2)))
            .unwrap();
        state.add_unit(armed(2, 0, 2, 3, 5)).unwrap();
        state.add_unit(armed(3, 0, 4, 3, 1)).unwrap();

        let plan = plan_strike(&state, EntityId(1), &[EntityId(2), EntityId(3)]).unwrap();

        assert_eq!(plan.attackers.as_slice(), &[EntityId(2), EntityId(3)]);
        assert!(!plan.fatal);
        assert_eq!(plan.outcome.damage, 3);
        assert_eq!(plan.outcome.result, ResultState::Idle);
    }

    #[test]
    fn bulldozer_makes_the_strike_fatal() {
        let mut state = field();
        state
            .add_unit(
                armed(1, 1, 3, 3, 1)
                    .with_health(Health::new(4, 0))
                    .with_flags(UnitFlags::REVIVABLE),
            )
            .unwrap();
        state
            .add_unit(armed(2, 0, 2, 3, 5).with_flags(UnitFlags::BULLDOZER))
            .unwrap();

        let plan = plan_strike(&state, EntityId(1), &[EntityId(2)]).unwrap();
        assert!(plan.fatal);
        assert_eq!(plan.outcome.result, ResultState::Dead);
    }

    #[test]
    fn strike_needs_armed_attackers() {
        let mut state = field();
        state.add_unit(armed(1, 1, 3, 3, 1)).unwrap();
        state
            .add_unit(UnitState::new(EntityId(2), TeamId(0), Position::new(2, 3)))
            .unwrap();

        assert!(plan_strike(&state, EntityId(1), &[EntityId(2)]).is_none());
        assert!(plan_strike(&state, EntityId(1), &[]).is_none());
    }

    #[test]
    fn barrage_hits_every_live_unit_in_the_square_but_the_caller() {
        let mut state = field();
        state.add_unit(armed(1, 0, 0, 0, 6)).unwrap();
        state.add_unit(armed(2, 1, 4, 4, 1)).unwrap();
        state.add_unit(armed(3, 0, 5, 5, 1)).unwrap();
        state.add_unit(armed(4, 1, 7, 7, 1)).unwrap();

        let plan = plan_barrage(&state, EntityId(1), Position::new(4, 4)).unwrap();

        assert_eq!(plan.area, Rect::new(3, 3, 3, 3));
        let hit: Vec<_> = plan.outcomes.iter().map(|outcome| outcome.target).collect();
        assert_eq!(hit, vec![EntityId(2), EntityId(3)]);
        assert_eq!(plan.outcome_for(EntityId(3)).unwrap().damage, 6);
    }
}
