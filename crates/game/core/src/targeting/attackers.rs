//! Attacker, counter, and area selection.

use crate::spatial::Rect;
use crate::state::{EntityId, UnitFlags, UnitState};
use crate::view::WorldView;

/// Tiles a unit can strike: its footprint grown by its attack range.
pub fn attack_reach(unit: &UnitState) -> Option<Rect> {
    unit.combat
        .map(|combat| Rect::of(unit.position, unit.footprint).inflate(combat.range))
}

pub fn in_attack_range(attacker: &UnitState, target: &UnitState) -> bool {
    attack_reach(attacker)
        .is_some_and(|reach| reach.intersects(&Rect::of(target.position, target.footprint)))
}

/// Units able to strike `target_id` right now, ordered by ascending id.
///
/// Candidates are first narrowed to the box within the configured maximum
/// attack range of the target, then filtered to live enemies that still have
/// an action and whose own range covers the target's footprint.
pub fn get_attackers<W>(world: &W, target_id: EntityId) -> Vec<EntityId>
where
    W: WorldView + ?Sized,
{
    let Some(target) = world.unit(target_id) else {
        return Vec::new();
    };
    let config = world.config();
    let pool = Rect::of(target.position, target.footprint).inflate(config.max_attack_range);

    let mut attackers: Vec<EntityId> = world
        .units()
        .iter()
        .filter(|candidate| candidate.id != target.id)
        .filter(|candidate| Rect::of(candidate.position, candidate.footprint).intersects(&pool))
        .filter(|candidate| candidate.is_alive() && candidate.actions_left > 0)
        .filter(|candidate| !config.is_allied(candidate.team, target.team))
        .filter(|candidate| in_attack_range(candidate, target))
        .map(|candidate| candidate.id)
        .collect();
    attackers.sort_unstable();
    attackers
}

/// Picks the weakest unit among `candidates` that `defender_id` can strike back.
///
/// Only live enemies inside the defender's range qualify. The unit with the
/// lowest current health wins; on a tie the earliest candidate is kept.
pub fn select_counter_target<W: WorldView + ?Sized>(
    world: &W,
    defender_id: EntityId,
    candidates: &[EntityId],
) -> Option<EntityId> {
    let defender = world.unit(defender_id).filter(|unit| unit.is_alive())?;
    let config = world.config();

    let mut weakest: Option<&UnitState> = None;
    for candidate in candidates.iter().filter_map(|id| world.unit(*id)) {
        if !candidate.is_alive()
            || config.is_allied(candidate.team, defender.team)
            || !in_attack_range(defender, candidate)
        {
            continue;
        }
        if weakest.is_none_or(|best| candidate.health.current < best.health.current) {
            weakest = Some(candidate);
        }
    }
    weakest.map(|unit| unit.id)
}

/// Live enemies of `mover_id` that react to it finishing a move in their range.
pub fn get_counter_movers<W>(world: &W, mover_id: EntityId) -> Vec<EntityId>
where
    W: WorldView + ?Sized,
{
    let Some(mover) = world.unit(mover_id) else {
        return Vec::new();
    };
    let config = world.config();

    let mut reactors: Vec<EntityId> = world
        .units()
        .iter()
        .filter(|unit| unit.id != mover.id && unit.is_alive())
        .filter(|unit| unit.has(UnitFlags::COUNTER_MOVE))
        .filter(|unit| !config.is_allied(unit.team, mover.team))
        .filter(|unit| in_attack_range(unit, mover))
        .map(|unit| unit.id)
        .collect();
    reactors.sort_unstable();
    reactors
}

/// Live units whose footprint touches `area`, optionally excluding one unit.
pub fn units_in_area<W>(world: &W, area: Rect, except: Option<EntityId>) -> Vec<EntityId>
where
    W: WorldView + ?Sized,
{
    world
        .units()
        .iter()
        .filter(|unit| Some(unit.id) != except && unit.is_alive())
        .filter(|unit| Rect::of(unit.position, unit.footprint).intersects(&area))
        .map(|unit| unit.id)
        .collect()
}
