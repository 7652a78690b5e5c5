use crate::state::UnitState;
use crate::targeting::{extract_path, generate_reachable_tiles, get_counter_movers};
use crate::view::{WorldMut, WorldView};

use super::{
    ActionDefinition, ActionError, ActionKind, Cue, MovePlan, MoveRequest, Outbox, Request,
    Timer, mismatch, ready_actor,
};

/// Walks a unit along its derived path, one tile per `move_step_ms`.
///
/// The unit's stored position only changes at the end; intermediate tiles are
/// reported as cues for interpolation. A move whose start found the unit
/// elsewhere than the plan's origin, or without an action, does nothing.
#[derive(Clone, Debug, Default)]
pub struct MoveDefinition {
    timer: Timer,
    walked: usize,
    started: bool,
}

impl MoveDefinition {
    fn unpack(request: &Request) -> Option<(&MoveRequest, &MovePlan)> {
        match request {
            Request::Move(request) => request.plan.as_ref().map(|plan| (request, plan)),
            _ => None,
        }
    }
}

impl ActionDefinition for MoveDefinition {
    fn kind(&self) -> ActionKind {
        ActionKind::Move
    }

    fn validate(&self, world: &dyn WorldView, request: &Request) -> Result<Request, ActionError> {
        let Request::Move(request) = request else {
            return Err(mismatch(ActionKind::Move, request));
        };
        let actor = ready_actor(world, request.actor)?;
        if world.is_out_of_bounds(request.target) {
            return Err(ActionError::OutOfBounds(request.target));
        }

        let nodes = generate_reachable_tiles(world, actor.id);
        let path = extract_path(&nodes, request.target)
            .ok_or(ActionError::Unreachable(request.target))?;
        if path.is_empty() {
            return Err(ActionError::EmptyPath);
        }

        Ok(Request::Move(MoveRequest {
            plan: Some(MovePlan {
                origin: actor.position,
                destination: request.target,
                path,
                captures: captures(world, actor, request),
            }),
            ..request.clone()
        }))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn on_start(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((request, plan)) = Self::unpack(request) else {
            return;
        };
        let in_place = world
            .unit(request.actor)
            .is_some_and(|unit| unit.is_alive() && unit.position == plan.origin);
        if !in_place || !world.spend_action(request.actor) {
            return;
        }
        self.started = true;
        outbox.cue(Cue::MoveStarted {
            unit: request.actor,
            from: plan.origin,
            to: plan.destination,
        });
    }

    fn on_update(
        &mut self,
        world: &mut dyn WorldMut,
        request: &Request,
        delta_ms: u32,
        outbox: &mut Outbox,
    ) {
        let Some((request, plan)) = Self::unpack(request).filter(|_| self.started) else {
            return;
        };
        self.timer.advance(delta_ms);

        let step_ms = world.config().move_step_ms;
        let due = match step_ms {
            0 => plan.path.len(),
            step_ms => (self.timer.elapsed_ms / step_ms) as usize,
        }
        .min(plan.path.len());

        for position in plan.waypoints().skip(self.walked).take(due.saturating_sub(self.walked)) {
            outbox.cue(Cue::Stepped {
                unit: request.actor,
                position,
            });
        }
        self.walked = self.walked.max(due);
    }

    fn is_finished(&self, _world: &dyn WorldView, request: &Request) -> bool {
        !self.started
            || Self::unpack(request).is_none_or(|(_, plan)| self.walked >= plan.path.len())
    }

    fn on_end(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((request, plan)) = Self::unpack(request).filter(|_| self.started) else {
            return;
        };
        let Some(team) = world.unit(request.actor).map(|unit| unit.team) else {
            return;
        };
        if !world.set_position(request.actor, plan.destination) {
            return;
        }
        if plan.captures && world.set_tile_owner(plan.destination, team) {
            outbox.cue(Cue::Captured {
                position: plan.destination,
                team,
            });
        }

        for reactor in get_counter_movers(&*world, request.actor) {
            outbox.follow_up(Request::counter_move(reactor, request.actor));
        }
    }
}

fn captures(world: &dyn WorldView, actor: &UnitState, request: &MoveRequest) -> bool {
    world
        .tile(request.target)
        .and_then(|tile| tile.owner)
        .is_some_and(|owner| !world.config().is_allied(owner, actor.team))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, Position, TeamId, TerrainKind, Tile, UnitFlags};
    use crate::testing::{drive, field, gunner, trooper};

    #[test]
    fn validation_derives_a_path_and_is_idempotent() {
        let mut state = field(6, 6);
        state.add_unit(trooper(1, 0, 1, 1)).unwrap();
        let definition = MoveDefinition::default();
        let raw = Request::move_to(EntityId(1), Position::new(3, 2));

        let first = definition.validate(&state, &raw).unwrap();
        let second = definition.validate(&state, &raw).unwrap();
        assert_eq!(first, second);

        let Request::Move(MoveRequest { plan: Some(plan), .. }) = &first else {
            panic!("move plan missing");
        };
        assert_eq!(plan.path.len(), 3);
        assert_eq!(plan.waypoints().last(), Some(Position::new(3, 2)));
        assert!(!plan.captures);

        // Revalidating an enriched request recomputes the same plan.
        assert_eq!(definition.validate(&state, &first).unwrap(), first);
    }

    #[test]
    fn rejects_unreachable_and_empty_moves() {
        let mut state = field(8, 8);
        state.add_unit(trooper(1, 0, 0, 0)).unwrap();
        let definition = MoveDefinition::default();

        assert_eq!(
            definition.validate(&state, &Request::move_to(EntityId(1), Position::new(7, 7))),
            Err(ActionError::Unreachable(Position::new(7, 7)))
        );
        assert_eq!(
            definition.validate(&state, &Request::move_to(EntityId(1), Position::new(0, 0))),
            Err(ActionError::EmptyPath)
        );
        assert_eq!(
            definition.validate(&state, &Request::move_to(EntityId(1), Position::new(-1, 0))),
            Err(ActionError::OutOfBounds(Position::new(-1, 0)))
        );
    }

    #[test]
    fn rejects_out_of_turn_and_exhausted_units() {
        let mut state = field(4, 4);
        state.add_unit(trooper(1, 1, 0, 0)).unwrap();
        state.add_unit(trooper(2, 0, 3, 3).with_actions(0)).unwrap();
        let definition = MoveDefinition::default();

        assert_eq!(
            definition.validate(&state, &Request::move_to(EntityId(1), Position::new(1, 0))),
            Err(ActionError::NotActiveTeam { team: TeamId(1) })
        );
        assert_eq!(
            definition.validate(&state, &Request::move_to(EntityId(2), Position::new(3, 2))),
            Err(ActionError::NoActionsLeft(EntityId(2)))
        );
    }

    #[test]
    fn walks_then_lands_and_captures() {
        let mut state = field(5, 1);
        *state.map.tile_mut(Position::new(2, 0)).unwrap() =
            Tile::new(TerrainKind::Plain).held_by(TeamId(1));
        state.add_unit(trooper(1, 0, 0, 0)).unwrap();
        let mut definition = MoveDefinition::default();
        let request = definition
            .validate(&state, &Request::move_to(EntityId(1), Position::new(2, 0)))
            .unwrap();

        let outbox = drive(&mut definition, &mut state, &request);

        let unit = state.unit(EntityId(1)).unwrap();
        assert_eq!(unit.position, Position::new(2, 0));
        assert_eq!(unit.actions_left, 0);
        assert_eq!(state.map.tile(Position::new(2, 0)).unwrap().owner, Some(TeamId(0)));

        let stepped = outbox
            .cues()
            .iter()
            .filter(|cue| matches!(cue, Cue::Stepped { .. }))
            .count();
        assert_eq!(stepped, 2);
        assert!(outbox.cues().contains(&Cue::Captured {
            position: Position::new(2, 0),
            team: TeamId(0),
        }));
    }

    #[test]
    fn ending_in_a_watched_zone_raises_counter_moves() {
        let mut state = field(6, 1);
        state.add_unit(trooper(1, 0, 0, 0)).unwrap();
        state
            .add_unit(gunner(9, 1, 5, 0, 2).with_flags(UnitFlags::COUNTER_MOVE))
            .unwrap();
        let mut definition = MoveDefinition::default();
        let request = definition
            .validate(&state, &Request::move_to(EntityId(1), Position::new(3, 0)))
            .unwrap();

        let outbox = drive(&mut definition, &mut state, &request);
        assert_eq!(
            outbox.follow_ups(),
            &[Request::counter_move(EntityId(9), EntityId(1))]
        );
    }

    #[test]
    fn vanished_mover_is_skipped() {
        let mut state = field(4, 1);
        state.add_unit(trooper(1, 0, 0, 0)).unwrap();
        let mut definition = MoveDefinition::default();
        let request = definition
            .validate(&state, &Request::move_to(EntityId(1), Position::new(2, 0)))
            .unwrap();
        state.units.clear();

        let outbox = drive(&mut definition, &mut state, &request);
        assert!(outbox.follow_ups().is_empty());
        assert!(!outbox.cues().iter().any(|cue| matches!(cue, Cue::MoveStarted { .. })));
    }

    #[test]
    fn displaced_or_exhausted_mover_stays_put() {
        let mut state = field(6, 6);
        state.add_unit(trooper(1, 0, 0, 0)).unwrap();
        let mut definition = MoveDefinition::default();
        let request = definition
            .validate(&state, &Request::move_to(EntityId(1), Position::new(2, 0)))
            .unwrap();

        // Something else moved the unit after the plan was derived.
        state.unit_mut(EntityId(1)).unwrap().position = Position::new(0, 3);
        let outbox = drive(&mut definition, &mut state, &request);
        let unit = state.unit(EntityId(1)).unwrap();
        assert_eq!(unit.position, Position::new(0, 3));
        assert_eq!(unit.actions_left, 1);
        assert!(outbox.is_empty());

        let unit = state.unit_mut(EntityId(1)).unwrap();
        unit.position = Position::new(0, 0);
        unit.actions_left = 0;
        let outbox = drive(&mut definition, &mut state, &request);
        assert_eq!(state.unit(EntityId(1)).unwrap().position, Position::new(0, 0));
        assert!(outbox.is_empty());
    }
}
