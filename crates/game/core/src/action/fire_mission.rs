use crate::combat::{BarragePlan, ResultState, apply_outcome, plan_barrage};
use crate::spatial::Rect;
use crate::state::UnitFlags;
use crate::view::{WorldMut, WorldView};

use super::{
    ActionDefinition, ActionError, ActionKind, Cue, FireMissionRequest, Outbox, Request, Timer,
    mismatch, ready_actor,
};

/// Artillery barrage on a square around a target tile.
#[derive(Clone, Debug, Default)]
pub struct FireMissionDefinition {
    timer: Timer,
    started: bool,
}

fn unpack(request: &Request) -> Option<(&FireMissionRequest, &BarragePlan)> {
    match request {
        Request::FireMission(request) => request.plan.as_ref().map(|plan| (request, plan)),
        _ => None,
    }
}

impl ActionDefinition for FireMissionDefinition {
    fn kind(&self) -> ActionKind {
        ActionKind::FireMission
    }

    fn validate(&self, world: &dyn WorldView, request: &Request) -> Result<Request, ActionError> {
        let Request::FireMission(request) = request else {
            return Err(mismatch(ActionKind::FireMission, request));
        };
        let actor = ready_actor(world, request.actor)?;
        let Some(combat) = actor.combat.filter(|_| actor.has(UnitFlags::ARTILLERY)) else {
            return Err(ActionError::MissingCapability {
                id: actor.id,
                required: UnitFlags::ARTILLERY,
            });
        };
        if world.is_out_of_bounds(request.target) {
            return Err(ActionError::OutOfBounds(request.target));
        }
        let reach = Rect::of(actor.position, actor.footprint).inflate(combat.fire_range);
        if !reach.contains(request.target) {
            return Err(ActionError::OutOfRange);
        }

        let plan = plan_barrage(world, actor.id, request.target).ok_or(ActionError::NoTargets)?;
        if plan.outcomes.is_empty() {
            return Err(ActionError::NoTargets);
        }
        Ok(Request::FireMission(FireMissionRequest {
            plan: Some(plan),
            ..request.clone()
        }))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn on_start(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((request, plan)) = unpack(request) else {
            return;
        };
        if !world.spend_action(request.actor) {
            return;
        }
        self.started = true;
        outbox.cue(Cue::Barrage { area: plan.area });
        for outcome in &plan.outcomes {
            if apply_outcome(world, outcome) {
                outbox.cue(Cue::Hit {
                    target: outcome.target,
                    damage: outcome.damage,
                    result: outcome.result,
                });
            }
        }
    }

    fn on_update(
        &mut self,
        _world: &mut dyn WorldMut,
        _request: &Request,
        delta_ms: u32,
        _outbox: &mut Outbox,
    ) {
        self.timer.advance(delta_ms);
    }

    fn is_finished(&self, world: &dyn WorldView, _request: &Request) -> bool {
        !self.started || self.timer.reached(world.config().fire_mission_ms)
    }

    fn on_end(&mut self, _world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((_, plan)) = unpack(request).filter(|_| self.started) else {
            return;
        };
        for outcome in plan
            .outcomes
            .iter()
            .filter(|outcome| outcome.result != ResultState::Idle)
        {
            outbox.cue(Cue::Destroyed {
                unit: outcome.target,
                result: outcome.result,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CombatStats, EntityId, Health, Position, UnitStatus};
    use crate::testing::{drive, field, trooper};

    fn battery(id: u32, x: i32, y: i32) -> crate::state::UnitState {
        trooper(id, 0, x, y)
            .with_combat(CombatStats::new(6, 1).with_fire_range(5))
            .with_flags(UnitFlags::ARTILLERY)
    }

    #[test]
    fn barrage_hits_friend_and_foe_in_the_area() {
        let mut state = field(8, 8);
        state.add_unit(battery(1, 0, 0)).unwrap();
        state
            .add_unit(trooper(2, 1, 4, 4).with_health(Health::new(6, 0)))
            .unwrap();
        state
            .add_unit(
                trooper(3, 0, 3, 4)
                    .with_health(Health::new(6, 0))
                    .with_flags(UnitFlags::REVIVABLE),
            )
            .unwrap();
        state.add_unit(trooper(4, 1, 4, 2)).unwrap();
        let mut definition = FireMissionDefinition::default();

        let request = definition
            .validate(&state, &Request::fire_mission(EntityId(1), Position::new(4, 4)))
            .unwrap();
        let outbox = drive(&mut definition, &mut state, &request);

        assert_eq!(state.unit(EntityId(2)).unwrap().status, UnitStatus::Dead);
        assert_eq!(state.unit(EntityId(3)).unwrap().status, UnitStatus::Down);
        assert_eq!(state.unit(EntityId(4)).unwrap().health.current, 10);
        assert_eq!(state.unit(EntityId(1)).unwrap().actions_left, 0);
        let destroyed = outbox
            .cues()
            .iter()
            .filter(|cue| matches!(cue, Cue::Destroyed { .. }))
            .count();
        assert_eq!(destroyed, 2);
    }

    #[test]
    fn requires_artillery_reach_and_victims() {
        let mut state = field(10, 10);
        state.add_unit(battery(1, 0, 0)).unwrap();
        state.add_unit(trooper(2, 0, 9, 9)).unwrap();
        let definition = FireMissionDefinition::default();

        assert_eq!(
            definition.validate(&state, &Request::fire_mission(EntityId(1), Position::new(8, 8))),
            Err(ActionError::OutOfRange)
        );
        assert_eq!(
            definition.validate(&state, &Request::fire_mission(EntityId(1), Position::new(4, 4))),
            Err(ActionError::NoTargets)
        );
        assert!(matches!(
            definition.validate(&state, &Request::fire_mission(EntityId(2), Position::new(8, 8))),
            Err(ActionError::MissingCapability { .. })
        ));
    }

    #[test]
    fn skipped_barrage_reports_nothing() {
        let mut state = field(8, 8);
        state.add_unit(battery(1, 0, 0)).unwrap();
        state
            .add_unit(trooper(2, 1, 4, 4).with_health(Health::new(6, 0)))
            .unwrap();
        let mut definition = FireMissionDefinition::default();
        let request = definition
            .validate(&state, &Request::fire_mission(EntityId(1), Position::new(4, 4)))
            .unwrap();
        state.unit_mut(EntityId(1)).unwrap().actions_left = 0;

        let outbox = drive(&mut definition, &mut state, &request);

        let target = state.unit(EntityId(2)).unwrap();
        assert_eq!(target.status, UnitStatus::Idle);
        assert_eq!(target.health.current, 6);
        assert!(outbox.is_empty());
    }
}
