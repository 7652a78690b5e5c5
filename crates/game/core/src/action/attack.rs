use crate::combat::{ResultState, StrikePlan, apply_outcome, plan_strike};
use crate::state::{EntityId, UnitFlags};
use crate::targeting::{get_attackers, select_counter_target};
use crate::view::{WorldMut, WorldView};

use super::{
    ActionDefinition, ActionError, ActionKind, AttackRequest, Cue, Outbox, Request, Timer,
    live_target, mismatch, ready_actor,
};

/// Direct attack by the actor and every allied unit able to join it.
///
/// Damage lands in `on_start`; the action then holds the queue for
/// `hit_duration_ms` and finally resolves destruction or a counter attack.
#[derive(Clone, Debug, Default)]
pub struct AttackDefinition {
    timer: Timer,
    started: bool,
}

fn unpack(request: &Request) -> Option<(&AttackRequest, &StrikePlan)> {
    match request {
        Request::Attack(request) => request.plan.as_ref().map(|plan| (request, plan)),
        _ => None,
    }
}

impl ActionDefinition for AttackDefinition {
    fn kind(&self) -> ActionKind {
        ActionKind::Attack
    }

    fn validate(&self, world: &dyn WorldView, request: &Request) -> Result<Request, ActionError> {
        let Request::Attack(request) = request else {
            return Err(mismatch(ActionKind::Attack, request));
        };
        let actor = ready_actor(world, request.actor)?;
        if actor.combat.is_none() {
            return Err(ActionError::InvalidTarget(request.target));
        }
        let target = live_target(world, request.target)?;
        if world.config().is_allied(actor.team, target.team) {
            return Err(ActionError::InvalidTarget(target.id));
        }

        let candidates = get_attackers(world, target.id);
        if !candidates.contains(&actor.id) {
            return Err(ActionError::OutOfRange);
        }
        // The actor leads; allies in range join in id order.
        let attackers: Vec<EntityId> = std::iter::once(actor.id)
            .chain(candidates.into_iter().filter(|id| {
                *id != actor.id
                    && world
                        .unit(*id)
                        .is_some_and(|unit| world.config().is_allied(unit.team, actor.team))
            }))
            .collect();

        let plan =
            plan_strike(world, target.id, &attackers).ok_or(ActionError::InvalidTarget(target.id))?;
        Ok(Request::Attack(AttackRequest {
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
        // The leader pays first; without its action nobody strikes.
        if !world.spend_action(request.actor) {
            return;
        }
        for attacker in plan.attackers.iter().filter(|id| **id != request.actor) {
            world.spend_action(*attacker);
        }
        self.started = true;
        if apply_outcome(world, &plan.outcome) {
            outbox.cue(Cue::Hit {
                target: plan.outcome.target,
                damage: plan.outcome.damage,
                result: plan.outcome.result,
            });
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
        !self.started || self.timer.reached(world.config().hit_duration_ms)
    }

    fn on_end(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((_, plan)) = unpack(request).filter(|_| self.started) else {
            return;
        };
        let outcome = plan.outcome;
        if outcome.result != ResultState::Idle {
            outbox.cue(Cue::Destroyed {
                unit: outcome.target,
                result: outcome.result,
            });
            return;
        }

        let counters = world
            .unit(outcome.target)
            .is_some_and(|unit| unit.is_alive() && unit.has(UnitFlags::COUNTER_ATTACK));
        if !counters {
            return;
        }
        if let Some(victim) = select_counter_target(&*world, outcome.target, &plan.attackers) {
            outbox.follow_up(Request::counter_attack(outcome.target, victim));
        }
    }
}
