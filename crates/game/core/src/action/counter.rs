use crate::combat::{ResultState, StrikePlan, apply_outcome, plan_strike};
use crate::targeting::in_attack_range;
use crate::view::{WorldMut, WorldView};

use super::{
    ActionDefinition, ActionError, ActionKind, CounterRequest, Cue, Outbox, Request, Timer,
    live_target, mismatch,
};

/// Reaction strike raised by the engine after an attack or a move.
///
/// One definition instance serves one counter kind. Counters cost no action
/// and never raise further follow-ups.
#[derive(Clone, Debug)]
pub struct CounterDefinition {
    kind: ActionKind,
    timer: Timer,
    landed: bool,
}

impl CounterDefinition {
    /// `kind` must be [`ActionKind::CounterAttack`] or [`ActionKind::CounterMove`].
    pub fn new(kind: ActionKind) -> Self {
        debug_assert!(kind.is_counter());
        Self {
            kind,
            timer: Timer::default(),
            landed: false,
        }
    }

    fn unpack<'r>(&self, request: &'r Request) -> Option<(&'r CounterRequest, &'r StrikePlan)> {
        self.matching(request)
            .and_then(|request| request.plan.as_ref().map(|plan| (request, plan)))
    }

    fn matching<'r>(&self, request: &'r Request) -> Option<&'r CounterRequest> {
        match (self.kind, request) {
            (ActionKind::CounterAttack, Request::CounterAttack(request))
            | (ActionKind::CounterMove, Request::CounterMove(request)) => Some(request),
            _ => None,
        }
    }

    fn wrap(&self, request: CounterRequest) -> Request {
        match self.kind {
            ActionKind::CounterMove => Request::CounterMove(request),
            _ => Request::CounterAttack(request),
        }
    }
}

impl ActionDefinition for CounterDefinition {
    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn validate(&self, world: &dyn WorldView, request: &Request) -> Result<Request, ActionError> {
        let counter = self
            .matching(request)
            .ok_or_else(|| mismatch(self.kind, request))?;

        let attacker = world
            .unit(counter.attacker)
            .ok_or(ActionError::ActorNotFound(counter.attacker))?;
        if !attacker.is_alive() {
            return Err(ActionError::ActorDead(attacker.id));
        }
        let target = live_target(world, counter.target)?;
        if world.config().is_allied(attacker.team, target.team) {
            return Err(ActionError::InvalidTarget(target.id));
        }
        if !in_attack_range(attacker, target) {
            return Err(ActionError::OutOfRange);
        }

        let plan = plan_strike(world, target.id, &[attacker.id])
            .ok_or(ActionError::InvalidTarget(target.id))?;
        Ok(self.wrap(CounterRequest {
            plan: Some(plan),
            ..counter.clone()
        }))
    }

    fn clear(&mut self) {
        self.timer = Timer::default();
        self.landed = false;
    }

    fn on_start(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((_, plan)) = self.unpack(request) else {
            return;
        };
        self.landed = apply_outcome(world, &plan.outcome);
        if self.landed {
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
        self.timer.reached(world.config().hit_duration_ms)
    }

    fn on_end(&mut self, _world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((_, plan)) = self.unpack(request).filter(|_| self.landed) else {
            return;
        };
        if plan.outcome.result != ResultState::Idle {
            outbox.cue(Cue::Destroyed {
                unit: plan.outcome.target,
                result: plan.outcome.result,
            });
        }
    }
}
