//! Structural checks for authoritative requests.
//!
//! A peer that is not authoritative never re-runs the resolver on an inbound
//! request: the authoritative peer may have validated it against a state the
//! local queue has not reached yet. Instead the derived plan is checked for
//! internal consistency and for ids and tiles that resolve locally.

use crate::state::{EntityId, Position};
use crate::view::WorldView;

use super::{ActionError, Request};

/// Verifies that an enriched `request` can be replayed against `world`.
pub fn verify_replayable(world: &dyn WorldView, request: &Request) -> Result<(), ActionError> {
    match request {
        Request::Move(request) => {
            let plan = request.plan.as_ref().ok_or(ActionError::NotEnriched)?;
            require_unit(world, request.actor)?;
            if plan.destination != request.target {
                return Err(malformed("destination differs from target"));
            }
            if plan.path.is_empty() {
                return Err(ActionError::EmptyPath);
            }
            if plan.path.iter().any(|step| step.dx.abs() + step.dy.abs() != 1) {
                return Err(malformed("path contains a non-unit step"));
            }
            require_in_bounds(world, plan.origin)?;
            for waypoint in plan.waypoints() {
                require_in_bounds(world, waypoint)?;
            }
            if plan.waypoints().last() != Some(plan.destination) {
                return Err(malformed("path does not end at the destination"));
            }
            Ok(())
        }
        Request::Attack(request) => {
            let plan = request.plan.as_ref().ok_or(ActionError::NotEnriched)?;
            if plan.attackers.is_empty() || plan.outcome.target != request.target {
                return Err(malformed("strike does not match its request"));
            }
            require_unit(world, request.actor)?;
            require_unit(world, request.target)?;
            plan.attackers
                .iter()
                .try_for_each(|id| require_unit(world, *id))
        }
        Request::CounterAttack(request) | Request::CounterMove(request) => {
            let plan = request.plan.as_ref().ok_or(ActionError::NotEnriched)?;
            if plan.attackers.as_slice() != [request.attacker]
                || plan.outcome.target != request.target
            {
                return Err(malformed("counter does not match its request"));
            }
            require_unit(world, request.attacker)?;
            require_unit(world, request.target)
        }
        Request::Construction(request) => {
            let plan = request.plan.as_ref().ok_or(ActionError::NotEnriched)?;
            require_unit(world, request.actor)?;
            let site = world
                .site(request.site)
                .ok_or(ActionError::TargetNotFound(request.site))?;
            if plan.progress_after > site.required_steps {
                return Err(malformed("progress past the required steps"));
            }
            Ok(())
        }
        Request::FireMission(request) => {
            let plan = request.plan.as_ref().ok_or(ActionError::NotEnriched)?;
            require_unit(world, request.actor)?;
            require_in_bounds(world, request.target)?;
            if !plan.area.contains(request.target) {
                return Err(malformed("barrage area misses its target"));
            }
            plan.outcomes
                .iter()
                .try_for_each(|outcome| require_unit(world, outcome.target))
        }
        Request::EndTurn(request) => {
            let plan = request.plan.as_ref().ok_or(ActionError::NotEnriched)?;
            if !world.turn().order.contains(&plan.next_team) {
                return Err(malformed("next team is not in the rotation"));
            }
            Ok(())
        }
    }
}

fn require_unit(world: &dyn WorldView, id: EntityId) -> Result<(), ActionError> {
    world
        .unit(id)
        .map(|_| ())
        .ok_or(ActionError::TargetNotFound(id))
}

fn require_in_bounds(world: &dyn WorldView, position: Position) -> Result<(), ActionError> {
    if world.is_out_of_bounds(position) {
        return Err(ActionError::OutOfBounds(position));
    }
    Ok(())
}

fn malformed(reason: &str) -> ActionError {
    ActionError::MalformedPlan(reason.to_owned())
}
