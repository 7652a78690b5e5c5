use crate::spatial::Rect;
use crate::state::UnitFlags;
use crate::view::{WorldMut, WorldView};

use super::{
    ActionDefinition, ActionError, ActionKind, BuildPlan, ConstructionRequest, Cue, Outbox,
    Request, Timer, mismatch, ready_actor,
};

/// One build step on an adjacent allied site.
#[derive(Clone, Debug, Default)]
pub struct ConstructionDefinition {
    timer: Timer,
    started: bool,
}

fn unpack(request: &Request) -> Option<(&ConstructionRequest, BuildPlan)> {
    match request {
        Request::Construction(request) => request.plan.map(|plan| (request, plan)),
        _ => None,
    }
}

impl ActionDefinition for ConstructionDefinition {
    fn kind(&self) -> ActionKind {
        ActionKind::Construction
    }

    fn validate(&self, world: &dyn WorldView, request: &Request) -> Result<Request, ActionError> {
        let Request::Construction(request) = request else {
            return Err(mismatch(ActionKind::Construction, request));
        };
        let builder = ready_actor(world, request.actor)?;
        if !builder.has(UnitFlags::BUILDER) {
            return Err(ActionError::MissingCapability {
                id: builder.id,
                required: UnitFlags::BUILDER,
            });
        }

        let site = world
            .site(request.site)
            .ok_or(ActionError::TargetNotFound(request.site))?;
        if !world.config().is_allied(builder.team, site.team) {
            return Err(ActionError::InvalidTarget(site.id));
        }
        if site.is_complete() {
            return Err(ActionError::AlreadyComplete(site.id));
        }
        let reach = Rect::of(builder.position, builder.footprint).inflate(1);
        if !reach.intersects(&Rect::of(site.position, site.footprint)) {
            return Err(ActionError::OutOfRange);
        }

        let progress_after = site.progress.saturating_add(1);
        Ok(Request::Construction(ConstructionRequest {
            plan: Some(BuildPlan {
                progress_after,
                completes: progress_after >= site.required_steps,
            }),
            ..request.clone()
        }))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn on_start(&mut self, world: &mut dyn WorldMut, request: &Request, _outbox: &mut Outbox) {
        if let Some((request, _)) = unpack(request) {
            self.started = world.spend_action(request.actor);
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
        !self.started || self.timer.reached(world.config().construction_step_ms)
    }

    fn on_end(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Some((request, plan)) = unpack(request).filter(|_| self.started) else {
            return;
        };
        if !world.set_construction_progress(request.site, plan.progress_after) {
            return;
        }
        outbox.cue(Cue::ConstructionProgress {
            site: request.site,
            progress: plan.progress_after,
        });
        if plan.completes {
            outbox.cue(Cue::ConstructionComplete { site: request.site });
        }
    }
}
