//! Action definitions.
//!
//! Every request type is bound to one [`ActionDefinition`]: a reusable
//! behaviour object that validates raw requests into enriched ones and then
//! drives an accepted request through `on_start → on_update* → on_end`.
//!
//! Hooks never fail. A hook whose request references an entity that vanished
//! in the meantime skips that effect; the queue has no rollback, so nothing in
//! the per-tick path may abort.
//!
//! Presentation is a side channel: hooks push [`Cue`]s into the [`Outbox`]
//! after mutating state, and nothing downstream feeds them back into rules.

mod attack;
mod construction;
mod counter;
mod end_turn;
mod error;
mod fire_mission;
mod kind;
mod movement;
mod replay;
mod request;

pub use attack::AttackDefinition;
pub use construction::ConstructionDefinition;
pub use counter::CounterDefinition;
pub use end_turn::EndTurnDefinition;
pub use error::ActionError;
pub use fire_mission::FireMissionDefinition;
pub use kind::ActionKind;
pub use movement::MoveDefinition;
pub use replay::verify_replayable;
pub use request::{
    AttackRequest, BuildPlan, ConstructionRequest, CounterRequest, EndTurnRequest,
    FireMissionRequest, MovePlan, MoveRequest, Request, TurnPlan,
};

use crate::combat::ResultState;
use crate::spatial::Rect;
use crate::state::{EntityId, Position, TeamId, UnitState};
use crate::view::{WorldMut, WorldView};

/// Behaviour bound to one [`ActionKind`].
///
/// Definitions are registered once and reused for every request of their
/// kind. Per-activation state (timers, walked steps) lives in the definition
/// and is reset by [`ActionDefinition::clear`] before each activation.
pub trait ActionDefinition: Send {
    fn kind(&self) -> ActionKind;

    /// Checks `request` against `world` and returns it enriched with every
    /// derived value the hooks need.
    ///
    /// Never mutates the world. Validating the same raw request against the
    /// same world twice yields equal results.
    fn validate(&self, world: &dyn WorldView, request: &Request) -> Result<Request, ActionError>;

    /// Resets per-activation state.
    fn clear(&mut self);

    /// Applies the irrevocable first effect. Called exactly once per request.
    fn on_start(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox);

    /// Advances time-based sub-state by `delta_ms`.
    fn on_update(
        &mut self,
        world: &mut dyn WorldMut,
        request: &Request,
        delta_ms: u32,
        outbox: &mut Outbox,
    );

    fn is_finished(&self, world: &dyn WorldView, request: &Request) -> bool;

    /// Applies terminal effects and raises follow-up requests.
    fn on_end(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox);
}

/// One boxed definition per [`ActionKind`], in [`ActionKind::ALL`] order.
pub fn default_definitions() -> Vec<Box<dyn ActionDefinition>> {
    vec![
        Box::new(MoveDefinition::default()),
        Box::new(AttackDefinition::default()),
        Box::new(ConstructionDefinition::default()),
        Box::new(FireMissionDefinition::default()),
        Box::new(CounterDefinition::new(ActionKind::CounterAttack)),
        Box::new(CounterDefinition::new(ActionKind::CounterMove)),
        Box::new(EndTurnDefinition),
    ]
}

/// Presentation notifications produced by hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "cue", rename_all = "snake_case"))]
pub enum Cue {
    MoveStarted {
        unit: EntityId,
        from: Position,
        to: Position,
    },
    Stepped {
        unit: EntityId,
        position: Position,
    },
    Captured {
        position: Position,
        team: TeamId,
    },
    Hit {
        target: EntityId,
        damage: u32,
        result: ResultState,
    },
    Destroyed {
        unit: EntityId,
        result: ResultState,
    },
    Barrage {
        area: Rect,
    },
    ConstructionProgress {
        site: EntityId,
        progress: u8,
    },
    ConstructionComplete {
        site: EntityId,
    },
    TurnBegan {
        team: TeamId,
        round: u32,
    },
}

/// Side outputs of a hook call: presentation cues and follow-up requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outbox {
    cues: Vec<Cue>,
    follow_ups: Vec<Request>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Raises an engine-initiated request to run right after the current one.
    pub fn follow_up(&mut self, request: Request) {
        self.follow_ups.push(request);
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn follow_ups(&self) -> &[Request] {
        &self.follow_ups
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty() && self.follow_ups.is_empty()
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn take_follow_ups(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.follow_ups)
    }
}

/// Resolves the acting unit of a player intent and checks that it may act.
fn ready_actor(world: &dyn WorldView, id: EntityId) -> Result<&UnitState, ActionError> {
    let actor = world.unit(id).ok_or(ActionError::ActorNotFound(id))?;
    if !actor.is_alive() {
        return Err(ActionError::ActorDead(id));
    }
    if actor.team != world.turn().active_team {
        return Err(ActionError::NotActiveTeam { team: actor.team });
    }
    if actor.actions_left == 0 {
        return Err(ActionError::NoActionsLeft(id));
    }
    Ok(actor)
}

fn live_target(world: &dyn WorldView, id: EntityId) -> Result<&UnitState, ActionError> {
    let target = world.unit(id).ok_or(ActionError::TargetNotFound(id))?;
    if !target.is_alive() {
        return Err(ActionError::TargetDead(id));
    }
    Ok(target)
}

fn mismatch(expected: ActionKind, request: &Request) -> ActionError {
    ActionError::KindMismatch {
        expected,
        found: request.kind(),
    }
}

/// Milliseconds elapsed since `on_start`, saturating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Timer {
    elapsed_ms: u32,
}

impl Timer {
    fn advance(&mut self, delta_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
    }

    fn reached(&self, duration_ms: u32) -> bool {
        self.elapsed_ms >= duration_ms
    }
}
