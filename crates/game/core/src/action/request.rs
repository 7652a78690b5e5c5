//! Request records.
//!
//! A request starts as raw intent (who, what, where) and is enriched exactly
//! once by validation with a derived plan. An enriched request is
//! self-describing: hooks replay it without consulting the resolver again.
//! On the wire it is a flat object tagged by `"type"`.

use crate::combat::{BarragePlan, StrikePlan};
use crate::state::{EntityId, Position, Step, TeamId};

use super::ActionKind;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Request {
    Move(MoveRequest),
    Attack(AttackRequest),
    Construction(ConstructionRequest),
    FireMission(FireMissionRequest),
    CounterAttack(CounterRequest),
    CounterMove(CounterRequest),
    EndTurn(EndTurnRequest),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequest {
    pub actor: EntityId,
    pub target: Position,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub plan: Option<MovePlan>,
}

/// Path derived for a move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovePlan {
    pub origin: Position,
    pub destination: Position,
    /// Unit steps in travel order, origin excluded.
    pub path: Vec<Step>,
    /// Destination is enemy-held and changes hands on arrival.
    pub captures: bool,
}

impl MovePlan {
    /// Tiles entered along the path, in order.
    pub fn waypoints(&self) -> impl Iterator<Item = Position> + '_ {
        self.path.iter().scan(self.origin, |position, step| {
            *position = position.offset(*step);
            Some(*position)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRequest {
    pub actor: EntityId,
    pub target: EntityId,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub plan: Option<StrikePlan>,
}

/// A reaction strike.
///
/// `actor` is `None` when the engine raised the counter itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterRequest {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub actor: Option<EntityId>,
    pub attacker: EntityId,
    pub target: EntityId,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub plan: Option<StrikePlan>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructionRequest {
    pub actor: EntityId,
    pub site: EntityId,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub plan: Option<BuildPlan>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildPlan {
    pub progress_after: u8,
    pub completes: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireMissionRequest {
    pub actor: EntityId,
    pub target: Position,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub plan: Option<BarragePlan>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurnRequest {
    pub team: TeamId,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub plan: Option<TurnPlan>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPlan {
    pub next_team: TeamId,
    pub round: u32,
}

impl Request {
    pub fn move_to(actor: EntityId, target: Position) -> Self {
        Self::Move(MoveRequest {
            actor,
            target,
            plan: None,
        })
    }

    pub fn attack(actor: EntityId, target: EntityId) -> Self {
        Self::Attack(AttackRequest {
            actor,
            target,
            plan: None,
        })
    }

    pub fn construct(actor: EntityId, site: EntityId) -> Self {
        Self::Construction(ConstructionRequest {
            actor,
            site,
            plan: None,
        })
    }

    pub fn fire_mission(actor: EntityId, target: Position) -> Self {
        Self::FireMission(FireMissionRequest {
            actor,
            target,
            plan: None,
        })
    }

    /// Engine-raised counter attack of `attacker` against `target`.
    pub fn counter_attack(attacker: EntityId, target: EntityId) -> Self {
        Self::CounterAttack(CounterRequest {
            actor: None,
            attacker,
            target,
            plan: None,
        })
    }

    /// Engine-raised reaction of `attacker` to `target` finishing a move.
    pub fn counter_move(attacker: EntityId, target: EntityId) -> Self {
        Self::CounterMove(CounterRequest {
            actor: None,
            attacker,
            target,
            plan: None,
        })
    }

    pub fn end_turn(team: TeamId) -> Self {
        Self::EndTurn(EndTurnRequest { team, plan: None })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Request::Move(_) => ActionKind::Move,
            Request::Attack(_) => ActionKind::Attack,
            Request::Construction(_) => ActionKind::Construction,
            Request::FireMission(_) => ActionKind::FireMission,
            Request::CounterAttack(_) => ActionKind::CounterAttack,
            Request::CounterMove(_) => ActionKind::CounterMove,
            Request::EndTurn(_) => ActionKind::EndTurn,
        }
    }

    /// Issuing unit, if any. Turn ends and engine-raised counters have none.
    pub fn actor(&self) -> Option<EntityId> {
        match self {
            Request::Move(request) => Some(request.actor),
            Request::Attack(request) => Some(request.actor),
            Request::Construction(request) => Some(request.actor),
            Request::FireMission(request) => Some(request.actor),
            Request::CounterAttack(request) | Request::CounterMove(request) => request.actor,
            Request::EndTurn(_) => None,
        }
    }

    /// Returns true once validation attached the derived plan.
    pub fn is_enriched(&self) -> bool {
        match self {
            Request::Move(request) => request.plan.is_some(),
            Request::Attack(request) => request.plan.is_some(),
            Request::Construction(request) => request.plan.is_some(),
            Request::FireMission(request) => request.plan.is_some(),
            Request::CounterAttack(request) | Request::CounterMove(request) => {
                request.plan.is_some()
            }
            Request::EndTurn(request) => request.plan.is_some(),
        }
    }

    /// The raw intent with any derived plan stripped.
    pub fn to_raw(&self) -> Self {
        let mut raw = self.clone();
        match &mut raw {
            Request::Move(request) => request.plan = None,
            Request::Attack(request) => request.plan = None,
            Request::Construction(request) => request.plan = None,
            Request::FireMission(request) => request.plan = None,
            Request::CounterAttack(request) | Request::CounterMove(request) => {
                request.plan = None
            }
            Request::EndTurn(request) => request.plan = None,
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_are_raw() {
        let request = Request::move_to(EntityId(1), Position::new(2, 3));
        assert_eq!(request.kind(), ActionKind::Move);
        assert_eq!(request.actor(), Some(EntityId(1)));
        assert!(!request.is_enriched());
        assert_eq!(Request::counter_attack(EntityId(2), EntityId(1)).actor(), None);
    }

    #[test]
    fn waypoints_follow_the_path() {
        let plan = MovePlan {
            origin: Position::new(1, 1),
            destination: Position::new(2, 0),
            path: vec![Step::new(0, -1), Step::new(1, 0)],
            captures: false,
        };
        let waypoints: Vec<_> = plan.waypoints().collect();
        assert_eq!(waypoints, vec![Position::new(1, 0), Position::new(2, 0)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_layout_is_flat_and_tagged() {
        let request = Request::move_to(EntityId(7), Position::new(4, 2));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["type"], "move");
        assert_eq!(json["actor"], 7);
        assert_eq!(json["target"]["x"], 4);
        assert!(json.get("plan").is_none());

        let back: Request = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }
}
