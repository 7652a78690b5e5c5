use crate::view::{WorldMut, WorldView};

use super::{
    ActionDefinition, ActionError, ActionKind, Cue, EndTurnRequest, Outbox, Request, TurnPlan,
    mismatch,
};

/// Hands the turn to the next team in rotation and refills its budgets.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndTurnDefinition;

impl ActionDefinition for EndTurnDefinition {
    fn kind(&self) -> ActionKind {
        ActionKind::EndTurn
    }

    fn validate(&self, world: &dyn WorldView, request: &Request) -> Result<Request, ActionError> {
        let Request::EndTurn(request) = request else {
            return Err(mismatch(ActionKind::EndTurn, request));
        };
        let turn = world.turn();
        if request.team != turn.active_team {
            return Err(ActionError::NotActiveTeam { team: request.team });
        }
        let (next_team, round) = turn.successor();
        Ok(Request::EndTurn(EndTurnRequest {
            team: request.team,
            plan: Some(TurnPlan { next_team, round }),
        }))
    }

    fn clear(&mut self) {}

    fn on_start(&mut self, _world: &mut dyn WorldMut, _request: &Request, _outbox: &mut Outbox) {}

    fn on_update(
        &mut self,
        _world: &mut dyn WorldMut,
        _request: &Request,
        _delta_ms: u32,
        _outbox: &mut Outbox,
    ) {
    }

    fn is_finished(&self, _world: &dyn WorldView, _request: &Request) -> bool {
        true
    }

    fn on_end(&mut self, world: &mut dyn WorldMut, request: &Request, outbox: &mut Outbox) {
        let Request::EndTurn(EndTurnRequest {
            plan: Some(plan), ..
        }) = request
        else {
            return;
        };
        world.begin_turn(plan.next_team, plan.round);
        outbox.cue(Cue::TurnBegan {
            team: plan.next_team,
            round: plan.round,
        });
    }
}
