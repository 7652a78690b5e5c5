use super::TeamId;

/// Turn bookkeeping: which team may issue intents and how many rounds passed.
///
/// Only an `end_turn` request advances this state, so every peer that replays
/// the same request stream agrees on whose turn it is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Team currently allowed to act.
    pub active_team: TeamId,

    /// Completed rotations through `order`, starting at 1.
    pub round: u32,

    /// Team rotation order. Must contain `active_team`.
    pub order: Vec<TeamId>,
}

impl TurnState {
    /// Creates a turn state where the first team in `order` acts first.
    pub fn new(order: Vec<TeamId>) -> Self {
        Self {
            active_team: order.first().copied().unwrap_or_default(),
            round: 1,
            order,
        }
    }

    /// Returns the team acting after the active one and the round it acts in.
    pub fn successor(&self) -> (TeamId, u32) {
        let index = self
            .order
            .iter()
            .position(|team| *team == self.active_team)
            .unwrap_or(0);
        let next = (index + 1) % self.order.len().max(1);
        let team = self.order.get(next).copied().unwrap_or(self.active_team);
        let round = if next == 0 { self.round + 1 } else { self.round };
        (team, round)
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(vec![TeamId(0), TeamId(1)])
    }
}
