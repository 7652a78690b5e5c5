use super::{EntityId, Footprint, Position, TeamId};

/// A structure under construction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteState {
    pub id: EntityId,
    pub team: TeamId,
    pub position: Position,
    pub footprint: Footprint,
    pub progress: u8,
    pub required_steps: u8,
}

impl SiteState {
    pub fn new(id: EntityId, team: TeamId, position: Position, required_steps: u8) -> Self {
        Self {
            id,
            team,
            position,
            footprint: Footprint::SINGLE,
            progress: 0,
            required_steps,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.required_steps
    }
}
