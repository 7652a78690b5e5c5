//! Action kind enumeration.

/// Every request type the engine knows how to execute.
///
/// The registry holds exactly one definition per kind.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Move,
    Attack,
    Construction,
    FireMission,
    CounterAttack,
    CounterMove,
    EndTurn,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Move,
        ActionKind::Attack,
        ActionKind::Construction,
        ActionKind::FireMission,
        ActionKind::CounterAttack,
        ActionKind::CounterMove,
        ActionKind::EndTurn,
    ];

    /// Counters are only ever raised by the engine as follow-ups.
    pub const fn is_counter(self) -> bool {
        matches!(self, ActionKind::CounterAttack | ActionKind::CounterMove)
    }
}
