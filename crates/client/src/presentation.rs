//! Turns runtime events into player-facing messages.

use game_core::{Cue, ResultState};
use runtime::{Event, NetworkEvent, QueueEvent};

use crate::message::{MessageEntry, MessageLevel};

/// Describes `event`, or returns `None` when it has nothing to show.
pub fn describe(event: &Event) -> Option<MessageEntry> {
    match event {
        Event::Presentation(cue) => describe_cue(cue).map(MessageEntry::info),
        Event::Queue(event) => describe_queue(event),
        Event::Network(NetworkEvent::DesyncDropped { kind, reason }) => Some(MessageEntry::new(
            format!("dropped authoritative {kind}: {reason}"),
            MessageLevel::Error,
        )),
        Event::Network(_) => None,
    }
}

fn describe_queue(event: &QueueEvent) -> Option<MessageEntry> {
    match event {
        QueueEvent::RequestRejected { kind, reason, .. } => Some(MessageEntry::new(
            format!("{kind} refused: {reason}"),
            MessageLevel::Warning,
        )),
        QueueEvent::RequestDropped { kind, reason } => Some(MessageEntry::new(
            format!("{kind} skipped: {reason}"),
            MessageLevel::Warning,
        )),
        QueueEvent::ActionStarted { request } => {
            Some(MessageEntry::info(format!("{} begins", request.kind())))
        }
        _ => None,
    }
}

fn describe_cue(cue: &Cue) -> Option<String> {
    let text = match cue {
        Cue::MoveStarted { unit, from, to } => {
            format!("{unit} moves from ({}, {}) to ({}, {})", from.x, from.y, to.x, to.y)
        }
        // Each step is visible on the map.
        Cue::Stepped { .. } => return None,
        Cue::Captured { position, team } => {
            format!("{team} captures ({}, {})", position.x, position.y)
        }
        Cue::Hit {
            target,
            damage,
            result,
        } => match result {
            ResultState::Idle => format!("{target} takes {damage} damage"),
            ResultState::Down => format!("{target} takes {damage} damage and goes down"),
            ResultState::Dead => format!("{target} takes {damage} damage and is destroyed"),
        },
        Cue::Destroyed { .. } => return None,
        Cue::Barrage { area } => format!(
            "barrage lands on ({}, {})-({}, {})",
            area.x,
            area.y,
            area.x + area.width - 1,
            area.y + area.height - 1
        ),
        Cue::ConstructionProgress { site, progress } => {
            format!("{site} construction at step {progress}")
        }
        Cue::ConstructionComplete { site } => format!("{site} is complete"),
        Cue::TurnBegan { team, round } => format!("round {round}: {team} to act"),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use game_core::{ActionKind, EntityId, Position, TeamId};

    use super::*;

    #[test]
    fn steps_are_silent() {
        let event = Event::Presentation(Cue::Stepped {
            unit: EntityId(1),
            position: Position::new(1, 1),
        });
        assert_eq!(describe(&event), None);
    }

    #[test]
    fn rejections_are_warnings() {
        let event = Event::Queue(QueueEvent::RequestRejected {
            kind: ActionKind::Attack,
            code: "ACTION_OUT_OF_RANGE".into(),
            reason: "target out of range".into(),
        });
        let entry = describe(&event).unwrap();
        assert_eq!(entry.level, MessageLevel::Warning);
        assert!(entry.text.starts_with("attack refused"));
    }

    #[test]
    fn turn_cue_names_round_and_team() {
        let event = Event::Presentation(Cue::TurnBegan {
            team: TeamId(1),
            round: 2,
        });
        let entry = describe(&event).unwrap();
        assert!(entry.text.starts_with("round 2"));
    }
}
