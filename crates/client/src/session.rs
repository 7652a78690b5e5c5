//! Scripted headless session.
//!
//! Submits requests one at a time, lets each run to completion, and turns the
//! events it produced into messages.

use anyhow::Result;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use game_core::Request;
use runtime::{Event, RuntimeHandle, Submission, Topic};

use crate::message::{MessageEntry, MessageLevel, MessageLog};
use crate::presentation::describe;

/// Totals for a played script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub accepted: usize,
    pub rejected: usize,
}

pub struct Session {
    handle: RuntimeHandle,
    receivers: Vec<broadcast::Receiver<Event>>,
    messages: MessageLog,
}

impl Session {
    pub fn new(handle: RuntimeHandle, message_capacity: usize) -> Self {
        // Drained in this order after every request.
        let receivers = [Topic::Queue, Topic::Presentation, Topic::Network]
            .into_iter()
            .map(|topic| handle.subscribe(topic))
            .collect();
        Self {
            handle,
            receivers,
            messages: MessageLog::new(message_capacity),
        }
    }

    pub fn handle(&self) -> &RuntimeHandle {
        &self.handle
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Submits `request` and, when accepted, runs the queue until idle.
    pub async fn play(&mut self, request: Request) -> Result<Submission> {
        let submission = self.handle.submit(request).await?;
        if submission.is_accepted() {
            let ticks = self.handle.settle().await?;
            tracing::debug!(ticks, "request settled");
        }
        self.drain();
        Ok(submission)
    }

    pub async fn play_all(
        &mut self,
        requests: impl IntoIterator<Item = Request>,
    ) -> Result<ScriptSummary> {
        let mut summary = ScriptSummary::default();
        for request in requests {
            let kind = request.kind();
            match self.play(request).await? {
                Submission::Accepted(_) => summary.accepted += 1,
                Submission::Rejected(rejection) => {
                    info!(%kind, %rejection, "scripted request refused");
                    summary.rejected += 1;
                }
            }
        }
        Ok(summary)
    }

    fn drain(&mut self) {
        for receiver in &mut self.receivers {
            loop {
                match receiver.try_recv() {
                    Ok(event) => {
                        if let Some(entry) = describe(&event) {
                            self.messages.push(entry);
                        }
                    }
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!(skipped, "event buffer overflowed");
                        self.messages.push(MessageEntry::new(
                            format!("{skipped} events were not shown"),
                            MessageLevel::Warning,
                        ));
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use game_content::ContentFactory;
    use game_core::{EntityId, TeamId};
    use runtime::{RequestLog, Runtime, RuntimeConfig};

    use super::*;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
    }

    #[tokio::test]
    async fn opening_script_plays_through() {
        let state = ContentFactory::new(data_dir()).load_scenario("skirmish").unwrap();
        let requests = RequestLog::read_all(data_dir().join("scripts/opening.jsonl")).unwrap();
        let runtime = Runtime::builder()
            .config(RuntimeConfig {
                auto_tick: false,
                ..RuntimeConfig::default()
            })
            .initial_state(state)
            .build()
            .await
            .unwrap();

        let mut session = Session::new(runtime.handle(), 256);
        let summary = session.play_all(requests).await.unwrap();
        assert_eq!(
            summary,
            ScriptSummary {
                accepted: 7,
                rejected: 0
            }
        );

        let state = session.handle().state().await.unwrap();
        let rifle = state.unit(EntityId(1)).unwrap();
        assert_eq!(rifle.health.current, 2);
        assert_eq!(state.unit(EntityId(10)).unwrap().health.current, 7);
        assert_eq!(state.site(EntityId(20)).unwrap().progress, 1);
        assert_eq!(state.turn.active_team, TeamId(0));
        assert_eq!(state.turn.round, 2);
        assert_eq!(session.messages().count(MessageLevel::Warning), 0);
    }

    #[tokio::test]
    async fn refused_request_becomes_a_warning() {
        let state = ContentFactory::new(data_dir()).load_scenario("skirmish").unwrap();
        let runtime = Runtime::builder()
            .config(RuntimeConfig {
                auto_tick: false,
                ..RuntimeConfig::default()
            })
            .initial_state(state)
            .build()
            .await
            .unwrap();
        let mut session = Session::new(runtime.handle(), 16);

        // Team 1 may not act on team 0's turn.
        let submission = session.play(Request::end_turn(TeamId(1))).await.unwrap();
        assert!(!submission.is_accepted());
        assert_eq!(session.messages().count(MessageLevel::Warning), 1);
    }
}
