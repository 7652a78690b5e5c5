//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting requests, stepping the simulation, or streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{GameState, Request};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::scheduler::{Submission, TickReport};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit a local intent (player input).
    pub async fn submit(&self, request: Request) -> Result<Submission> {
        self.request(|reply| Command::Submit { request, reply })
            .await
    }

    /// Deliver a request the authoritative peer accepted.
    pub async fn deliver_authoritative(&self, request: Request) -> Result<Submission> {
        self.request(|reply| Command::Authoritative { request, reply })
            .await
    }

    /// Query the current game state (read-only snapshot)
    pub async fn state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Returns true while an action is between start and end.
    pub async fn is_running(&self) -> Result<bool> {
        self.request(|reply| Command::IsRunning { reply }).await
    }

    /// Advance the queue by one fixed tick, regardless of the timer.
    pub async fn step(&self) -> Result<TickReport> {
        self.request(|reply| Command::Step { reply }).await
    }

    /// Step until nothing is active or pending; returns the number of ticks.
    pub async fn settle(&self) -> Result<u32> {
        self.request(|reply| Command::Settle { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Queue` - Intake decisions and action lifecycle
    /// - `Topic::Presentation` - Cues produced by action hooks
    /// - `Topic::Network` - Broadcasts, forwards, and desync drops
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// // Relay the host's accepted stream to peers
    /// let mut network_rx = handle.subscribe(Topic::Network);
    /// while let Ok(event) = network_rx.recv().await {
    ///     // Send broadcasts over the transport
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
