//! Topic-based event bus implementation.

use std::collections::HashMap;

use game_core::Cue;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{NetworkEvent, QueueEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Request intake and action lifecycle
    Queue,
    /// Cues for rendering and audio
    Presentation,
    /// Requests leaving for, or arriving from, other peers
    Network,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Queue, Topic::Presentation, Topic::Network];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Queue(QueueEvent),
    Presentation(Cue),
    Network(NetworkEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Queue(_) => Topic::Queue,
            Event::Presentation(_) => Topic::Presentation,
            Event::Network(_) => Topic::Network,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events published while a
/// topic has no subscribers are discarded.
#[derive(Clone)]
pub struct EventBus {
    queue: broadcast::Sender<Event>,
    presentation: broadcast::Sender<Event>,
    network: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: broadcast::channel(capacity).0,
            presentation: broadcast::channel(capacity).0,
            network: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Queue => &self.queue,
            Topic::Presentation => &self.presentation,
            Topic::Network => &self.network,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
