//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the session.

use std::env;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_core::GameState;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::network::{RequestForwarder, RequestLog};
use crate::scheduler::{ActionQueue, ActionRegistry, Authority, DEFAULT_CAPACITY};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Fixed simulation step handed to every `on_update`.
    pub tick_ms: u32,
    /// Tick on a timer. When false the session only advances through
    /// [`RuntimeHandle::step`] and [`RuntimeHandle::settle`].
    pub auto_tick: bool,
    pub queue_capacity: usize,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// This peer decides acceptance order.
    pub authoritative: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            auto_tick: true,
            queue_capacity: DEFAULT_CAPACITY,
            event_buffer_size: 100,
            command_buffer_size: 32,
            authoritative: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_TICK_MS` - Fixed timestep in milliseconds (default: 16)
    /// - `TACTICS_AUTO_TICK` - Tick on a timer (default: true)
    /// - `TACTICS_QUEUE_CAPACITY` - Pending request limit (default: 20)
    /// - `TACTICS_EVENT_BUFFER` - Per-topic event buffer (default: 100)
    /// - `TACTICS_COMMAND_BUFFER` - Worker command buffer (default: 32)
    /// - `TACTICS_AUTHORITATIVE` - This peer is the host (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(tick_ms) = read_env::<u32>("TACTICS_TICK_MS") {
            config.tick_ms = tick_ms.max(1);
        }
        if let Some(auto_tick) = read_env_bool("TACTICS_AUTO_TICK") {
            config.auto_tick = auto_tick;
        }
        if let Some(capacity) = read_env::<usize>("TACTICS_QUEUE_CAPACITY") {
            config.queue_capacity = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("TACTICS_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("TACTICS_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(authoritative) = read_env_bool("TACTICS_AUTHORITATIVE") {
            config.authoritative = authoritative;
        }

        config
    }
}

/// Main runtime that orchestrates the simulation
///
/// Runtime owns the worker task; [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    registry: Option<ActionRegistry>,
    forwarder: Option<Box<dyn RequestForwarder>>,
    log: Option<RequestLog>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            registry: None,
            forwarder: None,
            log: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Replace the built-in action definitions.
    pub fn registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the forwarder used when this peer is not authoritative.
    pub fn forwarder(mut self, forwarder: impl RequestForwarder + 'static) -> Self {
        self.forwarder = Some(Box::new(forwarder));
        self
    }

    /// Record every request this peer queues.
    pub fn request_log(mut self, log: RequestLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Spawns the simulation worker.
    pub async fn build(self) -> Result<Runtime> {
        let state = self.state.ok_or(RuntimeError::MissingState)?;
        let authority = if self.config.authoritative {
            Authority::Local
        } else {
            Authority::Remote(self.forwarder.ok_or(RuntimeError::MissingForwarder)?)
        };
        let registry = self.registry.unwrap_or_else(ActionRegistry::with_defaults);
        let queue = ActionQueue::new(registry, authority, self.config.queue_capacity);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let worker = SimulationWorker::new(
            state,
            queue,
            command_rx,
            event_bus.clone(),
            self.config.tick_ms,
            self.config.auto_tick,
            self.log,
        );
        let sim_worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            sim_worker_handle,
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use game_core::state::UnitStatus;
    use game_core::{ActionKind, EntityId, Position, Request, TeamId};
    use tokio::sync::mpsc;

    use super::*;
    use crate::events::{Event, NetworkEvent, QueueEvent, Topic};
    use crate::network::ChannelForwarder;
    use crate::scheduler::Submission;
    use crate::testing::skirmish;

    fn manual() -> RuntimeConfig {
        RuntimeConfig {
            auto_tick: false,
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = RuntimeConfig::default();
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.queue_capacity, 20);
        assert!(config.authoritative);
    }

    #[tokio::test]
    async fn build_requires_state() {
        let result = Runtime::builder().config(manual()).build().await;
        assert!(matches!(result, Err(RuntimeError::MissingState)));
    }

    #[tokio::test]
    async fn peer_requires_forwarder() {
        let config = RuntimeConfig {
            authoritative: false,
            ..manual()
        };
        let result = Runtime::builder()
            .config(config)
            .initial_state(skirmish())
            .build()
            .await;
        assert!(matches!(result, Err(RuntimeError::MissingForwarder)));
    }

    #[tokio::test]
    async fn move_runs_to_completion() {
        let runtime = Runtime::builder()
            .config(manual())
            .initial_state(skirmish())
            .build()
            .await
            .unwrap();
        let handle = runtime.handle();
        let mut queue_rx = handle.subscribe(Topic::Queue);

        let submission = handle
            .submit(Request::move_to(EntityId(1), Position::new(2, 4)))
            .await
            .unwrap();
        assert!(submission.is_accepted());
        assert!(!handle.is_running().await.unwrap());

        let started = handle.step().await.unwrap();
        assert_eq!(started.started.map(|r| r.kind()), Some(ActionKind::Move));
        assert!(handle.is_running().await.unwrap());

        handle.settle().await.unwrap();
        let state = handle.state().await.unwrap();
        assert_eq!(state.unit(EntityId(1)).unwrap().position, Position::new(2, 4));
        assert!(!handle.is_running().await.unwrap());

        assert!(matches!(
            queue_rx.recv().await.unwrap(),
            Event::Queue(QueueEvent::RequestAccepted { .. })
        ));
        assert!(matches!(
            queue_rx.recv().await.unwrap(),
            Event::Queue(QueueEvent::ActionStarted { .. })
        ));
        assert!(matches!(
            queue_rx.recv().await.unwrap(),
            Event::Queue(QueueEvent::ActionFinished {
                kind: ActionKind::Move,
                ..
            })
        ));

        drop(handle);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn rejection_is_published() {
        let runtime = Runtime::builder()
            .config(manual())
            .initial_state(skirmish())
            .build()
            .await
            .unwrap();
        let handle = runtime.handle();
        let mut queue_rx = handle.subscribe(Topic::Queue);

        // Unit 2 belongs to the team that is not acting.
        let submission = handle
            .submit(Request::move_to(EntityId(2), Position::new(3, 4)))
            .await
            .unwrap();
        assert!(matches!(submission, Submission::Rejected(_)));

        match queue_rx.recv().await.unwrap() {
            Event::Queue(QueueEvent::RequestRejected { kind, .. }) => {
                assert_eq!(kind, ActionKind::Move)
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn host_and_peer_converge() {
        let host = Runtime::builder()
            .config(manual())
            .initial_state(skirmish())
            .build()
            .await
            .unwrap();
        let (tx, mut forwarded) = mpsc::unbounded_channel();
        let peer = Runtime::builder()
            .config(RuntimeConfig {
                authoritative: false,
                ..manual()
            })
            .initial_state(skirmish())
            .forwarder(ChannelForwarder::new(tx))
            .build()
            .await
            .unwrap();
        let host_handle = host.handle();
        let peer_handle = peer.handle();
        let mut broadcasts = host_handle.subscribe(Topic::Network);

        // The peer's intent travels to the host, which accepts and broadcasts it.
        let local = peer_handle
            .submit(Request::attack(EntityId(1), EntityId(2)))
            .await
            .unwrap();
        assert!(local.is_accepted());
        assert!(!peer_handle.is_running().await.unwrap());
        let intent = forwarded.recv().await.unwrap();
        host_handle.submit(intent.to_raw()).await.unwrap();

        let Event::Network(NetworkEvent::Broadcast { request }) = broadcasts.recv().await.unwrap()
        else {
            panic!("expected a broadcast");
        };
        assert!(peer_handle.deliver_authoritative(request).await.unwrap().is_accepted());

        host_handle.settle().await.unwrap();
        peer_handle.settle().await.unwrap();

        let host_state = host_handle.state().await.unwrap();
        let peer_state = peer_handle.state().await.unwrap();
        assert_eq!(host_state, peer_state);
        assert_eq!(host_state.unit(EntityId(2)).unwrap().status, UnitStatus::Idle);
        assert_eq!(host_state.unit(EntityId(1)).unwrap().health.current, 6);
        assert_eq!(host_state.turn.active_team, TeamId(0));
    }
}
