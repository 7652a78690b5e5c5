//! Simulation worker that owns the authoritative [`game_core::GameState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], routes requests through the
//! [`ActionQueue`], ticks it on a fixed timestep, and publishes events to the
//! EventBus.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace, warn};

use game_core::{ActionKind, GameError, GameState, Request, state_root};

use crate::events::{Event, EventBus, NetworkEvent, QueueEvent};
use crate::network::RequestLog;
use crate::scheduler::{ActionQueue, Rejection, Submission, TickReport};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Validate a local intent.
    Submit {
        request: Request,
        reply: oneshot::Sender<Submission>,
    },
    /// Queue a request accepted by the authoritative peer.
    Authoritative {
        request: Request,
        reply: oneshot::Sender<Submission>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    IsRunning { reply: oneshot::Sender<bool> },
    /// Run one tick now.
    Step { reply: oneshot::Sender<TickReport> },
    /// Tick until the queue is idle.
    Settle { reply: oneshot::Sender<u32> },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    state: GameState,
    queue: ActionQueue,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_ms: u32,
    auto_tick: bool,
    log: Option<RequestLog>,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        state: GameState,
        queue: ActionQueue,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_ms: u32,
        auto_tick: bool,
        log: Option<RequestLog>,
    ) -> Self {
        debug!(
            target: "runtime::worker",
            units = state.units.len(),
            sites = state.sites.len(),
            authority = ?queue.authority(),
            tick_ms,
            auto_tick,
            "simulation worker initialized"
        );

        Self {
            state,
            queue,
            command_rx,
            event_bus,
            tick_ms,
            auto_tick,
            log,
        }
    }

    /// Main worker loop.
    ///
    /// Every timer tick advances the queue by exactly `tick_ms`, so peers that
    /// fall behind wall-clock time still see the same sequence of deltas.
    pub async fn run(mut self) {
        let mut ticker = time::interval(Duration::from_millis(u64::from(self.tick_ms.max(1))));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = ticker.tick(), if self.auto_tick => {
                    self.advance();
                }
            }
        }

        if let Some(log) = self.log.as_mut()
            && let Err(error) = log.flush()
        {
            warn!(target: "runtime::worker", %error, "failed to flush request log");
        }
        debug!(target: "runtime::worker", "simulation worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Submit { request, reply } => {
                let submission = self.submit(request);
                if reply.send(submission).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            Command::Authoritative { request, reply } => {
                let submission = self.receive_authoritative(request);
                if reply.send(submission).is_err() {
                    debug!("Authoritative reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::IsRunning { reply } => {
                if reply.send(self.queue.is_running()).is_err() {
                    debug!("IsRunning reply channel closed (caller dropped)");
                }
            }
            Command::Step { reply } => {
                let report = self.advance();
                if reply.send(report).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::Settle { reply } => {
                let mut ticks = 0;
                while !self.queue.is_idle() {
                    self.advance();
                    ticks += 1;
                }
                if reply.send(ticks).is_err() {
                    debug!("Settle reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn submit(&mut self, request: Request) -> Submission {
        let kind = request.kind();
        let submission = self.queue.submit_request(&self.state, request);

        match &submission {
            Submission::Accepted(request) => {
                self.event_bus.publish(Event::Queue(QueueEvent::RequestAccepted {
                    request: request.clone(),
                }));
                let network = if self.queue.authority().is_local() {
                    self.record(request);
                    NetworkEvent::Broadcast {
                        request: request.clone(),
                    }
                } else {
                    NetworkEvent::Forwarded {
                        request: request.clone(),
                    }
                };
                self.event_bus.publish(Event::Network(network));
            }
            Submission::Rejected(rejection) => self.publish_rejection(kind, rejection),
        }
        submission
    }

    fn receive_authoritative(&mut self, request: Request) -> Submission {
        let kind = request.kind();
        let submission = self.queue.submit_authoritative(&self.state, request);

        match &submission {
            Submission::Accepted(request) => {
                self.record(request);
                self.event_bus.publish(Event::Queue(QueueEvent::RequestAccepted {
                    request: request.clone(),
                }));
            }
            Submission::Rejected(rejection) => {
                self.event_bus
                    .publish(Event::Network(NetworkEvent::DesyncDropped {
                        kind,
                        reason: rejection.to_string(),
                    }));
            }
        }
        submission
    }

    fn publish_rejection(&self, kind: ActionKind, rejection: &Rejection) {
        self.event_bus.publish(Event::Queue(QueueEvent::RequestRejected {
            kind,
            code: rejection.error_code().to_string(),
            reason: rejection.to_string(),
        }));
    }

    fn record(&mut self, request: &Request) {
        if let Some(log) = self.log.as_mut()
            && let Err(error) = log.append(request)
        {
            warn!(target: "runtime::worker", %error, "failed to record accepted request");
        }
    }

    /// Runs one fixed tick and publishes what happened.
    fn advance(&mut self) -> TickReport {
        let report = self.queue.tick(&mut self.state, self.tick_ms);

        if let Some(request) = &report.started {
            self.event_bus.publish(Event::Queue(QueueEvent::ActionStarted {
                request: request.clone(),
            }));
        }
        for cue in &report.cues {
            self.event_bus.publish(Event::Presentation(cue.clone()));
        }
        if let Some(request) = &report.finished {
            let root = state_root(&self.state);
            trace!(
                target: "runtime::worker",
                kind = %request.kind(),
                state_root = %hex::encode(root),
                "action committed"
            );
            self.event_bus.publish(Event::Queue(QueueEvent::ActionFinished {
                kind: request.kind(),
                state_root: root,
            }));
        }
        for (request, rejection) in &report.dropped {
            self.event_bus.publish(Event::Queue(QueueEvent::RequestDropped {
                kind: request.kind(),
                reason: rejection.to_string(),
            }));
        }

        report
    }
}
