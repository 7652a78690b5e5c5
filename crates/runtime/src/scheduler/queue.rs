//! FIFO action queue.
//!
//! The queue is the only caller of definition hooks. It holds at most one
//! active request; everything else waits in acceptance order. Follow-ups raised
//! by `on_end` jump to the front so a counter resolves before the next
//! player intent. Every request is validated again when it activates, against
//! the world as earlier actions left it, and dropped if it no longer holds.

use std::collections::VecDeque;

use game_core::{Cue, Outbox, Request, WorldMut, WorldView, verify_replayable};
use tracing::{debug, error, trace, warn};

use super::{ActionRegistry, Authority, Rejection};

/// Pending requests a queue holds unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 20;

/// Answer to an intake call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The enriched request. Queued here, or forwarded when another peer is
    /// authoritative.
    Accepted(Request),
    Rejected(Rejection),
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn request(&self) -> Option<&Request> {
        match self {
            Self::Accepted(request) => Some(request),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// What a single [`ActionQueue::tick`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Request whose `on_start` ran this tick.
    pub started: Option<Request>,
    /// Request whose `on_end` ran this tick.
    pub finished: Option<Request>,
    pub cues: Vec<Cue>,
    /// Requests that no longer validated when their turn came.
    pub dropped: Vec<(Request, Rejection)>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.started.is_none()
            && self.finished.is_none()
            && self.cues.is_empty()
            && self.dropped.is_empty()
    }
}

pub struct ActionQueue {
    registry: ActionRegistry,
    authority: Authority,
    capacity: usize,
    pending: VecDeque<Request>,
    active: Option<Request>,
}

impl ActionQueue {
    /// Creates a queue and seals `registry`.
    pub fn new(mut registry: ActionRegistry, authority: Authority, capacity: usize) -> Self {
        registry.seal();
        Self {
            registry,
            authority,
            capacity,
            pending: VecDeque::with_capacity(capacity),
            active: None,
        }
    }

    /// Host queue with the built-in definitions and default capacity.
    pub fn local() -> Self {
        Self::new(ActionRegistry::with_defaults(), Authority::Local, DEFAULT_CAPACITY)
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true while an action sits between `on_start` and `on_end`.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Returns true when nothing is active or pending.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    pub fn active(&self) -> Option<&Request> {
        self.active.as_ref()
    }

    /// Validates a local intent and either queues it or forwards it to the
    /// authoritative peer.
    ///
    /// A forwarded request is not queued here; it runs once the host echoes it
    /// back through [`ActionQueue::submit_authoritative`].
    pub fn submit_request<W: WorldView>(&mut self, world: &W, raw: Request) -> Submission {
        let kind = raw.kind();
        if kind.is_counter() {
            return reject(Rejection::EngineInitiated(kind));
        }
        let Some(definition) = self.registry.get(kind) else {
            return reject(Rejection::UnknownKind(kind));
        };
        let request = match definition.validate(world, &raw) {
            Ok(request) => request,
            Err(error) => return reject(Rejection::Validation(error)),
        };

        match &self.authority {
            Authority::Local => {
                if self.pending.len() >= self.capacity {
                    return reject(Rejection::Capacity {
                        capacity: self.capacity,
                    });
                }
                self.pending.push_back(request.clone());
                debug!(
                    target: "runtime::scheduler",
                    kind = %kind,
                    pending = self.pending.len(),
                    "request queued"
                );
            }
            Authority::Remote(forwarder) => {
                forwarder.forward(request.clone());
                debug!(
                    target: "runtime::scheduler",
                    kind = %kind,
                    "request forwarded to authoritative peer"
                );
            }
        }
        Submission::Accepted(request)
    }

    /// Queues a request the authoritative peer already accepted.
    ///
    /// Only the structure of the derived plan is checked. Acceptance order is
    /// the host's, so capacity is not enforced and nothing is forwarded. A
    /// request that cannot be replayed is logged and dropped; this peer will
    /// diverge until it resyncs.
    pub fn submit_authoritative<W: WorldView>(&mut self, world: &W, request: Request) -> Submission {
        let kind = request.kind();
        if kind.is_counter() {
            error!(
                target: "runtime::scheduler",
                kind = %kind,
                "authoritative stream carried an engine-initiated request"
            );
            return Submission::Rejected(Rejection::EngineInitiated(kind));
        }
        if !self.registry.contains(kind) {
            error!(target: "runtime::scheduler", kind = %kind, "authoritative request of unregistered kind");
            return Submission::Rejected(Rejection::UnknownKind(kind));
        }
        if let Err(source) = verify_replayable(world, &request) {
            error!(
                target: "runtime::scheduler",
                kind = %kind,
                error = %source,
                "dropping authoritative request"
            );
            return Submission::Rejected(Rejection::Desync { kind, source });
        }

        self.pending.push_back(request.clone());
        trace!(
            target: "runtime::scheduler",
            kind = %kind,
            pending = self.pending.len(),
            "authoritative request queued"
        );
        Submission::Accepted(request)
    }

    /// Advances the queue by one fixed step.
    ///
    /// When idle, the next pending request is started. Otherwise the active
    /// request is updated and, once finished, ended. A request is never
    /// started and ended within the same tick.
    pub fn tick<W: WorldMut>(&mut self, world: &mut W, delta_ms: u32) -> TickReport {
        let mut report = TickReport::default();
        let mut outbox = Outbox::new();

        match self.active.take() {
            None => self.activate_next(world, &mut outbox, &mut report),
            Some(request) => {
                let kind = request.kind();
                let Some(definition) = self.registry.get_mut(kind) else {
                    error!(target: "runtime::scheduler", kind = %kind, "active definition vanished");
                    return report;
                };

                definition.on_update(world, &request, delta_ms, &mut outbox);
                if definition.is_finished(&*world, &request) {
                    definition.on_end(world, &request, &mut outbox);
                    let follow_ups = outbox.take_follow_ups();
                    debug!(
                        target: "runtime::scheduler",
                        kind = %kind,
                        follow_ups = follow_ups.len(),
                        "action finished"
                    );
                    for follow_up in follow_ups.into_iter().rev() {
                        self.pending.push_front(follow_up);
                    }
                    report.finished = Some(request);
                } else {
                    self.active = Some(request);
                }
            }
        }

        report.cues = outbox.take_cues();
        report
    }

    fn activate_next<W: WorldMut>(
        &mut self,
        world: &mut W,
        outbox: &mut Outbox,
        report: &mut TickReport,
    ) {
        while let Some(mut request) = self.pending.pop_front() {
            let kind = request.kind();
            let Some(definition) = self.registry.get_mut(kind) else {
                warn!(target: "runtime::scheduler", kind = %kind, "no definition for pending request");
                report.dropped.push((request, Rejection::UnknownKind(kind)));
                continue;
            };

            // The world may have moved on since acceptance; every peer derives
            // the same fresh plan from the same state.
            match definition.validate(&*world, &request) {
                Ok(fresh) => request = fresh,
                Err(error) => {
                    debug!(
                        target: "runtime::scheduler",
                        kind = %kind,
                        error = %error,
                        "stale request dropped at activation"
                    );
                    report.dropped.push((request, Rejection::Validation(error)));
                    continue;
                }
            }

            definition.clear();
            definition.on_start(world, &request, outbox);
            debug!(target: "runtime::scheduler", kind = %kind, "action started");
            report.started = Some(request.clone());
            self.active = Some(request);
            return;
        }
    }
}

fn reject(rejection: Rejection) -> Submission {
    debug!(target: "runtime::scheduler", reason = %rejection, "request rejected");
    Submission::Rejected(rejection)
}

impl std::fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionQueue")
            .field("authority", &self.authority)
            .field("capacity", &self.capacity)
            .field("pending", &self.pending.len())
            .field("active", &self.active.as_ref().map(Request::kind))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use game_core::action::{EndTurnRequest, MovePlan, MoveRequest, TurnPlan};
    use game_core::state::{CombatStats, UnitFlags, UnitStatus};
    use game_core::{
        ActionDefinition, ActionError, ActionKind, EntityId, GameState, Position, Step, TeamId,
        UnitState,
    };
    use tokio::sync::mpsc;

    use super::*;
    use crate::network::ChannelForwarder;
    use crate::testing::{TICK_MS, skirmish};

    /// Turn-end stand-in that records hook order and lasts a fixed number of updates.
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
        updates: u32,
        duration: u32,
    }

    impl Recorder {
        fn new(duration: u32) -> (Self, Arc<Mutex<Vec<String>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let recorder = Self {
                log: Arc::clone(&log),
                updates: 0,
                duration,
            };
            (recorder, log)
        }

        fn record(&self, hook: &str, request: &Request) {
            if let Request::EndTurn(request) = request {
                self.log
                    .lock()
                    .unwrap()
                    .push(format!("{hook} {}", request.team.0));
            }
        }
    }

    impl ActionDefinition for Recorder {
        fn kind(&self) -> ActionKind {
            ActionKind::EndTurn
        }

        fn validate(&self, _: &dyn WorldView, request: &Request) -> Result<Request, ActionError> {
            match request {
                Request::EndTurn(request) => Ok(Request::EndTurn(EndTurnRequest {
                    team: request.team,
                    plan: Some(TurnPlan {
                        next_team: request.team,
                        round: 1,
                    }),
                })),
                other => Err(ActionError::KindMismatch {
                    expected: ActionKind::EndTurn,
                    found: other.kind(),
                }),
            }
        }

        fn clear(&mut self) {
            self.updates = 0;
        }

        fn on_start(&mut self, _: &mut dyn WorldMut, request: &Request, _: &mut Outbox) {
            self.record("start", request);
        }

        fn on_update(&mut self, _: &mut dyn WorldMut, _: &Request, _: u32, _: &mut Outbox) {
            self.updates += 1;
        }

        fn is_finished(&self, _: &dyn WorldView, _: &Request) -> bool {
            self.updates >= self.duration
        }

        fn on_end(&mut self, _: &mut dyn WorldMut, request: &Request, _: &mut Outbox) {
            self.record("end", request);
        }
    }

    fn recorder_queue(
        duration: u32,
        authority: Authority,
        capacity: usize,
    ) -> (ActionQueue, Arc<Mutex<Vec<String>>>) {
        let (recorder, log) = Recorder::new(duration);
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(recorder)).unwrap();
        (ActionQueue::new(registry, authority, capacity), log)
    }

    #[test]
    fn second_request_starts_only_after_first_ends() {
        let (mut queue, log) = recorder_queue(3, Authority::Local, DEFAULT_CAPACITY);
        let mut state = GameState::default();

        assert!(queue.submit_request(&state, Request::end_turn(TeamId(0))).is_accepted());
        assert!(queue.submit_request(&state, Request::end_turn(TeamId(1))).is_accepted());

        for _ in 0..3 {
            queue.tick(&mut state, TICK_MS);
        }
        assert_eq!(*log.lock().unwrap(), vec!["start 0"]);
        assert!(queue.is_running());
        assert_eq!(queue.pending_len(), 1);

        for _ in 0..12 {
            queue.tick(&mut state, TICK_MS);
        }
        assert_eq!(
            *log.lock().unwrap(),
            vec!["start 0", "end 0", "start 1", "end 1"]
        );
        assert!(queue.is_idle());
    }

    #[test]
    fn start_and_end_never_share_a_tick() {
        let (mut queue, _) = recorder_queue(0, Authority::Local, DEFAULT_CAPACITY);
        let mut state = GameState::default();
        queue.submit_request(&state, Request::end_turn(TeamId(0)));

        let first = queue.tick(&mut state, TICK_MS);
        assert!(first.started.is_some());
        assert!(first.finished.is_none());

        let second = queue.tick(&mut state, TICK_MS);
        assert!(second.started.is_none());
        assert!(second.finished.is_some());
    }

    #[test]
    fn full_queue_rejects() {
        let (mut queue, _) = recorder_queue(1, Authority::Local, 2);
        let mut state = GameState::default();

        queue.submit_request(&state, Request::end_turn(TeamId(0)));
        queue.submit_request(&state, Request::end_turn(TeamId(0)));
        let third = queue.submit_request(&state, Request::end_turn(TeamId(0)));
        assert_eq!(
            third,
            Submission::Rejected(Rejection::Capacity { capacity: 2 })
        );

        queue.tick(&mut state, TICK_MS);
        assert!(queue.submit_request(&state, Request::end_turn(TeamId(0))).is_accepted());
    }

    #[test]
    fn unregistered_and_engine_kinds_are_rejected() {
        let (mut queue, _) = recorder_queue(1, Authority::Local, DEFAULT_CAPACITY);
        let state = GameState::default();

        let unknown = queue.submit_request(&state, Request::move_to(EntityId(1), Position::new(1, 1)));
        assert_eq!(unknown.rejection(), Some(&Rejection::UnknownKind(ActionKind::Move)));

        let counter = queue.submit_request(&state, Request::counter_attack(EntityId(1), EntityId(2)));
        assert_eq!(
            counter.rejection(),
            Some(&Rejection::EngineInitiated(ActionKind::CounterAttack))
        );
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn remote_authority_forwards_without_queueing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let authority = Authority::remote(ChannelForwarder::new(tx));
        let (mut queue, log) = recorder_queue(1, authority, DEFAULT_CAPACITY);
        let mut state = GameState::default();

        let submission = queue.submit_request(&state, Request::end_turn(TeamId(0)));
        let enriched = submission.request().cloned().unwrap();
        assert!(enriched.is_enriched());
        assert_eq!(queue.pending_len(), 0);
        assert_eq!(rx.try_recv().unwrap(), enriched);

        assert!(queue.tick(&mut state, TICK_MS).is_empty());
        assert!(log.lock().unwrap().is_empty());

        // The host echoes the request back.
        assert!(queue.submit_authoritative(&state, enriched).is_accepted());
        assert!(queue.tick(&mut state, TICK_MS).started.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unreplayable_authoritative_request_is_dropped() {
        let mut queue = ActionQueue::local();
        let state = skirmish();
        let request = Request::Move(MoveRequest {
            actor: EntityId(1),
            target: Position::new(2, -1),
            plan: Some(MovePlan {
                origin: Position::new(2, 2),
                destination: Position::new(2, -1),
                path: vec![Step::new(0, -1), Step::new(0, -1), Step::new(0, -1)],
                captures: false,
            }),
        });

        let submission = queue.submit_authoritative(&state, request);
        assert!(matches!(
            submission,
            Submission::Rejected(Rejection::Desync {
                kind: ActionKind::Move,
                ..
            })
        ));
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn raw_authoritative_request_is_a_desync() {
        let mut queue = ActionQueue::local();
        let state = skirmish();

        let submission = queue.submit_authoritative(&state, Request::attack(EntityId(1), EntityId(2)));
        assert_eq!(
            submission,
            Submission::Rejected(Rejection::Desync {
                kind: ActionKind::Attack,
                source: ActionError::NotEnriched,
            })
        );
    }

    #[test]
    fn counter_attack_runs_right_after_the_attack() {
        let mut queue = ActionQueue::local();
        let mut state = skirmish();

        assert!(queue.submit_request(&state, Request::attack(EntityId(1), EntityId(2))).is_accepted());
        assert!(queue.submit_request(&state, Request::end_turn(TeamId(0))).is_accepted());

        let mut started = Vec::new();
        for _ in 0..500 {
            if let Some(request) = queue.tick(&mut state, TICK_MS).started {
                started.push(request.kind());
            }
            if queue.is_idle() {
                break;
            }
        }

        assert_eq!(
            started,
            vec![ActionKind::Attack, ActionKind::CounterAttack, ActionKind::EndTurn]
        );
        assert_eq!(state.unit(EntityId(2)).unwrap().health.current, 6);
        assert_eq!(state.unit(EntityId(1)).unwrap().health.current, 6);
        assert_eq!(state.turn.active_team, TeamId(1));
    }

    #[test]
    fn stale_follow_up_is_dropped_at_activation() {
        let mut queue = ActionQueue::local();
        let mut state = skirmish();
        queue.submit_request(&state, Request::attack(EntityId(1), EntityId(2)));

        let mut dropped = Vec::new();
        for _ in 0..500 {
            let report = queue.tick(&mut state, TICK_MS);
            if report.finished.is_some() {
                // The counter's victim dies before the counter activates.
                state.unit_mut(EntityId(1)).unwrap().health.current = 0;
            }
            dropped.extend(report.dropped);
            if queue.is_idle() {
                break;
            }
        }

        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].0.kind(), ActionKind::CounterAttack);
        assert!(matches!(dropped[0].1, Rejection::Validation(ActionError::TargetDead(_))));
    }

    fn run_until_idle(queue: &mut ActionQueue, state: &mut GameState) -> Vec<(Request, Rejection)> {
        let mut dropped = Vec::new();
        for _ in 0..1_000 {
            dropped.extend(queue.tick(state, TICK_MS).dropped);
            if queue.is_idle() {
                break;
            }
        }
        dropped
    }

    #[test]
    fn second_intent_of_an_exhausted_actor_is_dropped() {
        let mut queue = ActionQueue::local();
        let mut state = skirmish();
        assert_eq!(state.unit(EntityId(1)).unwrap().actions_left, 1);

        // Both validate against the untouched world.
        let first = queue.submit_request(&state, Request::move_to(EntityId(1), Position::new(2, 4)));
        let second = queue.submit_request(&state, Request::move_to(EntityId(1), Position::new(2, 0)));
        assert!(first.is_accepted());
        assert!(second.is_accepted());

        let dropped = run_until_idle(&mut queue, &mut state);

        let unit = state.unit(EntityId(1)).unwrap();
        assert_eq!(unit.position, Position::new(2, 4));
        assert_eq!(unit.actions_left, 0);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].0.kind(), ActionKind::Move);
        assert_eq!(
            dropped[0].1,
            Rejection::Validation(ActionError::NoActionsLeft(EntityId(1)))
        );
    }

    #[test]
    fn strike_on_a_target_downed_meanwhile_is_dropped() {
        let mut queue = ActionQueue::local();
        let mut state = skirmish();
        state.unit_mut(EntityId(2)).unwrap().flags |= UnitFlags::REVIVABLE;
        state
            .add_unit(
                UnitState::new(EntityId(3), TeamId(0), Position::new(0, 7))
                    .with_combat(CombatStats::new(10, 1).with_fire_range(7))
                    .with_flags(UnitFlags::ARTILLERY),
            )
            .unwrap();

        // The barrage area around (4, 2) holds #2 but not #1 at (2, 2).
        let barrage = queue.submit_request(&state, Request::fire_mission(EntityId(3), Position::new(4, 2)));
        let strike = queue.submit_request(&state, Request::attack(EntityId(1), EntityId(2)));
        assert!(barrage.is_accepted());
        assert!(strike.is_accepted());

        let dropped = run_until_idle(&mut queue, &mut state);

        let target = state.unit(EntityId(2)).unwrap();
        assert_eq!(target.status, UnitStatus::Down);
        assert_eq!(target.health.current, 0);
        assert_eq!(state.unit(EntityId(1)).unwrap().actions_left, 1);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].0.kind(), ActionKind::Attack);
        assert_eq!(
            dropped[0].1,
            Rejection::Validation(ActionError::TargetDead(EntityId(2)))
        );
    }
}
