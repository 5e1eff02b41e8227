//! Timer-driven progress simulation engine.
//!
//! The engine owns every run it starts and a single timer queue. Nothing
//! happens on its own: the host calls [`DetectionEngine::pump`] from its
//! event loop and every timer that is due at the injected clock's current
//! time fires, strictly in due-time order. Each fire produces at most one
//! [`TickUpdate`], delivered to the run's [`SimulationHandle`] and to any
//! observers registered with [`DetectionEngine::on_update`].

use super::clock::{Clock, ManualClock};
use super::logic::{begin_ramp, confirm_success, process_tick, TickOutcome};
use super::random::RandomSource;
use super::scheduler::{TimerId, TimerQueue};
use super::types::{
    DetectionError, Phase, RunId, SimulationConfig, SimulationState, Tier, TickUpdate,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    PreRoll(RunId),
    Tick(RunId),
    Confirm(RunId),
}

impl TimerKind {
    fn run(&self) -> RunId {
        match *self {
            TimerKind::PreRoll(id) | TimerKind::Tick(id) | TimerKind::Confirm(id) => id,
        }
    }
}

type Observer = Box<dyn FnMut(&TickUpdate)>;

struct Run {
    config: SimulationConfig,
    state: SimulationState,
    cancelled: Arc<AtomicBool>,
    updates: Sender<TickUpdate>,
    observers: Vec<Observer>,
    pre_roll_timer: Option<TimerId>,
    tick_timer: Option<TimerId>,
    confirm_timer: Option<TimerId>,
}

impl Run {
    fn emit(&mut self, id: RunId, at_ms: u64) {
        let update = TickUpdate {
            run: id,
            percentage: self.state.display_percentage(),
            phase: self.state.phase,
            at_ms,
        };
        // Receiver may already be gone; observers still hear about it
        let _ = self.updates.send(update);
        for observer in &mut self.observers {
            observer(&update);
        }
    }

    fn timers(&mut self) -> impl Iterator<Item = TimerId> {
        [
            self.pre_roll_timer.take(),
            self.tick_timer.take(),
            self.confirm_timer.take(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Caller's view of one run.
///
/// Updates are queued on a channel as the engine produces them. Once
/// [`cancel`](SimulationHandle::cancel) returns, the handle yields nothing
/// more, including updates that were queued but not yet read.
#[derive(Debug)]
pub struct SimulationHandle {
    id: RunId,
    tier: Tier,
    cancelled: Arc<AtomicBool>,
    updates: Receiver<TickUpdate>,
    latest: Cell<Option<TickUpdate>>,
}

impl SimulationHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Stop the run. Returns `true` for the call that actually cancelled it.
    ///
    /// The engine notices the flag when the run's next timer fires and
    /// retires the run without emitting. Use [`DetectionEngine::cancel`] to
    /// release the timers right away.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn try_next(&self) -> Option<TickUpdate> {
        if self.is_cancelled() {
            return None;
        }
        let update = self.updates.try_recv().ok()?;
        self.latest.set(Some(update));
        Some(update)
    }

    /// All updates produced since the last read, oldest first.
    pub fn drain(&self) -> Vec<TickUpdate> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Most recent update read through this handle.
    pub fn latest(&self) -> Option<TickUpdate> {
        self.latest.get()
    }
}

pub struct DetectionEngine<R: RandomSource, C: Clock> {
    rng: R,
    clock: C,
    timers: TimerQueue<TimerKind>,
    runs: HashMap<RunId, Run>,
    next_run: u64,
    /// Advanced tier's one scripted near miss has been used up.
    checkpoint_spent: bool,
}

impl<R: RandomSource, C: Clock> DetectionEngine<R, C> {
    pub fn new(rng: R, clock: C) -> Self {
        Self {
            rng,
            clock,
            timers: TimerQueue::new(),
            runs: HashMap::new(),
            next_run: 0,
            checkpoint_spent: false,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Begin a new attempt. Percentage resets to 0 and the run waits out
    /// the pre-roll before ramping.
    ///
    /// Starting at Basic tier clears the attempt chain, so the next
    /// Advanced attempt gets its scripted near miss again.
    pub fn start(&mut self, config: SimulationConfig) -> SimulationHandle {
        let id = RunId(self.next_run);
        self.next_run += 1;

        if config.tier() == Tier::Basic {
            self.checkpoint_spent = false;
        }

        let now = self.clock.now_ms();
        let pre_roll = self
            .timers
            .schedule(now + config.start_delay_ms(), TimerKind::PreRoll(id));
        let cancelled = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        self.runs.insert(
            id,
            Run {
                config,
                state: SimulationState::new(self.checkpoint_spent),
                cancelled: Arc::clone(&cancelled),
                updates: tx,
                observers: Vec::new(),
                pre_roll_timer: Some(pre_roll),
                tick_timer: None,
                confirm_timer: None,
            },
        );
        log::info!(
            "run {} started at {} tier (checkpoint spent: {})",
            id.0,
            config.tier(),
            self.checkpoint_spent
        );

        SimulationHandle {
            id,
            tier: config.tier(),
            cancelled,
            updates: rx,
            latest: Cell::new(None),
        }
    }

    /// Start from a raw slider level. Unknown levels fail before anything
    /// is scheduled.
    pub fn start_level(&mut self, level: u8) -> Result<SimulationHandle, DetectionError> {
        let tier = Tier::try_from(level).inspect_err(|e| log::warn!("rejected start: {}", e))?;
        Ok(self.start(SimulationConfig::for_tier(tier)))
    }

    /// Register a callback invoked once per update of this run.
    pub fn on_update(&mut self, handle: &SimulationHandle, observer: impl FnMut(&TickUpdate) + 'static) {
        if let Some(run) = self.runs.get_mut(&handle.id) {
            run.observers.push(Box::new(observer));
        }
    }

    /// Cancel a run and release its timers. Idempotent; terminal runs keep
    /// their final phase.
    pub fn cancel(&mut self, handle: &SimulationHandle) {
        handle.cancel();
        self.retire(handle.id);
    }

    /// Fire every timer due now. Returns how many fired.
    pub fn pump(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut fired = 0;
        while let Some((due_ms, _, kind)) = self.timers.pop_due(now) {
            self.fire(due_ms, kind);
            fired += 1;
        }
        fired
    }

    /// Due time of the next pending timer, if any run is still live.
    pub fn next_deadline(&mut self) -> Option<u64> {
        self.timers.next_due()
    }

    /// Snapshot of a run's state. Cancelled runs that have not reached a
    /// terminal phase report `Idle`.
    pub fn state(&self, handle: &SimulationHandle) -> Option<SimulationState> {
        let run = self.runs.get(&handle.id)?;
        let mut state = run.state.clone();
        if run.cancelled.load(Ordering::Acquire) && !state.phase.is_terminal() {
            state.phase = Phase::Idle;
        }
        Some(state)
    }

    pub fn phase(&self, handle: &SimulationHandle) -> Phase {
        self.state(handle).map_or(Phase::Idle, |s| s.phase)
    }

    pub fn is_running(&self, handle: &SimulationHandle) -> bool {
        self.phase(handle).is_active()
    }

    pub fn checkpoint_spent(&self) -> bool {
        self.checkpoint_spent
    }

    /// Clear the attempt chain without starting a run.
    pub fn reset_attempt_chain(&mut self) {
        self.checkpoint_spent = false;
    }

    /// Drop a finished run's bookkeeping. Live runs are cancelled first.
    pub fn forget(&mut self, handle: &SimulationHandle) {
        self.cancel(handle);
        self.runs.remove(&handle.id);
    }

    pub fn live_runs(&self) -> usize {
        self.runs.values().filter(|r| r.state.phase.is_active()).count()
    }

    fn retire(&mut self, id: RunId) {
        let Some(run) = self.runs.get_mut(&id) else {
            return;
        };
        for timer in run.timers() {
            self.timers.cancel(timer);
        }
        if run.state.phase.is_active() {
            run.state.phase = Phase::Idle;
            log::info!("run {} cancelled at {}%", id.0, run.state.display_percentage());
        }
    }

    fn fire(&mut self, due_ms: u64, kind: TimerKind) {
        let id = kind.run();
        let cancelled = match self.runs.get(&id) {
            Some(run) => run.cancelled.load(Ordering::Acquire),
            None => return,
        };
        if cancelled {
            self.retire(id);
            return;
        }
        let Some(run) = self.runs.get_mut(&id) else {
            return;
        };

        match kind {
            TimerKind::PreRoll(_) => {
                run.pre_roll_timer = None;
                begin_ramp(&mut run.state, &run.config);
                log::debug!("run {} ramping from {}%", id.0, run.config.ramp_start());
                run.emit(id, due_ms);
                let next = due_ms + run.config.tick_interval_ms();
                run.tick_timer = Some(self.timers.schedule(next, TimerKind::Tick(id)));
            }
            TimerKind::Tick(_) => {
                run.tick_timer = None;
                match process_tick(&mut run.state, &run.config, &mut self.rng) {
                    TickOutcome::CheckpointFailed => {
                        self.checkpoint_spent = true;
                        if let Some(timer) = run.confirm_timer.take() {
                            self.timers.cancel(timer);
                        }
                        log::info!(
                            "run {} hit the checkpoint at {}%",
                            id.0,
                            run.state.display_percentage()
                        );
                        run.emit(id, due_ms);
                    }
                    outcome @ (TickOutcome::Continue | TickOutcome::ArmConfirmation) => {
                        if outcome == TickOutcome::ArmConfirmation {
                            let confirm_at = due_ms + run.config.confirmation_delay_ms();
                            run.confirm_timer =
                                Some(self.timers.schedule(confirm_at, TimerKind::Confirm(id)));
                            log::debug!("run {} armed confirmation for {}ms", id.0, confirm_at);
                        }
                        run.emit(id, due_ms);
                        let next = due_ms + run.config.tick_interval_ms();
                        run.tick_timer = Some(self.timers.schedule(next, TimerKind::Tick(id)));
                    }
                    TickOutcome::Ignored => {}
                }
            }
            TimerKind::Confirm(_) => {
                run.confirm_timer = None;
                if confirm_success(&mut run.state, &run.config) {
                    if let Some(timer) = run.tick_timer.take() {
                        self.timers.cancel(timer);
                    }
                    log::info!(
                        "run {} succeeded at {}% after {} ticks",
                        id.0,
                        run.state.display_percentage(),
                        run.state.ticks
                    );
                    run.emit(id, due_ms);
                } else {
                    log::warn!("run {} fell below the line before confirmation", id.0);
                }
            }
        }
    }
}

impl<R: RandomSource> DetectionEngine<R, ManualClock> {
    /// Move virtual time forward and fire whatever became due.
    pub fn advance(&mut self, ms: u64) -> usize {
        self.clock.advance(ms);
        self.pump()
    }

    /// Jump from deadline to deadline until the run settles or `max_ms` of
    /// virtual time have passed. Returns the run's final phase.
    pub fn run_until_settled(&mut self, handle: &SimulationHandle, max_ms: u64) -> Phase {
        let limit = self.clock.now_ms().saturating_add(max_ms);
        while self.is_running(handle) {
            match self.next_deadline() {
                Some(due) if due <= limit => {
                    self.clock.set(due);
                    self.pump();
                }
                _ => {
                    self.clock.set(limit);
                    break;
                }
            }
        }
        self.phase(handle)
    }
}
