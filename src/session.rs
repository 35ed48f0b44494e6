use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::VisualizerConfig;
use crate::controller::{Controller, Flow, Unpaced};
use crate::emitter::{CheckpointTag, Mutation, Observer, StepEmitter};
use crate::engine::Algorithm;
use crate::error::{Error, Result};
use crate::pseudocode;
use crate::util::{random_array, MAX_SPEED, MIN_SPEED};

const COMPLETED_TEXT: &str = "Sorting complete!";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Timer paced playback.
    Auto,
    /// One checkpoint per advance.
    Step,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Mode::Auto),
            "step" => Ok(Mode::Step),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub array: Vec<i32>,
    pub highlight_a: Option<usize>,
    pub highlight_b: Option<usize>,
    pub highlight_c: Option<usize>,
    pub sorted: BTreeSet<usize>,
    pub run_state: RunState,
    pub mode: Mode,
    pub algorithm: Algorithm,
    pub speed: u8,
    pub step_count: u64,
    pub comparisons: u64,
    pub swaps: u64,
    pub current_step: String,
    pub current_tag: Option<CheckpointTag>,
}

impl SessionState {
    pub fn new(array: Vec<i32>, algorithm: Algorithm, mode: Mode, speed: u8) -> Self {
        Self {
            array,
            highlight_a: None,
            highlight_b: None,
            highlight_c: None,
            sorted: BTreeSet::new(),
            run_state: RunState::Idle,
            mode,
            algorithm,
            speed,
            step_count: 0,
            comparisons: 0,
            swaps: 0,
            current_step: String::new(),
            current_tag: None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.run_state, RunState::Running | RunState::Paused)
    }

    /// Line of the algorithm's pseudocode the last checkpoint refers to.
    pub fn current_line(&self) -> Option<usize> {
        self.current_tag
            .and_then(|tag| pseudocode::line(self.algorithm, tag))
    }

    /// Applies one engine mutation. Out of range indices are logic bugs and panic.
    pub fn apply(&mut self, mutation: Mutation) {
        let len = self.array.len();
        match mutation {
            Mutation::Highlight { a, b, c } => {
                for idx in [a, b, c].into_iter().flatten() {
                    assert!(idx < len, "highlight index {idx} out of bounds for length {len}");
                }
                self.highlight_a = a;
                self.highlight_b = b;
                self.highlight_c = c;
            }
            Mutation::Step { text, tag } => {
                self.current_step = text;
                self.current_tag = Some(tag);
                self.step_count += 1;
            }
            Mutation::Compared => self.comparisons += 1,
            Mutation::Swapped(next) => {
                assert_eq!(next.len(), len, "snapshot length changed mid-run");
                self.array = next;
                self.swaps += 1;
            }
            Mutation::Written(next) => {
                assert_eq!(next.len(), len, "snapshot length changed mid-run");
                self.array = next;
            }
            Mutation::Sorted(idx) => {
                assert!(idx < len, "sorted index {idx} out of bounds for length {len}");
                self.sorted.insert(idx);
            }
            Mutation::SortedRange { left, right } => {
                assert!(
                    left <= right && right < len,
                    "sorted range [{left}, {right}] out of bounds for length {len}"
                );
                self.sorted.extend(left..=right);
            }
        }
    }

    fn clear_highlights(&mut self) {
        self.highlight_a = None;
        self.highlight_b = None;
        self.highlight_c = None;
    }

    fn clear_run(&mut self) {
        self.clear_highlights();
        self.sorted.clear();
        self.step_count = 0;
        self.comparisons = 0;
        self.swaps = 0;
        self.current_step.clear();
        self.current_tag = None;
    }

    fn complete(&mut self) {
        self.clear_highlights();
        self.sorted = (0..self.array.len()).collect();
        self.run_state = RunState::Completed;
        self.current_step = COMPLETED_TEXT.to_string();
        self.current_tag = None;
    }
}

impl Observer for SessionState {
    fn publish(&mut self, mutation: Mutation) {
        self.apply(mutation);
    }
}

#[derive(Debug)]
enum RunEvent {
    Mutation(Mutation),
    Finished(Flow),
}

struct ChannelObserver {
    tx: Sender<RunEvent>,
}

impl Observer for ChannelObserver {
    fn publish(&mut self, mutation: Mutation) {
        // The session dropped the receiver: the run was stopped and the engine
        // unwinds at its next checkpoint.
        let _ = self.tx.send(RunEvent::Mutation(mutation));
    }
}

/// Applies mutations straight to the state and reports every narrated step.
struct InlineObserver<'a, F> {
    state: &'a mut SessionState,
    on_step: F,
}

impl<F: FnMut(&SessionState)> Observer for InlineObserver<'_, F> {
    fn publish(&mut self, mutation: Mutation) {
        let is_step = matches!(mutation, Mutation::Step { .. });
        self.state.apply(mutation);
        if is_step {
            (self.on_step)(&*self.state);
        }
    }
}

#[derive(Debug)]
struct ActiveRun {
    controller: Arc<Controller>,
    events: Receiver<RunEvent>,
    worker: JoinHandle<()>,
}

/// Owns the state the UI reads. Runs execute on a worker thread that streams
/// mutations back; only [`Session::pump`] applies them.
#[derive(Debug)]
pub struct Session {
    config: VisualizerConfig,
    rng: StdRng,
    state: SessionState,
    run: Option<ActiveRun>,
}

impl Session {
    pub fn new(config: VisualizerConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let array = random_array(
            &mut rng,
            config.array_length,
            config.min_value,
            config.max_value,
        );
        let state = SessionState::new(array, Algorithm::Bubble, Mode::Auto, config.default_speed);

        Ok(Self {
            config,
            rng,
            state,
            run: None,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    pub fn select_algorithm(&mut self, algorithm: Algorithm) -> bool {
        if self.state.is_active() {
            debug!(%algorithm, "algorithm change ignored while a run is active");
            return false;
        }
        self.state.algorithm = algorithm;
        true
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.state.is_active() {
            debug!(%mode, "mode change ignored while a run is active");
            return false;
        }
        self.state.mode = mode;
        true
    }

    /// Clamps into `1..=100` and returns the speed actually set.
    pub fn set_speed(&mut self, speed: u8) -> u8 {
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.state.speed = speed;
        if let Some(run) = &self.run {
            run.controller.set_speed(speed);
        }
        speed
    }

    /// Replaces the array with user supplied values. Rejected during a run.
    pub fn set_array(&mut self, values: Vec<i32>) -> bool {
        if self.state.is_active() {
            debug!("array change ignored while a run is active");
            return false;
        }
        self.state.array = values;
        self.state.clear_run();
        self.state.run_state = RunState::Idle;
        true
    }

    /// Starts a run on a worker thread. `Ok(false)` if a run is already active.
    pub fn start(&mut self, algorithm: Algorithm) -> Result<bool> {
        if self.state.is_active() {
            debug!(%algorithm, "start ignored while a run is active");
            return Ok(false);
        }
        self.halt();

        let controller = Arc::new(Controller::new(
            self.state.mode,
            self.state.speed,
            self.config.delay_unit,
        ));
        let (tx, events) = mpsc::channel();
        let mut data = self.state.array.clone();
        let engine = algorithm.engine();
        let worker_ctl = Arc::clone(&controller);

        let worker = thread::Builder::new()
            .name(format!("sortscope-{algorithm}"))
            .spawn(move || {
                let mut sink = ChannelObserver { tx };
                let flow = {
                    let mut out = StepEmitter::new(&mut sink);
                    engine.run(&mut data, worker_ctl.as_ref(), &mut out)
                };
                let _ = sink.tx.send(RunEvent::Finished(flow));
            })
            .map_err(Error::Spawn)?;

        self.state.algorithm = algorithm;
        self.state.clear_run();
        self.state.run_state = RunState::Running;
        self.run = Some(ActiveRun {
            controller,
            events,
            worker,
        });
        info!(
            %algorithm,
            mode = %self.state.mode,
            len = self.state.array.len(),
            "run started"
        );
        Ok(true)
    }

    /// Like [`Session::start`] but from a user supplied selector.
    pub fn start_named(&mut self, name: &str) -> Result<bool> {
        let algorithm = name.parse::<Algorithm>()?;
        self.start(algorithm)
    }

    pub fn toggle_pause(&mut self) -> bool {
        let Some(run) = &self.run else {
            return false;
        };
        let paused = match self.state.run_state {
            RunState::Running => true,
            RunState::Paused => false,
            _ => return false,
        };
        run.controller.set_paused(paused);
        self.state.run_state = if paused {
            RunState::Paused
        } else {
            RunState::Running
        };
        debug!(paused, "pause toggled");
        true
    }

    /// Releases the engine from a step wait. No-op unless it is waiting on one.
    pub fn advance_step(&mut self) -> bool {
        match &self.run {
            Some(run) if self.state.is_active() => run.controller.advance_step(),
            _ => false,
        }
    }

    pub fn is_awaiting_step(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| run.controller.is_awaiting_step())
    }

    /// Terminates the active run and returns to idle with the last published array.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.halt();
        self.state.clear_run();
        self.state.run_state = RunState::Idle;
        info!("run stopped");
        true
    }

    /// Terminates any active run and reinitializes every field: a fresh random
    /// array, and the default algorithm, mode and speed.
    pub fn reset(&mut self) {
        self.halt();
        let array = random_array(
            &mut self.rng,
            self.config.array_length,
            self.config.min_value,
            self.config.max_value,
        );
        self.state = SessionState::new(
            array,
            Algorithm::Bubble,
            Mode::Auto,
            self.config.default_speed,
        );
        debug!("session reset");
    }

    /// Applies everything the engine has published so far without blocking.
    /// Returns whether the state changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        loop {
            let event = match self.run.as_ref().map(|run| run.events.try_recv()) {
                None | Some(Err(TryRecvError::Empty)) => break,
                Some(Err(TryRecvError::Disconnected)) => {
                    self.abandon();
                    return true;
                }
                Some(Ok(event)) => event,
            };
            changed = true;
            self.handle(event);
        }
        changed
    }

    /// Waits up to `timeout` for the engine to publish, then drains like [`Session::pump`].
    pub fn pump_timeout(&mut self, timeout: Duration) -> bool {
        let first = match self.run.as_ref().map(|run| run.events.recv_timeout(timeout)) {
            None | Some(Err(RecvTimeoutError::Timeout)) => return false,
            Some(Err(RecvTimeoutError::Disconnected)) => {
                self.abandon();
                return true;
            }
            Some(Ok(event)) => event,
        };
        self.handle(first);
        self.pump();
        true
    }

    /// Runs `algorithm` to the end on the calling thread without pacing, calling
    /// `on_step` with the state after every narrated step.
    pub fn run_to_completion<F>(&mut self, algorithm: Algorithm, on_step: F) -> Result<bool>
    where
        F: FnMut(&SessionState),
    {
        if self.state.is_active() {
            debug!(%algorithm, "inline run ignored while a run is active");
            return Ok(false);
        }
        self.halt();

        self.state.algorithm = algorithm;
        self.state.clear_run();
        self.state.run_state = RunState::Running;
        info!(%algorithm, len = self.state.array.len(), "inline run started");

        let mut data = self.state.array.clone();
        let flow = {
            let mut sink = InlineObserver {
                state: &mut self.state,
                on_step,
            };
            let mut out = StepEmitter::new(&mut sink);
            algorithm.engine().run(&mut data, &Unpaced, &mut out)
        };

        match flow {
            Ok(()) => {
                self.state.complete();
                info!(
                    comparisons = self.state.comparisons,
                    swaps = self.state.swaps,
                    "run completed"
                );
                Ok(true)
            }
            Err(_) => {
                self.state.clear_run();
                self.state.run_state = RunState::Idle;
                Ok(false)
            }
        }
    }

    fn handle(&mut self, event: RunEvent) {
        match event {
            RunEvent::Mutation(mutation) => self.state.apply(mutation),
            RunEvent::Finished(Ok(())) => {
                self.join_worker();
                self.state.complete();
                info!(
                    algorithm = %self.state.algorithm,
                    steps = self.state.step_count,
                    comparisons = self.state.comparisons,
                    swaps = self.state.swaps,
                    "run completed"
                );
            }
            RunEvent::Finished(Err(_)) => {
                self.join_worker();
                self.state.clear_run();
                self.state.run_state = RunState::Idle;
            }
        }
    }

    fn join_worker(&mut self) {
        if let Some(run) = self.run.take() {
            if run.worker.join().is_err() {
                warn!("sorting worker panicked");
            }
        }
    }

    /// The worker went away without reporting an outcome.
    fn abandon(&mut self) {
        warn!("sorting worker disconnected before finishing");
        self.join_worker();
        self.state.clear_run();
        self.state.run_state = RunState::Idle;
    }

    /// Stops and joins the worker. Bounded by one checkpoint interval since every
    /// wait in the controller wakes on stop.
    fn halt(&mut self) {
        if let Some(run) = self.run.take() {
            run.controller.request_stop();
            drop(run.events);
            if run.worker.join().is_err() {
                warn!("sorting worker panicked");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.halt();
    }
}
