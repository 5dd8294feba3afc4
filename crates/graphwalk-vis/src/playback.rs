//! Playback controls for a recorded step sequence.
//!
//! The controller owns the steps and a position in `[-1, len - 1]`, where
//! `-1` means nothing is selected yet. It never sleeps itself: automatic
//! advancing is expressed as a [`ScheduledAdvance`] that a driver waits on
//! and then hands back through [`Playback::fire`]. Cancelling bumps the
//! generation, so a timer that was already in flight is simply ignored.

use std::time::Duration;

use graphwalk_algorithms::Step;
use serde::{Deserialize, Serialize};

/// Interval between automatic advances unless configured otherwise.
pub const DEFAULT_SPEED_MS: u64 = 1000;

/// Receives position changes from a [`Playback`].
pub trait PlaybackListener {
    /// Called on every position change. `step` is `None` at index `-1`.
    fn step_changed(&mut self, step: Option<&Step>, index: isize, total: usize);

    /// Called once per run when the last step is reached.
    fn completed(&mut self) {}
}

impl PlaybackListener for () {
    fn step_changed(&mut self, _step: Option<&Step>, _index: isize, _total: usize) {}
}

/// Listener built from a pair of closures.
pub struct Callbacks<S, C> {
    on_step: S,
    on_complete: C,
}

impl<S, C> Callbacks<S, C>
where
    S: FnMut(Option<&Step>, isize, usize),
    C: FnMut(),
{
    pub fn new(on_step: S, on_complete: C) -> Self {
        Self { on_step, on_complete }
    }
}

impl<S, C> PlaybackListener for Callbacks<S, C>
where
    S: FnMut(Option<&Step>, isize, usize),
    C: FnMut(),
{
    fn step_changed(&mut self, step: Option<&Step>, index: isize, total: usize) {
        (self.on_step)(step, index, total)
    }

    fn completed(&mut self) {
        (self.on_complete)()
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Nothing selected, nothing scheduled
    Idle,
    /// Advancing automatically
    Playing,
    /// Stopped on a step
    Paused,
}

/// The one pending automatic advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAdvance {
    pub generation: u64,
    pub delay: Duration,
}

/// Playback controller for a step sequence.
pub struct Playback<L = ()> {
    steps: Vec<Step>,
    position: Option<usize>,
    state: PlaybackState,
    speed: Duration,
    generation: u64,
    pending: Option<ScheduledAdvance>,
    /// Completion already reported for the current run
    completed: bool,
    listener: L,
}

impl Default for Playback<()> {
    fn default() -> Self {
        Self::new(())
    }
}

impl<L: PlaybackListener> Playback<L> {
    /// Create an empty controller reporting to `listener`.
    pub fn new(listener: L) -> Self {
        Self {
            steps: Vec::new(),
            position: None,
            state: PlaybackState::Idle,
            speed: Duration::from_millis(DEFAULT_SPEED_MS),
            generation: 0,
            pending: None,
            completed: false,
            listener,
        }
    }

    pub fn with_speed(mut self, ms: u64) -> Self {
        self.speed = Duration::from_millis(ms);
        self
    }

    /// Replace the sequence and rewind to `-1`.
    pub fn load_steps(&mut self, steps: Vec<Step>) {
        self.cancel();
        self.steps = steps;
        self.position = None;
        self.state = PlaybackState::Idle;
        self.completed = false;
        tracing::debug!(steps = self.steps.len(), "playback loaded");
        self.notify();
    }

    /// Start advancing automatically. Playing from the last step starts over.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }

        if self.at_end() {
            self.position = None;
        }

        // Each play starts a new run with its own completion
        self.completed = false;
        self.state = PlaybackState::Playing;
        tracing::debug!(index = self.index(), "playback started");
        self.advance();
    }

    /// Stop advancing. The position stays where it is.
    pub fn pause(&mut self) {
        self.cancel();
        self.state = if self.position.is_some() {
            PlaybackState::Paused
        } else {
            PlaybackState::Idle
        };
    }

    /// Stop advancing and rewind to `-1`.
    pub fn stop(&mut self) {
        self.cancel();
        self.state = PlaybackState::Idle;
        self.position = None;
        self.completed = false;
        self.notify();
    }

    pub fn step_forward(&mut self) {
        if !self.can_step_forward() {
            return;
        }
        self.position = Some(self.position.map_or(0, |p| p + 1));
        self.notify();
        if self.at_end() {
            self.finish();
        }
    }

    pub fn step_backward(&mut self) {
        let Some(position) = self.position else {
            return;
        };
        self.position = position.checked_sub(1);
        if self.position.is_none() {
            self.completed = false;
        }
        self.notify();
    }

    /// Move to `index`; anything outside `[-1, len - 1]` is ignored.
    pub fn jump_to_step(&mut self, index: isize) {
        if index < -1 || index >= self.steps.len() as isize {
            return;
        }
        self.position = usize::try_from(index).ok();
        if self.position.is_none() {
            self.completed = false;
        }
        self.notify();
        if self.at_end() {
            self.finish();
        }
    }

    /// Interval for advances scheduled from now on.
    pub fn set_speed(&mut self, ms: u64) {
        self.speed = Duration::from_millis(ms);
    }

    /// The pending automatic advance, if any.
    pub fn scheduled(&self) -> Option<ScheduledAdvance> {
        self.pending
    }

    /// Run a scheduled advance. Stale generations are ignored.
    pub fn fire(&mut self, generation: u64) {
        match self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                if self.state == PlaybackState::Playing {
                    self.advance();
                }
            }
            _ => tracing::trace!(generation, "stale playback timer ignored"),
        }
    }

    pub fn state(&self) -> PlaybackStatus {
        PlaybackStatus::from(self)
    }

    pub fn phase(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current position, `-1` before the first step.
    pub fn index(&self) -> isize {
        self.position.map_or(-1, |p| p as isize)
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.position.and_then(|p| self.steps.get(p))
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed.as_millis() as u64
    }

    pub fn can_step_forward(&self) -> bool {
        self.position.map_or(0, |p| p + 1) < self.steps.len()
    }

    pub fn can_step_backward(&self) -> bool {
        self.position.is_some()
    }

    /// `(index + 1) / total`, 0 for an empty sequence.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            (self.index() + 1) as f64 / self.steps.len() as f64
        }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// True on the last step, or always for an empty sequence.
    fn at_end(&self) -> bool {
        !self.can_step_forward()
    }

    fn advance(&mut self) {
        if self.can_step_forward() {
            self.position = Some(self.position.map_or(0, |p| p + 1));
            self.notify();
        }

        if self.at_end() {
            self.finish();
        } else if self.state == PlaybackState::Playing {
            self.generation += 1;
            self.pending = Some(ScheduledAdvance {
                generation: self.generation,
                delay: self.speed,
            });
        }
    }

    fn finish(&mut self) {
        self.pause();
        if !self.completed {
            self.completed = true;
            tracing::debug!(steps = self.steps.len(), "playback complete");
            self.listener.completed();
        }
    }

    fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    fn notify(&mut self) {
        let step = self.position.and_then(|p| self.steps.get(p));
        self.listener.step_changed(step, self.index(), self.steps.len());
    }
}

/// Playback status for sending to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub current_step: isize,
    pub total_steps: usize,
    pub can_step_forward: bool,
    pub can_step_backward: bool,
    pub progress: f64,
    pub state: PlaybackState,
    pub speed_ms: u64,
}

impl<L: PlaybackListener> From<&Playback<L>> for PlaybackStatus {
    fn from(playback: &Playback<L>) -> Self {
        Self {
            is_playing: playback.is_playing(),
            current_step: playback.index(),
            total_steps: playback.total_steps(),
            can_step_forward: playback.can_step_forward(),
            can_step_backward: playback.can_step_backward(),
            progress: playback.progress(),
            state: playback.state,
            speed_ms: playback.speed_ms(),
        }
    }
}
