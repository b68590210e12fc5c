//! Two-state hysteresis counter turning an angle signal into rep events.

use crate::exercise::ExerciseProfile;
use serde::Serialize;

pub const DEFAULT_COOLDOWN_SECS: f64 = 0.8;
pub const DEFAULT_TARGET_REPS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RepState {
    /// Ready to count; the initial state.
    #[default]
    Up,
    /// The flexed end of the motion has been reached.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionCounters {
    pub reps: u32,
    pub sets: u32,
}

/// One completed repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepEvent {
    /// Position of this rep within its set, 1-based. Equals the target on the
    /// rep that closes a set.
    pub rep_in_set: u32,
    pub set_completed: bool,
    pub counters: SessionCounters,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepCounter {
    state: RepState,
    last_rep_at: Option<f64>,
    counters: SessionCounters,
    cooldown_secs: f64,
    target_reps: u32,
}

impl RepCounter {
    pub fn new(cooldown_secs: f64, target_reps: u32) -> Self {
        Self {
            state: RepState::Up,
            last_rep_at: None,
            counters: SessionCounters::default(),
            cooldown_secs,
            target_reps: target_reps.max(1),
        }
    }

    /// Feeds one angle sample taken at `now` (seconds, monotonic).
    pub fn on_sample(
        &mut self,
        angle: f64,
        now: f64,
        profile: &ExerciseProfile,
    ) -> Option<RepEvent> {
        if angle < profile.up_threshold() {
            self.state = RepState::Down;
        }

        if self.state != RepState::Down || angle <= profile.down_threshold() {
            return None;
        }
        if !self.cooldown_elapsed(now) {
            return None;
        }

        self.counters.reps += 1;
        self.state = RepState::Up;
        self.last_rep_at = Some(now);

        let rep_in_set = self.counters.reps;
        let set_completed = rep_in_set >= self.target_reps;
        if set_completed {
            self.counters.sets += 1;
            self.counters.reps = 0;
        }

        Some(RepEvent {
            rep_in_set,
            set_completed,
            counters: self.counters,
            timestamp: now,
        })
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        match self.last_rep_at {
            Some(last) => now - last > self.cooldown_secs,
            None => true,
        }
    }

    pub fn reset(&mut self) {
        self.state = RepState::Up;
        self.last_rep_at = None;
        self.counters = SessionCounters::default();
    }

    pub fn state(&self) -> RepState {
        self.state
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn target_reps(&self) -> u32 {
        self.target_reps
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS, DEFAULT_TARGET_REPS)
    }
}
