use crate::exercise::ExerciseProfile;
use crate::geometry::{joint_angle, Point2};
use crate::history::{AngleHistory, DEFAULT_HISTORY_CAPACITY};
use crate::landmark::LandmarkSet;
use crate::perf_log::PerformanceRecord;
use crate::rep_counter::{
    RepCounter, RepState, SessionCounters, DEFAULT_COOLDOWN_SECS, DEFAULT_TARGET_REPS,
};
use crate::scoring::{score, PerformanceSnapshot};
use serde::Serialize;

pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;
pub const DEFAULT_FRAME_WIDTH: f64 = 640.0;
pub const DEFAULT_FRAME_HEIGHT: f64 = 480.0;

/// Tunables shared by every session of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub cooldown_secs: f64,
    pub target_reps: u32,
    pub min_visibility: f64,
    pub frame_width: f64,
    pub frame_height: f64,
    pub history_capacity: usize,
    pub hold_grace_secs: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            target_reps: DEFAULT_TARGET_REPS,
            min_visibility: DEFAULT_MIN_VISIBILITY,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            hold_grace_secs: crate::hold::DEFAULT_GRACE_SECS,
        }
    }
}

/// What a renderer shows after each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub exercise: String,
    pub reps: u32,
    pub reps_target: u32,
    pub sets: u32,
    pub score: i32,
    pub warning: String,
}

/// Rep tracking for one selected angle-based exercise.
///
/// Owns the counter state, the angle window and the latest score. Nothing is
/// shared between sessions.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    profile: ExerciseProfile,
    settings: SessionSettings,
    counter: RepCounter,
    history: AngleHistory,
    snapshot: PerformanceSnapshot,
    last_angle: Option<f64>,
}

impl ExerciseSession {
    pub fn new(profile: ExerciseProfile, settings: SessionSettings) -> Self {
        Self {
            counter: RepCounter::new(settings.cooldown_secs, settings.target_reps),
            history: AngleHistory::new(settings.history_capacity),
            snapshot: PerformanceSnapshot::default(),
            last_angle: None,
            profile,
            settings,
        }
    }

    /// Processes one landmark set. Ticks where any required landmark is
    /// missing or not confidently visible are ignored entirely.
    pub fn on_tick(&mut self, landmarks: &LandmarkSet, now: f64) -> Option<PerformanceRecord> {
        let Some(angle) = self.angle_from(landmarks) else {
            tracing::trace!(
                exercise = self.profile.name(),
                now,
                "landmarks not visible, tick skipped"
            );
            return None;
        };
        self.on_angle(angle, now)
    }

    /// Processes a precomputed joint angle.
    pub fn on_angle(&mut self, angle: f64, now: f64) -> Option<PerformanceRecord> {
        self.last_angle = Some(angle);
        // The closing sample of a rep must be part of the scored window
        self.history.push(angle);

        let event = self.counter.on_sample(angle, now, &self.profile)?;
        self.snapshot = score(&self.history.to_vec());

        tracing::debug!(
            exercise = self.profile.name(),
            rep = event.rep_in_set,
            sets = event.counters.sets,
            score = self.snapshot.score,
            "rep completed"
        );
        if event.set_completed {
            tracing::info!(
                exercise = self.profile.name(),
                sets = event.counters.sets,
                "set completed"
            );
        }

        Some(PerformanceRecord::new(self.profile.name(), &event, &self.snapshot))
    }

    fn angle_from(&self, landmarks: &LandmarkSet) -> Option<f64> {
        let min_visibility = self.settings.min_visibility;
        let [first, vertex, last] = self.profile.landmarks();
        let a = landmarks.visible(first, min_visibility)?;
        let b = landmarks.visible(vertex, min_visibility)?;
        let c = landmarks.visible(last, min_visibility)?;

        Some(joint_angle(
            Point2::from(a),
            Point2::from(b),
            Point2::from(c),
            self.settings.frame_width,
            self.settings.frame_height,
        ))
    }

    /// Returns the session to its freshly constructed state.
    pub fn reset(&mut self) {
        self.counter.reset();
        self.history.clear();
        self.snapshot = PerformanceSnapshot::default();
        self.last_angle = None;
    }

    pub fn status(&self) -> SessionStatus {
        let counters = self.counter.counters();
        SessionStatus {
            exercise: self.profile.name().to_string(),
            reps: counters.reps,
            reps_target: self.counter.target_reps(),
            sets: counters.sets,
            score: self.snapshot.score,
            warning: self.snapshot.warning_text(),
        }
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn counters(&self) -> SessionCounters {
        self.counter.counters()
    }

    pub fn state(&self) -> RepState {
        self.counter.state()
    }

    pub fn snapshot(&self) -> &PerformanceSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &AngleHistory {
        &self.history
    }

    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }
}
