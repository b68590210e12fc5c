use crate::error::Result;
use crate::exercise::{ExerciseCatalog, ExerciseKind};
use crate::hold::{HoldStatus, HoldTimer};
use crate::landmark::LandmarkSet;
use crate::perf_log::PerformanceRecord;
use crate::session::{ExerciseSession, SessionSettings, SessionStatus};

/// The tracking mode of the selected exercise.
#[derive(Debug, Clone)]
pub enum ActiveExercise {
    Reps(ExerciseSession),
    Hold(HoldTimer),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutStatus {
    Reps(SessionStatus),
    Hold(HoldStatus),
}

/// Holds whichever exercise is currently selected. Selecting a new exercise
/// throws away all state of the previous one.
#[derive(Debug, Clone)]
pub struct Workout {
    settings: SessionSettings,
    active: ActiveExercise,
}

impl Workout {
    pub fn select(
        catalog: &ExerciseCatalog,
        name: &str,
        settings: SessionSettings,
    ) -> Result<Self> {
        let exercise = catalog.get(name)?;
        let active = match &exercise.kind {
            ExerciseKind::Angle(profile) => {
                ActiveExercise::Reps(ExerciseSession::new(profile.clone(), settings.clone()))
            }
            ExerciseKind::Hold => {
                let timer = HoldTimer::new(exercise.name.clone(), settings.hold_grace_secs);
                ActiveExercise::Hold(timer)
            }
        };
        tracing::info!(
            exercise = %exercise.name,
            category = %exercise.category,
            "exercise selected"
        );

        Ok(Self { settings, active })
    }

    /// Switches to another exercise with the same settings.
    pub fn switch_to(&mut self, catalog: &ExerciseCatalog, name: &str) -> Result<()> {
        *self = Self::select(catalog, name, self.settings.clone())?;
        Ok(())
    }

    pub fn on_tick(&mut self, landmarks: &LandmarkSet, now: f64) -> Option<PerformanceRecord> {
        match &mut self.active {
            ActiveExercise::Reps(session) => session.on_tick(landmarks, now),
            ActiveExercise::Hold(_) => None,
        }
    }

    /// Starts the hold timer; rep exercises ignore it.
    pub fn start(&mut self, now: f64) {
        if let ActiveExercise::Hold(timer) = &mut self.active {
            timer.start(now);
        }
    }

    pub fn stop(&mut self, now: f64) {
        if let ActiveExercise::Hold(timer) = &mut self.active {
            timer.stop(now);
        }
    }

    pub fn reset(&mut self) {
        match &mut self.active {
            ActiveExercise::Reps(session) => session.reset(),
            ActiveExercise::Hold(timer) => timer.reset(),
        }
    }

    pub fn status(&self, now: f64) -> WorkoutStatus {
        match &self.active {
            ActiveExercise::Reps(session) => WorkoutStatus::Reps(session.status()),
            ActiveExercise::Hold(timer) => WorkoutStatus::Hold(timer.status(now)),
        }
    }

    pub fn active(&self) -> &ActiveExercise {
        &self.active
    }
}
