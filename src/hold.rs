//! Timer for isometric holds such as a plank. No angle tracking, no reps.

use serde::Serialize;

/// Seconds at the start of a hold that are not shown on the clock, giving the
/// athlete time to get into position.
pub const DEFAULT_GRACE_SECS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldStatus {
    pub exercise: String,
    pub elapsed_secs: f64,
    pub display_secs: u64,
    pub running: bool,
}

impl HoldStatus {
    pub fn clock(&self) -> String {
        format_clock(self.display_secs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoldTimer {
    exercise: String,
    grace_secs: f64,
    accumulated: f64,
    started_at: Option<f64>,
}

impl HoldTimer {
    pub fn new(exercise: impl Into<String>, grace_secs: f64) -> Self {
        Self {
            exercise: exercise.into(),
            grace_secs: grace_secs.max(0.0),
            accumulated: 0.0,
            started_at: None,
        }
    }

    pub fn start(&mut self, now: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self, now: f64) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += (now - started).max(0.0);
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total held time, including the current run if any.
    pub fn elapsed(&self, now: f64) -> f64 {
        let running = self
            .started_at
            .map_or(0.0, |started| (now - started).max(0.0));
        self.accumulated + running
    }

    /// Whole seconds shown to the athlete: elapsed time minus the grace period.
    pub fn display_secs(&self, now: f64) -> u64 {
        (self.elapsed(now).floor() - self.grace_secs.floor()).max(0.0) as u64
    }

    pub fn status(&self, now: f64) -> HoldStatus {
        HoldStatus {
            exercise: self.exercise.clone(),
            elapsed_secs: self.elapsed(now),
            display_secs: self.display_secs(now),
            running: self.is_running(),
        }
    }

    pub fn exercise(&self) -> &str {
        &self.exercise
    }
}

/// `MM:SS`
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_timer() {
        let timer = HoldTimer::new("Plank", DEFAULT_GRACE_SECS);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(100.0), 0.0);
        assert_eq!(timer.display_secs(100.0), 0);
    }

    #[test]
    fn test_running_timer_subtracts_grace() {
        let mut timer = HoldTimer::new("Plank", DEFAULT_GRACE_SECS);
        timer.start(10.0);
        assert_eq!(timer.display_secs(11.5), 0);
        assert_eq!(timer.display_secs(12.9), 0);
        assert_eq!(timer.display_secs(13.0), 1);
        assert_eq!(timer.display_secs(75.0), 63);
        assert_eq!(timer.status(75.0).clock(), "01:03");
    }

    #[test]
    fn test_stop_freezes_and_start_resumes() {
        let mut timer = HoldTimer::new("Plank", 0.0);
        timer.start(0.0);
        timer.stop(5.0);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(50.0), 5.0);

        timer.start(60.0);
        assert_eq!(timer.elapsed(63.0), 8.0);
    }

    #[test]
    fn test_repeated_start_and_stop_are_noops() {
        let mut timer = HoldTimer::new("Plank", 0.0);
        timer.stop(1.0);
        assert_eq!(timer.elapsed(2.0), 0.0);

        timer.start(2.0);
        timer.start(4.0);
        assert_eq!(timer.elapsed(5.0), 3.0);
    }

    #[test]
    fn test_reset() {
        let mut timer = HoldTimer::new("Plank", 2.0);
        timer.start(0.0);
        timer.reset();
        assert_eq!(timer, HoldTimer::new("Plank", 2.0));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(3600), "60:00");
    }
}
