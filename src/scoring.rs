//! Movement quality scoring over the recent angle window.

use crate::util::{first_difference, round_to_i32, std_dev};
use serde::Serialize;
use std::fmt;

/// Windows shorter than this are not scored.
pub const MIN_SCORABLE_SAMPLES: usize = 6;

/// Penalty per degree/tick of velocity standard deviation.
const SMOOTHNESS_SENSITIVITY: f64 = 12.0;
const DEPTH_SCALE: f64 = 0.7;
const DEPTH_FLOOR: i32 = 40;
const DEPTH_CEILING: i32 = 100;
const SMOOTHNESS_WARNING_BELOW: i32 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormWarning {
    ControlMovement,
}

impl fmt::Display for FormWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormWarning::ControlMovement => write!(f, "Control movement"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PerformanceSnapshot {
    pub smoothness: i32,
    pub depth: i32,
    pub score: i32,
    pub warning: Option<FormWarning>,
}

impl PerformanceSnapshot {
    pub fn warning_text(&self) -> String {
        self.warning.map(|w| w.to_string()).unwrap_or_default()
    }
}

/// Scores a window of angles (degrees, oldest first).
///
/// Smoothness penalizes erratic frame-to-frame velocity; depth rewards a
/// lower minimum angle. Windows with fewer than [`MIN_SCORABLE_SAMPLES`]
/// yield the zeroed snapshot.
pub fn score(history: &[f64]) -> PerformanceSnapshot {
    if history.len() < MIN_SCORABLE_SAMPLES {
        return PerformanceSnapshot::default();
    }

    let smoothness = smoothness(history);
    let depth = depth(history);
    let score = round_to_i32(smoothness as f64 * 0.5 + depth as f64 * 0.5);
    let warning = (smoothness < SMOOTHNESS_WARNING_BELOW).then_some(FormWarning::ControlMovement);

    PerformanceSnapshot {
        smoothness,
        depth,
        score,
        warning,
    }
}

fn smoothness(history: &[f64]) -> i32 {
    let velocity = first_difference(history);
    let jitter = std_dev(&velocity).unwrap_or(0.0);
    (100 - round_to_i32(jitter * SMOOTHNESS_SENSITIVITY)).max(0)
}

fn depth(history: &[f64]) -> i32 {
    let min_angle = history.iter().copied().fold(f64::INFINITY, f64::min);
    round_to_i32((180.0 - min_angle) * DEPTH_SCALE).clamp(DEPTH_FLOOR, DEPTH_CEILING)
}
