//! Pose landmarks as delivered by the external pose estimator.
//!
//! Indices follow the 33-point body model used by common pose estimators; the
//! engine treats them as opaque identifiers referenced by exercise profiles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single landmark in normalized frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    /// Estimator confidence. A point without one is treated as not visible.
    #[serde(default)]
    pub visibility: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    pub fn is_visible(&self, min_visibility: f64) -> bool {
        self.visibility > min_visibility
    }
}

/// Named landmark indices used by the built-in exercise catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PoseLandmark {
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    LeftFootIndex,
}

impl PoseLandmark {
    pub const fn index(self) -> u32 {
        match self {
            PoseLandmark::LeftShoulder => 11,
            PoseLandmark::LeftElbow => 13,
            PoseLandmark::LeftWrist => 15,
            PoseLandmark::LeftHip => 23,
            PoseLandmark::LeftKnee => 25,
            PoseLandmark::LeftAnkle => 27,
            PoseLandmark::LeftFootIndex => 31,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::all().into_iter().find(|lm| lm.index() == index)
    }

    /// Readable name for a raw index, falling back to the number.
    pub fn label(index: u32) -> String {
        Self::from_index(index)
            .map(|lm| lm.to_string())
            .unwrap_or_else(|| index.to_string())
    }

    pub fn all() -> [Self; 7] {
        [
            PoseLandmark::LeftShoulder,
            PoseLandmark::LeftElbow,
            PoseLandmark::LeftWrist,
            PoseLandmark::LeftHip,
            PoseLandmark::LeftKnee,
            PoseLandmark::LeftAnkle,
            PoseLandmark::LeftFootIndex,
        ]
    }
}

/// All landmarks reported for one frame, keyed by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: HashMap<u32, LandmarkPoint>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: u32, point: LandmarkPoint) {
        self.points.insert(index, point);
    }

    pub fn with(mut self, index: u32, point: LandmarkPoint) -> Self {
        self.insert(index, point);
        self
    }

    pub fn get(&self, index: u32) -> Option<&LandmarkPoint> {
        self.points.get(&index)
    }

    /// Returns the point only when it is present and confidently visible.
    pub fn visible(&self, index: u32, min_visibility: f64) -> Option<&LandmarkPoint> {
        self.get(index).filter(|p| p.is_visible(min_visibility))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
