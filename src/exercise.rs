//! Exercise profiles and the catalog they are looked up from.
//!
//! The built-in catalog lives in `src/catalog/*.json`, one file per category,
//! and is embedded at compile time. Adding an exercise is a data change.

use crate::error::{Error, Result};
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

static CATALOG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/catalog");

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    #[strum(serialize = "UPPER BODY")]
    UpperBody,
    #[strum(serialize = "LOWER BODY")]
    LowerBody,
    #[strum(serialize = "CORE")]
    Core,
    #[strum(serialize = "FULL BODY / CARDIO")]
    FullBody,
}

/// Which landmarks form the tracked angle and where the hysteresis band sits.
///
/// `down_threshold` marks the extended end of the motion and must be strictly
/// greater than `up_threshold`, the flexed end.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseProfile {
    name: String,
    landmarks: [u32; 3],
    down_threshold: f64,
    up_threshold: f64,
}

impl ExerciseProfile {
    pub fn new(
        name: impl Into<String>,
        landmarks: [u32; 3],
        down_threshold: f64,
        up_threshold: f64,
    ) -> Result<Self> {
        let name = name.into();
        let valid = down_threshold.is_finite()
            && up_threshold.is_finite()
            && down_threshold > up_threshold;
        if !valid {
            return Err(Error::InvalidProfile {
                name,
                down: down_threshold,
                up: up_threshold,
            });
        }

        Ok(Self {
            name,
            landmarks,
            down_threshold,
            up_threshold,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `[first, vertex, last]`
    pub fn landmarks(&self) -> [u32; 3] {
        self.landmarks
    }

    pub fn down_threshold(&self) -> f64 {
        self.down_threshold
    }

    pub fn up_threshold(&self) -> f64 {
        self.up_threshold
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseKind {
    /// Counted from a joint angle.
    Angle(ExerciseProfile),
    /// Isometric hold, timed rather than counted.
    Hold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub category: ExerciseCategory,
    pub kind: ExerciseKind,
}

impl Exercise {
    pub fn profile(&self) -> Option<&ExerciseProfile> {
        match &self.kind {
            ExerciseKind::Angle(profile) => Some(profile),
            ExerciseKind::Hold => None,
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self.kind, ExerciseKind::Hold)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    category: ExerciseCategory,
    exercises: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(flatten)]
    kind: EntryKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EntryKind {
    Angle {
        landmarks: [u32; 3],
        down_threshold: f64,
        up_threshold: f64,
    },
    Hold,
}

/// Exercise names compare trimmed and case-insensitively.
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl CatalogFile {
    fn into_exercises(self) -> Result<Vec<Exercise>> {
        let category = self.category;
        let mut seen = HashSet::new();
        self.exercises
            .into_iter()
            .map(|entry| {
                let name = entry.name.trim().to_string();
                if !seen.insert(name_key(&name)) {
                    return Err(Error::DuplicateExercise(name));
                }
                let kind = match entry.kind {
                    EntryKind::Angle {
                        landmarks,
                        down_threshold,
                        up_threshold,
                    } => ExerciseKind::Angle(ExerciseProfile::new(
                        name.clone(),
                        landmarks,
                        down_threshold,
                        up_threshold,
                    )?),
                    EntryKind::Hold => ExerciseKind::Hold,
                };
                Ok(Exercise {
                    name,
                    category,
                    kind,
                })
            })
            .collect()
    }
}

/// Lookup table from exercise name to its tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::default();
        for file in CATALOG_DIR.files() {
            if let Some(contents) = file.contents_utf8() {
                catalog.extend_from_json(contents)?;
            }
        }
        Ok(catalog)
    }

    /// Parses one category file.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalog = Self::default();
        catalog.extend_from_json(json)?;
        Ok(catalog)
    }

    /// Adds the exercises of a category file. Entries whose name already
    /// exists replace the earlier definition.
    pub fn extend_from_json(&mut self, json: &str) -> Result<()> {
        let file: CatalogFile = serde_json::from_str(json)?;
        for exercise in file.into_exercises()? {
            self.upsert(exercise);
        }
        self.exercises.sort_by_key(|e| e.category);
        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let file: CatalogFile =
            serde_json::from_str(&contents).map_err(|source| Error::Catalog {
                path: path.to_path_buf(),
                source,
            })?;
        for exercise in file.into_exercises()? {
            tracing::debug!(
                exercise = %exercise.name,
                path = %path.display(),
                "loaded catalog entry"
            );
            self.upsert(exercise);
        }
        self.exercises.sort_by_key(|e| e.category);
        Ok(())
    }

    fn upsert(&mut self, exercise: Exercise) {
        match self
            .exercises
            .iter_mut()
            .find(|e| name_key(&e.name) == name_key(&exercise.name))
        {
            Some(existing) => *existing = exercise,
            None => self.exercises.push(exercise),
        }
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Result<&Exercise> {
        let key = name_key(name);
        self.exercises
            .iter()
            .find(|e| name_key(&e.name) == key)
            .ok_or_else(|| Error::UnknownExercise(name.to_string()))
    }

    pub fn by_category(&self, category: ExerciseCategory) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter().filter(move |e| e.category == category)
    }

    pub fn categories(&self) -> Vec<ExerciseCategory> {
        let mut categories: Vec<_> = self.exercises.iter().map(|e| e.category).collect();
        categories.dedup();
        categories
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
