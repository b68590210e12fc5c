//! Per-rep performance records and the sinks that persist them.

use crate::error::Result;
use crate::rep_counter::RepEvent;
use crate::scoring::PerformanceSnapshot;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Emitted by a session for every completed rep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub exercise: String,
    pub rep_in_set: u32,
    pub sets: u32,
    pub set_completed: bool,
    pub smoothness: i32,
    pub depth: i32,
    pub score: i32,
    pub warning: Option<String>,
    pub timestamp: f64,
}

impl PerformanceRecord {
    pub fn new(exercise: &str, event: &RepEvent, snapshot: &PerformanceSnapshot) -> Self {
        Self {
            exercise: exercise.to_string(),
            rep_in_set: event.rep_in_set,
            sets: event.counters.sets,
            set_completed: event.set_completed,
            smoothness: snapshot.smoothness,
            depth: snapshot.depth,
            score: snapshot.score,
            warning: snapshot.warning.map(|w| w.to_string()),
            timestamp: event.timestamp,
        }
    }
}

/// One row of the CSV log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Exercise")]
    pub exercise: String,
    #[serde(rename = "Reps")]
    pub reps: u32,
    #[serde(rename = "Smoothness")]
    pub smoothness: i32,
    #[serde(rename = "Depth")]
    pub depth: i32,
    #[serde(rename = "Score")]
    pub score: i32,
}

impl LogRow {
    pub fn from_record(record: &PerformanceRecord, at: DateTime<Local>) -> Self {
        Self {
            date: at.format(DATE_FORMAT).to_string(),
            exercise: record.exercise.clone(),
            reps: record.rep_in_set,
            smoothness: record.smoothness,
            depth: record.depth,
            score: record.score,
        }
    }
}

pub trait PerformanceLog {
    fn append(&mut self, record: &PerformanceRecord) -> Result<()>;
}

/// Append-only CSV file. The header is written only when the file is created.
#[derive(Debug, Clone)]
pub struct CsvPerformanceLog {
    path: PathBuf,
}

impl CsvPerformanceLog {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_at(&mut self, record: &PerformanceRecord, at: DateTime<Local>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(LogRow::from_record(record, at))?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_rows(&self) -> Result<Vec<LogRow>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader.deserialize().collect::<std::result::Result<Vec<LogRow>, _>>()?;
        Ok(rows)
    }
}

impl PerformanceLog for CsvPerformanceLog {
    fn append(&mut self, record: &PerformanceRecord) -> Result<()> {
        self.append_at(record, Local::now())
    }
}

/// `None` discards records.
impl<T: PerformanceLog> PerformanceLog for Option<T> {
    fn append(&mut self, record: &PerformanceRecord) -> Result<()> {
        match self {
            Some(log) => log.append(record),
            None => Ok(()),
        }
    }
}

/// Keeps records in memory; used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    pub records: Vec<PerformanceRecord>,
}

impl PerformanceLog for MemoryLog {
    fn append(&mut self, record: &PerformanceRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
