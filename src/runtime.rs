//! Tick driver: feeds landmark frames and control events into a workout.
//!
//! The engine never reads a clock; every event carries the caller's timestamp.

use crate::error::{Error, Result};
use crate::landmark::LandmarkSet;
use crate::perf_log::{PerformanceLog, PerformanceRecord};
use crate::workout::Workout;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Lines};
use std::sync::mpsc::Receiver;

/// Unified event type consumed by the runner
#[derive(Clone, Debug, PartialEq)]
pub enum TickEvent {
    Frame { t: f64, landmarks: LandmarkSet },
    Start { t: f64 },
    Stop { t: f64 },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TickKind {
    Frame,
    Start,
    Stop,
    Reset,
}

/// Wire form of one JSON line. Kept flat so landmark indices can be read
/// straight from JSON object keys.
#[derive(Debug, Serialize, Deserialize)]
struct TickLine {
    #[serde(rename = "type")]
    kind: TickKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    landmarks: Option<LandmarkSet>,
}

impl TickLine {
    fn into_event(self) -> TickEvent {
        let t = self.t.unwrap_or(0.0);
        match self.kind {
            TickKind::Frame => TickEvent::Frame {
                t,
                landmarks: self.landmarks.unwrap_or_default(),
            },
            TickKind::Start => TickEvent::Start { t },
            TickKind::Stop => TickEvent::Stop { t },
            TickKind::Reset => TickEvent::Reset,
        }
    }
}

impl From<&TickEvent> for TickLine {
    fn from(event: &TickEvent) -> Self {
        match event {
            TickEvent::Frame { t, landmarks } => TickLine {
                kind: TickKind::Frame,
                t: Some(*t),
                landmarks: Some(landmarks.clone()),
            },
            TickEvent::Start { t } => TickLine {
                kind: TickKind::Start,
                t: Some(*t),
                landmarks: None,
            },
            TickEvent::Stop { t } => TickLine {
                kind: TickKind::Stop,
                t: Some(*t),
                landmarks: None,
            },
            TickEvent::Reset => TickLine {
                kind: TickKind::Reset,
                t: None,
                landmarks: None,
            },
        }
    }
}

impl TickEvent {
    pub fn parse_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<TickLine>(line).map(TickLine::into_event)
    }

    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&TickLine::from(self))
    }
}

/// Source of tick events, in arrival order.
pub trait TickSource {
    /// `None` once the source is exhausted.
    fn next_event(&mut self) -> Option<Result<TickEvent>>;
}

impl<T: TickSource + ?Sized> TickSource for Box<T> {
    fn next_event(&mut self) -> Option<Result<TickEvent>> {
        (**self).next_event()
    }
}

/// Reads one JSON event per line. Blank lines are skipped.
pub struct JsonlTickSource<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> JsonlTickSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> TickSource for JsonlTickSource<R> {
    fn next_event(&mut self) -> Option<Result<TickEvent>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(TickEvent::parse_line(&line).map_err(|source| Error::Stream {
                line: self.line_no,
                source,
            }));
        }
    }
}

/// Events pushed from another thread, e.g. a pose estimator loop.
pub struct ChannelTickSource {
    rx: Receiver<TickEvent>,
}

impl ChannelTickSource {
    pub fn new(rx: Receiver<TickEvent>) -> Self {
        Self { rx }
    }
}

impl TickSource for ChannelTickSource {
    fn next_event(&mut self) -> Option<Result<TickEvent>> {
        self.rx.recv().ok().map(Ok)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Record(PerformanceRecord),
    Continue,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub events: usize,
    pub frames: usize,
    pub records: usize,
    pub last_t: f64,
}

/// Advances a workout one event at a time
pub struct Runner<S: TickSource> {
    source: S,
    summary: RunSummary,
}

impl<S: TickSource> Runner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            summary: RunSummary::default(),
        }
    }

    pub fn step(&mut self, workout: &mut Workout) -> Result<Step> {
        let Some(event) = self.source.next_event() else {
            return Ok(Step::Finished);
        };
        self.summary.events += 1;

        let step = match event? {
            TickEvent::Frame { t, landmarks } => {
                self.summary.frames += 1;
                self.summary.last_t = t;
                match workout.on_tick(&landmarks, t) {
                    Some(record) => {
                        self.summary.records += 1;
                        Step::Record(record)
                    }
                    None => Step::Continue,
                }
            }
            TickEvent::Start { t } => {
                self.summary.last_t = t;
                workout.start(t);
                Step::Continue
            }
            TickEvent::Stop { t } => {
                self.summary.last_t = t;
                workout.stop(t);
                Step::Continue
            }
            TickEvent::Reset => {
                tracing::debug!("workout reset");
                workout.reset();
                Step::Continue
            }
        };
        Ok(step)
    }

    /// Drains the source. Records are handed to `log` and then to
    /// `on_record`; a failing log is reported but does not stop tracking.
    pub fn run<L, F>(
        &mut self,
        workout: &mut Workout,
        log: &mut L,
        mut on_record: F,
    ) -> Result<RunSummary>
    where
        L: PerformanceLog + ?Sized,
        F: FnMut(&PerformanceRecord),
    {
        loop {
            match self.step(workout)? {
                Step::Record(record) => {
                    if let Err(e) = log.append(&record) {
                        tracing::warn!(error = %e, "failed to append performance record");
                    }
                    on_record(&record);
                }
                Step::Continue => {}
                Step::Finished => return Ok(self.summary.clone()),
            }
        }
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseCatalog;
    use crate::landmark::LandmarkPoint;
    use crate::perf_log::MemoryLog;
    use crate::session::SessionSettings;
    use crate::workout::WorkoutStatus;
    use assert_matches::assert_matches;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn parse_frame_line() {
        let line =
            r#"{"type":"frame","t":0.25,"landmarks":{"11":{"x":0.1,"y":0.2,"visibility":0.9}}}"#;
        let event = TickEvent::parse_line(line).unwrap();
        assert_matches!(
            event,
            TickEvent::Frame { t, ref landmarks } if t == 0.25 && landmarks.get(11).is_some()
        );
    }

    #[test]
    fn parse_control_lines() {
        let start = TickEvent::parse_line(r#"{"type":"start","t":1.0}"#).unwrap();
        assert_eq!(start, TickEvent::Start { t: 1.0 });
        let stop = TickEvent::parse_line(r#"{"type":"stop","t":2.5}"#).unwrap();
        assert_eq!(stop, TickEvent::Stop { t: 2.5 });
        assert_eq!(TickEvent::parse_line(r#"{"type":"reset"}"#).unwrap(), TickEvent::Reset);
    }

    #[test]
    fn to_line_is_readable_back() {
        let event = TickEvent::Frame {
            t: 3.0,
            landmarks: LandmarkSet::new().with(25, LandmarkPoint::new(0.4, 0.6, 0.8)),
        };
        assert_eq!(TickEvent::parse_line(&event.to_line().unwrap()).unwrap(), event);
    }

    #[test]
    fn jsonl_source_skips_blank_lines_and_reports_line_numbers() {
        let input = "{\"type\":\"start\",\"t\":0}\n\n   \n{\"type\":\"bogus\"}\n";
        let mut source = JsonlTickSource::new(Cursor::new(input));

        assert_matches!(source.next_event(), Some(Ok(TickEvent::Start { .. })));
        assert_matches!(source.next_event(), Some(Err(Error::Stream { line: 4, .. })));
        assert_matches!(source.next_event(), None);
    }

    fn curl_frame(t: f64, elbow_angle: f64) -> TickEvent {
        let rad = elbow_angle.to_radians();
        TickEvent::Frame {
            t,
            landmarks: LandmarkSet::new()
                .with(11, LandmarkPoint::new(0.5, 0.3, 0.9))
                .with(13, LandmarkPoint::new(0.5, 0.5, 0.9))
                .with(15, LandmarkPoint::new(0.5 + 0.2 * rad.sin(), 0.5 - 0.2 * rad.cos(), 0.9)),
        }
    }

    fn square_settings() -> SessionSettings {
        SessionSettings {
            frame_width: 480.0,
            frame_height: 480.0,
            ..SessionSettings::default()
        }
    }

    #[test]
    fn runner_counts_reps_from_channel() {
        let catalog = ExerciseCatalog::builtin().unwrap();
        let mut workout = Workout::select(&catalog, "Bicep Curl", square_settings()).unwrap();

        let (tx, rx) = mpsc::channel();
        let producer = std::thread::spawn(move || {
            let mut t = 0.0;
            for _ in 0..3 {
                for angle in [170.0, 120.0, 70.0, 120.0, 170.0] {
                    tx.send(curl_frame(t, angle)).unwrap();
                    t += 0.25;
                }
            }
        });

        let mut runner = Runner::new(ChannelTickSource::new(rx));
        let mut log = MemoryLog::default();
        let mut seen = Vec::new();
        let summary = runner
            .run(&mut workout, &mut log, |r| seen.push(r.rep_in_set))
            .unwrap();
        producer.join().unwrap();

        assert_eq!(summary.frames, 15);
        assert_eq!(summary.records, 3);
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(log.records.len(), 3);
        assert_matches!(workout.status(summary.last_t), WorkoutStatus::Reps(s) if s.reps == 3);
    }

    #[test]
    fn runner_drives_hold_timer() {
        let catalog = ExerciseCatalog::builtin().unwrap();
        let mut workout = Workout::select(&catalog, "Plank", SessionSettings::default()).unwrap();
        let input = [
            r#"{"type":"start","t":0}"#,
            r#"{"type":"frame","t":5,"landmarks":{}}"#,
            r#"{"type":"stop","t":32}"#,
        ]
        .join("\n");

        let mut runner = Runner::new(JsonlTickSource::new(Cursor::new(input)));
        let summary = runner.run(&mut workout, &mut MemoryLog::default(), |_| {}).unwrap();

        assert_eq!(summary.events, 3);
        assert_eq!(summary.records, 0);
        assert_matches!(
            workout.status(100.0),
            WorkoutStatus::Hold(h) if h.display_secs == 30 && !h.running
        );
    }

    #[test]
    fn runner_stops_on_malformed_line() {
        let catalog = ExerciseCatalog::builtin().unwrap();
        let mut workout = Workout::select(&catalog, "Squats", SessionSettings::default()).unwrap();
        let input = Cursor::new("{\"type\":\"reset\"}\nnope\n");
        let mut runner = Runner::new(JsonlTickSource::new(input));

        assert_matches!(
            runner.run(&mut workout, &mut MemoryLog::default(), |_| {}),
            Err(Error::Stream { line: 2, .. })
        );
        assert_eq!(runner.summary().events, 2);
    }
}
