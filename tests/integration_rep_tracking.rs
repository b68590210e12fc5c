//! End-to-end tests driving sessions through landmark frames.

use reptrack::exercise::ExerciseCatalog;
use reptrack::landmark::{LandmarkPoint, LandmarkSet, PoseLandmark};
use reptrack::perf_log::PerformanceRecord;
use reptrack::rep_counter::{RepState, SessionCounters};
use reptrack::session::{ExerciseSession, SessionSettings};
use reptrack::ExerciseProfile;

fn settings() -> SessionSettings {
    // Square frame so synthetic normalized geometry maps to exact angles
    SessionSettings {
        frame_width: 600.0,
        frame_height: 600.0,
        ..SessionSettings::default()
    }
}

/// Leg with the knee at the centre, thigh pointing up towards the hip and the
/// shin rotated `angle` degrees away from it.
fn leg(angle: f64) -> LandmarkSet {
    let rad = angle.to_radians();
    LandmarkSet::new()
        .with(PoseLandmark::LeftHip.index(), LandmarkPoint::new(0.5, 0.25, 0.95))
        .with(PoseLandmark::LeftKnee.index(), LandmarkPoint::new(0.5, 0.5, 0.95))
        .with(
            PoseLandmark::LeftAnkle.index(),
            LandmarkPoint::new(0.5 + 0.25 * rad.sin(), 0.5 - 0.25 * rad.cos(), 0.95),
        )
}

fn squat_session() -> ExerciseSession {
    let catalog = ExerciseCatalog::builtin().unwrap();
    let profile = catalog.get("Squats").unwrap().profile().unwrap().clone();
    ExerciseSession::new(profile, settings())
}

/// One squat at 30 fps: 176° down to 96° and back up in 2° steps.
fn squat_cycle(session: &mut ExerciseSession, start: f64) -> Vec<PerformanceRecord> {
    let descent = (0..=40).map(|k| 176.0 - 2.0 * k as f64);
    let ascent = (1..=40).map(|k| 96.0 + 2.0 * k as f64);
    descent
        .chain(ascent)
        .enumerate()
        .filter_map(|(i, angle)| session.on_tick(&leg(angle), start + i as f64 / 30.0))
        .collect()
}

#[test]
fn curl_counts_single_rep_at_last_sample() {
    let profile = ExerciseProfile::new("Bicep Curl", [11, 13, 15], 150.0, 90.0).unwrap();
    let mut session = ExerciseSession::new(profile, SessionSettings::default());

    let angles = [170.0, 100.0, 80.0, 95.0, 160.0];
    let times = [0.0, 0.1, 0.2, 0.3, 0.4];
    let events: Vec<(f64, PerformanceRecord)> = angles
        .iter()
        .zip(times.iter())
        .filter_map(|(a, t)| session.on_angle(*a, *t).map(|r| (*t, r)))
        .collect();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, 0.4);
    assert_eq!(events[0].1.rep_in_set, 1);
    assert_eq!(session.counters(), SessionCounters { reps: 1, sets: 0 });
    // Only 5 samples in the window: not yet scorable
    assert_eq!(events[0].1.score, 0);
}

#[test]
fn full_set_of_squats_rolls_over() {
    let mut session = squat_session();
    let mut records = Vec::new();
    for i in 0..10 {
        records.extend(squat_cycle(&mut session, i as f64 * 3.0));
    }

    assert_eq!(records.len(), 10);
    let reps: Vec<u32> = records.iter().map(|r| r.rep_in_set).collect();
    assert_eq!(reps, (1..=10).collect::<Vec<_>>());
    assert!(records[9].set_completed);
    assert_eq!(records[9].sets, 1);
    assert_eq!(session.counters(), SessionCounters { reps: 0, sets: 1 });

    // The rep closes at 156° on the way up; the 25-sample window then holds
    // 108°..156° at constant velocity, so the 96° bottom is not part of it.
    let last = &records[9];
    assert_eq!(last.smoothness, 100);
    assert_eq!(last.depth, 50);
    assert_eq!(last.score, 75);
    assert!(last.warning.is_none());
}

#[test]
fn occluded_knee_pauses_tracking() {
    let mut session = squat_session();
    session.on_tick(&leg(95.0), 0.0);
    assert_eq!(session.state(), RepState::Down);

    let mut occluded = leg(175.0);
    occluded.insert(
        PoseLandmark::LeftKnee.index(),
        LandmarkPoint::new(0.5, 0.5, 0.3),
    );
    for i in 1..5 {
        assert!(session.on_tick(&occluded, i as f64).is_none());
    }
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.counters(), SessionCounters::default());

    assert!(session.on_tick(&leg(175.0), 5.0).is_some());
}

#[test]
fn jitter_inside_cooldown_counts_once() {
    let mut session = squat_session();
    let samples = [
        (175.0, 0.0),
        (95.0, 0.2),
        (170.0, 0.4),
        (100.0, 0.5),
        (170.0, 0.6),
        (100.0, 0.7),
        (170.0, 0.8),
    ];
    let records: Vec<_> = samples
        .iter()
        .filter_map(|&(a, t)| session.on_tick(&leg(a), t))
        .collect();

    assert_eq!(records.len(), 1);
    assert_eq!(session.counters().reps, 1);
}

#[test]
fn reset_session_replays_like_a_fresh_one() {
    let mut used = squat_session();
    squat_cycle(&mut used, 0.0);
    squat_cycle(&mut used, 3.0);
    used.on_tick(&leg(95.0), 7.0);
    used.reset();

    let mut fresh = squat_session();
    for i in 0..3 {
        let start = 10.0 + i as f64 * 3.0;
        assert_eq!(squat_cycle(&mut used, start), squat_cycle(&mut fresh, start));
    }
    assert_eq!(used.status(), fresh.status());
    assert_eq!(used.history(), fresh.history());
}

#[test]
fn independent_sessions_do_not_interfere() {
    let mut a = squat_session();
    let mut b = squat_session();
    squat_cycle(&mut a, 0.0);
    squat_cycle(&mut a, 3.0);
    squat_cycle(&mut b, 0.0);

    assert_eq!(a.counters().reps, 2);
    assert_eq!(b.counters().reps, 1);
}
