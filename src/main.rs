use anyhow::{bail, Context};
use clap::Parser;
use reptrack::{
    config::{Config, ConfigStore, FileConfigStore},
    exercise::ExerciseCatalog,
    hold::format_clock,
    landmark::PoseLandmark,
    perf_log::{CsvPerformanceLog, PerformanceRecord},
    runtime::{JsonlTickSource, RunSummary, Runner, TickSource},
    workout::{Workout, WorkoutStatus},
};
use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// count reps and score movement quality from a pose landmark stream
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Replays a stream of pose landmarks (one JSON event per line) through the rep counter, printing every completed rep and appending it to a CSV performance log."
)]
pub struct Cli {
    /// exercise to track, e.g. "Bicep Curl" (see --list)
    #[clap(short = 'e', long, required_unless_present = "list")]
    exercise: Option<String>,

    /// landmark stream to read; defaults to stdin
    #[clap(short = 'i', long)]
    input: Option<PathBuf>,

    /// minimum seconds between two counted reps
    #[clap(long)]
    cooldown: Option<f64>,

    /// reps per set
    #[clap(short = 't', long)]
    target: Option<u32>,

    /// landmarks at or below this visibility are ignored
    #[clap(long)]
    min_visibility: Option<f64>,

    /// frame width in pixels used for angle computation
    #[clap(long)]
    frame_width: Option<f64>,

    /// frame height in pixels used for angle computation
    #[clap(long)]
    frame_height: Option<f64>,

    /// CSV performance log to append to
    #[clap(long)]
    log: Option<PathBuf>,

    /// do not write the performance log
    #[clap(long)]
    no_log: bool,

    /// additional exercise catalog file(s)
    #[clap(long)]
    catalog: Vec<PathBuf>,

    /// config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// list available exercises and exit
    #[clap(long)]
    list: bool,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Layers command line overrides on top of the stored config.
    fn apply_overrides(&self, mut cfg: Config) -> Config {
        if let Some(v) = self.cooldown {
            cfg.cooldown_secs = v;
        }
        if let Some(v) = self.target {
            cfg.target_reps = v;
        }
        if let Some(v) = self.min_visibility {
            cfg.min_visibility = v;
        }
        if let Some(v) = self.frame_width {
            cfg.frame_width = v;
        }
        if let Some(v) = self.frame_height {
            cfg.frame_height = v;
        }
        if let Some(path) = &self.log {
            cfg.log_path = Some(path.clone());
        }
        if self.no_log {
            cfg.log_enabled = false;
        }
        cfg
    }

    fn catalog(&self) -> anyhow::Result<ExerciseCatalog> {
        let mut catalog = ExerciseCatalog::builtin().context("built-in exercise catalog")?;
        for path in &self.catalog {
            catalog.load_file(path)?;
        }
        Ok(catalog)
    }
}

fn format_record(record: &PerformanceRecord, target: u32) -> String {
    let mut line = format!(
        "{:<18} rep {:>2}/{}  sets {}  score {:>3}  (smoothness {}, depth {})",
        record.exercise,
        record.rep_in_set,
        target,
        record.sets,
        record.score,
        record.smoothness,
        record.depth,
    );
    if let Some(warning) = &record.warning {
        line.push_str(&format!("  form: {warning}"));
    }
    line
}

fn format_summary(status: &WorkoutStatus, summary: &RunSummary) -> String {
    match status {
        WorkoutStatus::Reps(s) => format!(
            "{}: {} sets, {} reps in current set, last score {} ({} frames)",
            s.exercise, s.sets, s.reps, s.score, summary.frames
        ),
        WorkoutStatus::Hold(h) => format!("{}: held {}", h.exercise, format_clock(h.display_secs)),
    }
}

fn print_catalog(catalog: &ExerciseCatalog) {
    for (i, category) in catalog.categories().into_iter().enumerate() {
        println!("{}. {}", i + 1, category);
        for exercise in catalog.by_category(category) {
            match exercise.profile() {
                Some(p) => {
                    let joints = p.landmarks().map(PoseLandmark::label).join("-");
                    println!(
                        "   {:<18} {joints}  down > {}  up < {}",
                        exercise.name,
                        p.down_threshold(),
                        p.up_threshold()
                    );
                }
                None => println!("   {:<18} timed hold", exercise.name),
            }
        }
    }
}

fn open_source(input: Option<&PathBuf>) -> anyhow::Result<Box<dyn TickSource>> {
    let source: Box<dyn TickSource> = match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Box::new(JsonlTickSource::new(BufReader::new(file)))
        }
        None => Box::new(JsonlTickSource::new(io::stdin().lock())),
    };
    Ok(source)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let catalog = cli.catalog()?;

    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let store = cli.config_store();
    let cfg = cli.apply_overrides(store.load());
    cfg.validate().context("invalid settings")?;
    if cli.save_config {
        store
            .save(&cfg)
            .with_context(|| format!("saving config to {}", store.path().display()))?;
    }

    let Some(name) = cli.exercise.as_deref() else {
        bail!("no exercise selected");
    };
    let mut workout = Workout::select(&catalog, name, cfg.session_settings())?;

    let mut log = cfg
        .log_enabled
        .then(|| CsvPerformanceLog::with_path(cfg.resolved_log_path()));
    if let Some(log) = &log {
        tracing::info!(path = %log.path().display(), "appending performance log");
    }

    let target = match workout.status(0.0) {
        WorkoutStatus::Reps(status) => status.reps_target,
        WorkoutStatus::Hold(_) => cfg.target_reps,
    };
    let mut runner = Runner::new(open_source(cli.input.as_ref())?);
    let summary = runner.run(&mut workout, &mut log, |record| {
        println!("{}", format_record(record, target));
    })?;

    println!("{}", format_summary(&workout.status(summary.last_t), &summary));
    Ok(())
}
