// Library surface shared by the binary and the integration tests.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod exercise;
pub mod geometry;
pub mod history;
pub mod hold;
pub mod landmark;
pub mod perf_log;
pub mod rep_counter;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod util;
pub mod workout;

pub use error::{Error, Result};
pub use exercise::{ExerciseCatalog, ExerciseProfile};
pub use session::{ExerciseSession, SessionSettings};
pub use workout::Workout;
