use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::scoring::MIN_SCORABLE_SAMPLES;
use crate::session::SessionSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub cooldown_secs: f64,
    pub target_reps: u32,
    pub min_visibility: f64,
    pub frame_width: f64,
    pub frame_height: f64,
    pub history_capacity: usize,
    pub hold_grace_secs: f64,
    pub log_enabled: bool,
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = SessionSettings::default();
        Self {
            cooldown_secs: settings.cooldown_secs,
            target_reps: settings.target_reps,
            min_visibility: settings.min_visibility,
            frame_width: settings.frame_width,
            frame_height: settings.frame_height,
            history_capacity: settings.history_capacity,
            hold_grace_secs: settings.hold_grace_secs,
            log_enabled: true,
            log_path: None,
        }
    }
}

impl Config {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            cooldown_secs: self.cooldown_secs,
            target_reps: self.target_reps,
            min_visibility: self.min_visibility,
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            history_capacity: self.history_capacity,
            hold_grace_secs: self.hold_grace_secs,
        }
    }

    /// Rejects values the engine would silently misbehave with.
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Error {
            Error::InvalidSetting {
                name,
                value: value.to_string(),
                reason,
            }
        }

        if !(0.0..1.0).contains(&self.min_visibility) {
            return Err(invalid("min_visibility", self.min_visibility, "must be in [0, 1)"));
        }
        if !(self.cooldown_secs.is_finite() && self.cooldown_secs >= 0.0) {
            return Err(invalid("cooldown_secs", self.cooldown_secs, "must be >= 0"));
        }
        if self.target_reps == 0 {
            return Err(invalid("target_reps", self.target_reps, "must be at least 1"));
        }
        let frame = [
            ("frame_width", self.frame_width),
            ("frame_height", self.frame_height),
        ];
        for (name, value) in frame {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, value, "must be a positive pixel size"));
            }
        }
        if self.history_capacity < MIN_SCORABLE_SAMPLES {
            return Err(invalid(
                "history_capacity",
                self.history_capacity,
                "too small to score a rep",
            ));
        }
        if !(self.hold_grace_secs.is_finite() && self.hold_grace_secs >= 0.0) {
            return Err(invalid("hold_grace_secs", self.hold_grace_secs, "must be >= 0"));
        }
        Ok(())
    }

    /// Explicit log path, or the default location under the data directory.
    pub fn resolved_log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .or_else(AppDirs::log_path)
            .unwrap_or_else(|| PathBuf::from("performance_log.csv"))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path =
            AppDirs::config_path().unwrap_or_else(|| PathBuf::from("reptrack_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to defaults.
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring malformed config"
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
