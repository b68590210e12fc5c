use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "reptrack")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|pd| pd.config_dir().join("config.json"))
    }

    /// Performance log, under `$HOME/.local/state/reptrack` when `HOME` is set.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("reptrack");
            Some(state_dir.join("performance_log.csv"))
        } else {
            Self::project().map(|pd| pd.data_local_dir().join("performance_log.csv"))
        }
    }
}
