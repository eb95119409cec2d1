//! Runtime configuration: where data and logs live.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

/// Storage key the task collection is saved under.
pub const TASKS_KEY: &str = "pp_tasks";
/// Log file written while the terminal UI owns the screen.
pub const LOG_FILE: &str = "pp.log";

const APP_DIR: &str = "pocket-planner";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory and make sure it exists.
    ///
    /// Order: explicit override, the platform data dir, `$HOME/.pocket-planner`,
    /// then `./.pocket-planner`.
    pub fn resolve(data_dir_override: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = match data_dir_override {
            Some(p) => p.to_path_buf(),
            None => default_data_dir(),
        };
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
        debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Config { data_dir })
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    pub fn tasks_key(&self) -> &'static str {
        TASKS_KEY
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join(APP_DIR);
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(format!(".{APP_DIR}")),
        None => PathBuf::from(format!(".{APP_DIR}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_is_created() {
        let tmp = TempDir::new().unwrap();
        let wanted = tmp.path().join("nested").join("data");
        let cfg = Config::resolve(Some(&wanted)).unwrap();
        assert_eq!(cfg.data_dir, wanted);
        assert!(wanted.is_dir());
        assert_eq!(cfg.log_path(), wanted.join("pp.log"));
        assert_eq!(cfg.tasks_key(), "pp_tasks");
    }
}
