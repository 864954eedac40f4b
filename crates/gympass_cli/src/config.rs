//! Runtime configuration resolved from flags, environment and defaults.

use crate::cli::Args;
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "gympass.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "gympass-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Always absolute.
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn resolve(args: &Args, cwd: &Path) -> Self {
        let db_path = args
            .db
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
        let log_level = args
            .log_level
            .clone()
            .unwrap_or_else(|| gympass_core::default_log_level().to_string());
        let log_dir = match args.log_dir.as_ref() {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        };

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}
