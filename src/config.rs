use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "EMPLEA_DATA_DIR";
const DB_FILE: &str = "emplea.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Resolve the data directory: explicit flag, then `EMPLEA_DATA_DIR`, then
    /// the platform data directory, then the working directory.
    pub fn resolve(data_dir: Option<PathBuf>, verbose: bool) -> Self {
        let from_env = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            data_dir: data_dir
                .or(from_env)
                .unwrap_or_else(default_data_dir),
            verbose,
        }
    }

    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            verbose: false,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "emplea") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}
