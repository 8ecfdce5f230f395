use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "typerank";

/// Where the database, config and log file live.
#[derive(Debug, Clone, PartialEq)]
pub struct AppDirs {
    data_dir: PathBuf,
    config_dir: PathBuf,
}

impl AppDirs {
    /// Platform directories, or everything under `override_dir` when given.
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        if let Some(dir) = override_dir {
            return Self::in_dir(dir);
        }
        match ProjectDirs::from("", "", APP_NAME) {
            Some(pd) => Self {
                data_dir: pd.data_local_dir().to_path_buf(),
                config_dir: pd.config_dir().to_path_buf(),
            },
            None => Self::in_dir(Path::new(".typerank")),
        }
    }

    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
            config_dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("typerank.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("typerank.log")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}
