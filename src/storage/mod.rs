//! Local document store for saved schedules.
//!
//! Each schedule is one pretty-printed JSON document under
//! `data/schedules/<id>.json`, keyed by its [`ScheduleId`].

use std::path::PathBuf;
use thiserror::Error;

mod store;

pub use store::*;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schedule not found: {0}")]
    NotFound(String),

    #[error("No video with link {0} in schedule")]
    LinkNotFound(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn schedules_dir(&self) -> PathBuf {
        self.data_dir.join("schedules")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
