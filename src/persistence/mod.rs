//! Host-side adapters that keep the group collection outside the process.
//! The allocation core never calls these itself.

use crate::group::InterventionGroup;
use crate::group_validation;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Repository the host injects to keep groups across restarts.
pub trait BoardStore {
    fn save_groups(&self, groups: &[InterventionGroup]) -> PersistenceResult<()>;
    fn load_groups(&self) -> PersistenceResult<Option<Vec<InterventionGroup>>>;
}

pub fn validate_groups(groups: &[InterventionGroup]) -> PersistenceResult<()> {
    group_validation::validate_group_collection(groups)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonFileBoardStore, load_catalog_from_csv, load_groups_from_json, save_groups_to_json,
    save_resource_log_to_csv,
};
