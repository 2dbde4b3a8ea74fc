pub mod assignment;
pub mod availability;
pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod group;
pub(crate) mod group_validation;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod store;

pub use availability::{AvailabilityIndex, BoardSnapshot};
pub use board::{BoardSummary, Command, IncidentBoard};
pub use catalog::{DEFAULT_ELIGIBLE_STATUS, Personnel, ResourceCatalog, Unit};
pub use config::{BoardConfig, ConfigError};
pub use error::{AllocationError, AllocationResult};
pub use group::{
    GroupField, GroupId, GroupKind, InterventionGroup, TrackedPersonnel, TrackedUnit,
    UnitDetailField,
};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteBoardStore;
pub use persistence::{
    BoardStore, JsonFileBoardStore, PersistenceError, load_catalog_from_csv,
    load_groups_from_json, save_groups_to_json, save_resource_log_to_csv, validate_groups,
};
pub use store::{DEFAULT_MAP_COLOR, GroupCollection, InterventionGroupStore};
