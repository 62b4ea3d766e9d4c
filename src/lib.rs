pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{MemoryStore, RedisStore};
pub use config::{cli::LocalStorage, settings::Settings, CliConfig, Operation};
pub use core::{ingest::IngestEngine, project::ProjectService};
pub use domain::model::{CandidateBatch, IngestionResult};
pub use utils::error::{Result, SubbudError};
