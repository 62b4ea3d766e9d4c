pub mod ingest;
pub mod project;
pub mod report;

pub use crate::domain::model::{CandidateBatch, IngestionResult};
pub use crate::domain::ports::{DomainStore, IngestObserver, NoopObserver, Storage, StoreSettings};
pub use crate::utils::error::Result;
