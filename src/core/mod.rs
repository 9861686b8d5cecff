pub mod assembler;
pub mod description;
pub mod engine;
pub mod extractor;
pub mod merge;

pub use crate::domain::model::{MetadataMap, MetadataRecord, RemoteRecord};
pub use crate::domain::ports::{Pipeline, RecordClient, Storage, SyncOutcome};
pub use crate::utils::error::Result;
