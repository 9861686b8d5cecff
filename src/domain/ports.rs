use crate::domain::model::{MetadataMap, RemoteRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Request/response access to the archival service.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Published view of a record.
    async fn fetch_record(&self, record_id: &str) -> Result<RemoteRecord>;
    /// Mutable draft view of a record.
    async fn fetch_deposition(&self, deposition_id: &str) -> Result<RemoteRecord>;
    /// Overwrites the whole metadata object and returns the updated draft.
    async fn update_deposition(
        &self,
        deposition_id: &str,
        metadata: &MetadataMap,
    ) -> Result<RemoteRecord>;
    /// Opens a new draft version of a published record.
    async fn create_new_version(&self, record_id: &str) -> Result<RemoteRecord>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Updated {
        record_id: String,
        record: RemoteRecord,
    },
    Unchanged {
        record_id: String,
        record: RemoteRecord,
    },
    DryRun {
        record_id: String,
        metadata: MetadataMap,
    },
}

impl SyncOutcome {
    pub fn record_id(&self) -> &str {
        match self {
            SyncOutcome::Updated { record_id, .. }
            | SyncOutcome::Unchanged { record_id, .. }
            | SyncOutcome::DryRun { record_id, .. } => record_id,
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Snapshot: Send;
    type Plan: Send;

    fn name(&self) -> &str;
    async fn extract(&self) -> Result<Self::Snapshot>;
    async fn transform(&self, snapshot: Self::Snapshot) -> Result<Self::Plan>;
    async fn load(&self, plan: Self::Plan) -> Result<SyncOutcome>;
}
