use crate::config::Settings;
use crate::core::merge::add_communities;
use crate::core::{Pipeline, RecordClient, RemoteRecord, SyncOutcome};
use crate::domain::model::DepositionState;
use crate::utils::error::{Result, SyncError};

/// What the membership check decided.
#[derive(Debug, Clone, PartialEq)]
pub enum CommunityPlan {
    AlreadyMember(RemoteRecord),
    Attach(RemoteRecord),
}

/// Adds a record to a community. Published records get a new draft version
/// first, since the service rejects metadata edits on them.
pub struct CommunityPipeline<R: RecordClient> {
    client: R,
    settings: Settings,
}

impl<R: RecordClient> CommunityPipeline<R> {
    pub fn new(client: R, settings: Settings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &R {
        &self.client
    }

    /// Id of the draft that will receive the metadata write.
    async fn writable_draft(&self, record: &RemoteRecord) -> Result<String> {
        match record.deposition_state() {
            DepositionState::Draft => Ok(self.settings.record_id.clone()),
            DepositionState::Published => {
                tracing::warn!("Record is published. Creating new version...");
                let draft = self.client.create_new_version(&self.settings.record_id).await?;
                let draft_id = draft.record_id().ok_or_else(|| SyncError::UnexpectedResponse {
                    message: "new version response has no id".to_string(),
                })?;
                tracing::info!("Created new version: {}", draft_id);
                Ok(draft_id)
            }
        }
    }
}

#[async_trait::async_trait]
impl<R: RecordClient> Pipeline for CommunityPipeline<R> {
    type Snapshot = RemoteRecord;
    type Plan = CommunityPlan;

    fn name(&self) -> &str {
        "add-community"
    }

    async fn extract(&self) -> Result<RemoteRecord> {
        let record = self.client.fetch_record(&self.settings.record_id).await?;
        tracing::info!("Current communities: {:?}", record.community_ids());
        Ok(record)
    }

    async fn transform(&self, record: RemoteRecord) -> Result<CommunityPlan> {
        if record.has_community(&self.settings.community_id) {
            tracing::info!(
                "Record is already in community '{}'",
                self.settings.community_id
            );
            return Ok(CommunityPlan::AlreadyMember(record));
        }
        Ok(CommunityPlan::Attach(record))
    }

    async fn load(&self, plan: CommunityPlan) -> Result<SyncOutcome> {
        let record = match plan {
            CommunityPlan::AlreadyMember(record) => {
                return Ok(SyncOutcome::Unchanged {
                    record_id: self.settings.record_id.clone(),
                    record,
                });
            }
            CommunityPlan::Attach(record) => record,
        };
        let community = self.settings.community_id.as_str();

        if self.settings.dry_run {
            if record.deposition_state() == DepositionState::Published {
                tracing::info!("Dry run: would create a new version before updating");
            }
            return Ok(SyncOutcome::DryRun {
                record_id: self.settings.record_id.clone(),
                metadata: add_communities(&record.metadata, &[community]),
            });
        }

        let draft_id = self.writable_draft(&record).await?;
        let deposition = self.client.fetch_deposition(&draft_id).await?;
        let metadata = add_communities(&deposition.metadata, &[community]);

        tracing::info!("Adding community '{}' to draft {}", community, draft_id);
        let updated = self.client.update_deposition(&draft_id, &metadata).await?;

        Ok(SyncOutcome::Updated {
            record_id: draft_id,
            record: updated,
        })
    }
}
