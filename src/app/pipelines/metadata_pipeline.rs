use crate::adapters::storage::{read_text, read_text_optional};
use crate::config::Settings;
use crate::core::assembler::{assemble, AssemblyInputs};
use crate::core::extractor::extract_title_page;
use crate::core::merge::merge_metadata;
use crate::core::{
    MetadataMap, MetadataRecord, Pipeline, RecordClient, RemoteRecord, Storage, SyncOutcome,
};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Local metadata paired with the remote draft it will be merged into.
#[derive(Debug, Clone)]
pub struct MetadataSnapshot {
    pub fresh: MetadataRecord,
    pub remote: RemoteRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataPlan {
    pub draft_id: String,
    pub metadata: MetadataMap,
}

/// Populates a draft from the replication repository's title page and README.
pub struct MetadataPipeline<R: RecordClient, S: Storage> {
    client: R,
    storage: S,
    settings: Settings,
    today: NaiveDate,
}

impl<R: RecordClient, S: Storage> MetadataPipeline<R, S> {
    pub fn new(client: R, storage: S, settings: Settings) -> Self {
        Self {
            client,
            storage,
            settings,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Fixes the fallback publication date instead of using the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn client(&self) -> &R {
        &self.client
    }

    /// Reads the sources and assembles metadata; touches no network.
    pub async fn collect_local(&self) -> Result<MetadataRecord> {
        let titlepage = read_text(&self.storage, &self.settings.titlepage_path)
            .await
            .inspect_err(|_| tracing::warn!("Could not read {}", self.settings.titlepage_path))?;
        let readme = read_text_optional(&self.storage, &self.settings.readme_path).await?;
        if readme.is_none() {
            tracing::warn!(
                "{} not found; version will not be set",
                self.settings.readme_path
            );
        }

        let page = extract_title_page(&titlepage, &self.settings.author_overrides);
        let inputs = AssemblyInputs {
            readme: readme.as_deref(),
            repository_url: &self.settings.repository_url,
            boilerplate: &self.settings.boilerplate,
            today: self.today,
        };
        let record = assemble(page, &inputs);

        tracing::info!("Title: {}", non_empty(&record.title));
        tracing::info!("Authors: {}", record.authors.len());
        tracing::info!("Keywords: {}", record.keywords.len());
        for author in &record.authors {
            tracing::debug!(
                "Author {} (affiliation: {:?}, orcid: {:?}, email: {:?})",
                author.name,
                author.affiliation,
                author.orcid,
                author.email
            );
        }
        Ok(record)
    }
}

fn non_empty(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

#[async_trait::async_trait]
impl<R: RecordClient, S: Storage> Pipeline for MetadataPipeline<R, S> {
    type Snapshot = MetadataSnapshot;
    type Plan = MetadataPlan;

    fn name(&self) -> &str {
        "populate-metadata"
    }

    async fn extract(&self) -> Result<MetadataSnapshot> {
        let fresh = self.collect_local().await?;
        let remote = self.client.fetch_deposition(&self.settings.record_id).await?;
        Ok(MetadataSnapshot { fresh, remote })
    }

    async fn transform(&self, snapshot: MetadataSnapshot) -> Result<MetadataPlan> {
        let metadata = merge_metadata(&snapshot.remote.metadata, &snapshot.fresh);
        Ok(MetadataPlan {
            draft_id: self.settings.record_id.clone(),
            metadata,
        })
    }

    async fn load(&self, plan: MetadataPlan) -> Result<SyncOutcome> {
        if self.settings.dry_run {
            return Ok(SyncOutcome::DryRun {
                record_id: plan.draft_id,
                metadata: plan.metadata,
            });
        }

        let updated = self
            .client
            .update_deposition(&plan.draft_id, &plan.metadata)
            .await?;
        tracing::info!("Successfully updated Zenodo metadata");

        Ok(SyncOutcome::Updated {
            record_id: plan.draft_id,
            record: updated,
        })
    }
}
