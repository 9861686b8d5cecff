use crate::core::{Pipeline, SyncOutcome};
use crate::utils::error::Result;

pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// One strictly sequential pass: fetch, compute, push.
    pub async fn run(&self) -> Result<SyncOutcome> {
        let name = self.pipeline.name();
        tracing::info!("Starting {}", name);

        tracing::debug!("[{}] extract", name);
        let snapshot = self.pipeline.extract().await?;

        tracing::debug!("[{}] transform", name);
        let plan = self.pipeline.transform(snapshot).await?;

        tracing::debug!("[{}] load", name);
        let outcome = self.pipeline.load(plan).await?;

        match &outcome {
            SyncOutcome::Updated { record_id, .. } => {
                tracing::info!("[{}] record {} updated", name, record_id)
            }
            SyncOutcome::Unchanged { record_id, .. } => {
                tracing::info!("[{}] record {} already up to date", name, record_id)
            }
            SyncOutcome::DryRun { record_id, .. } => {
                tracing::info!("[{}] dry run for record {}, nothing sent", name, record_id)
            }
        }

        Ok(outcome)
    }
}
