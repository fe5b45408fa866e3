use crate::core::fetcher::PageFetcher;
use crate::core::payload::{HandoffPayload, StageId};
use crate::domain::model::{ProjectedRecord, RawRecord, RunId};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};

/// The paged-API → CSV pipeline: extract walks the source page by page,
/// transform projects down to `_id`/`name`/`trips`, load writes the CSV.
pub struct PassengerPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    fetcher: PageFetcher,
}

impl<S: Storage, C: ConfigProvider> PassengerPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let fetcher = PageFetcher::new(config.base_url().to_string(), config.page_size());
        Self {
            storage,
            config,
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PassengerPipeline<S, C> {
    /// Walks every page the source reports and seals the concatenation.
    ///
    /// Pages answering non-200 are dropped with a warning; a failed page 0
    /// degrades the whole run to an empty dataset instead of aborting.
    /// Inherited behavior, kept deliberately even though it can mask a dead
    /// source as "zero records".
    async fn extract(&self, run: &RunId) -> Result<HandoffPayload> {
        let sweep = self.fetcher.sweep().await?;

        if !sweep.failed_pages.is_empty() {
            tracing::warn!(
                %run,
                failed_pages = ?sweep.failed_pages,
                "records on unavailable pages are lost for this run"
            );
        }
        tracing::debug!(%run, records = sweep.records.len(), "extraction complete");

        HandoffPayload::seal(run, StageId::Extract, &sweep.records)
    }

    async fn transform(
        &self,
        run: &RunId,
        upstream: Option<HandoffPayload>,
    ) -> Result<HandoffPayload> {
        let payload = upstream.ok_or(EtlError::UpstreamPayloadMissing {
            stage: StageId::Transform,
        })?;
        let raw: Vec<RawRecord> = payload.open(run, StageId::Transform, StageId::Extract)?;

        let mut projected = Vec::with_capacity(raw.len());
        for (index, record) in raw.iter().enumerate() {
            projected.push(ProjectedRecord::from_raw(record, index)?);
        }
        tracing::debug!(%run, records = projected.len(), "projection complete");

        HandoffPayload::seal(run, StageId::Transform, &projected)
    }

    /// Terminal stage: encodes the projected records as CSV and writes them
    /// to the configured destination, truncating whatever was there.
    async fn load(&self, run: &RunId, upstream: Option<HandoffPayload>) -> Result<String> {
        let payload = upstream.ok_or(EtlError::UpstreamPayloadMissing {
            stage: StageId::Load,
        })?;
        let records: Vec<ProjectedRecord> = payload.open(run, StageId::Load, StageId::Transform)?;

        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            writer.write_record(["_id", "name", "trips"])?;
            for record in &records {
                writer.write_record([
                    record.id.as_str(),
                    record.name.as_str(),
                    csv_field(&record.trips).as_str(),
                ])?;
            }
            writer.flush()?;
        }

        let output_path = self.config.output_path();
        self.storage.write_file(output_path, &buf).await?;
        tracing::debug!(%run, records = records.len(), output_path, "load complete");

        Ok(output_path.to_string())
    }
}

/// Stable text form of an opaque field value: strings verbatim, null empty,
/// everything else as compact JSON. The CSV writer handles quoting.
fn csv_field(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
