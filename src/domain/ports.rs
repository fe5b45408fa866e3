use crate::core::payload::HandoffPayload;
use crate::domain::model::RunId;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn page_size(&self) -> u32;
    fn output_path(&self) -> &str;
}

/// The three stages of one run. Each is independently invocable by an
/// orchestrator: it takes the run id plus its predecessor's sealed payload
/// and returns its own payload (or, for the terminal stage, the destination
/// path). Sequencing between stages is the caller's job.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, run: &RunId) -> Result<HandoffPayload>;

    async fn transform(
        &self,
        run: &RunId,
        upstream: Option<HandoffPayload>,
    ) -> Result<HandoffPayload>;

    async fn load(&self, run: &RunId, upstream: Option<HandoffPayload>) -> Result<String>;
}
