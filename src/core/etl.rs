use crate::core::payload::StageId;
use crate::domain::model::RunId;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::fmt;

/// Where a run currently stands. `Failed` absorbs from any stage; a stage
/// never starts before its predecessor's payload is sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Extracting,
    Transforming,
    Loading,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Pending => "pending",
            RunState::Extracting => "extracting",
            RunState::Transforming => "transforming",
            RunState::Loading => "loading",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    pub output_path: String,
    pub records_loaded: usize,
    pub final_state: RunState,
}

/// Drives one run through the three stages in order, sealing and handing
/// each payload to exactly one consumer. Retry of a failed run belongs to
/// the orchestrator calling this, not here.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self, run_id: RunId) -> Result<RunReport> {
        let mut state = RunState::Pending;
        tracing::info!(%run_id, %state, "pipeline run created");

        match self.drive(&run_id, &mut state).await {
            Ok(report) => Ok(report),
            Err(e) => {
                let failed_in = state;
                state = RunState::Failed;
                tracing::error!(%run_id, %failed_in, %state, "pipeline run failed: {e}");
                Err(e)
            }
        }
    }

    async fn drive(&self, run_id: &RunId, state: &mut RunState) -> Result<RunReport> {
        self.advance(run_id, state, RunState::Extracting);
        let extracted = self.pipeline.extract(run_id).await?;
        tracing::info!(
            %run_id,
            records = extracted.record_count(),
            bytes = extracted.size_bytes(),
            "sealed {} payload",
            StageId::Extract
        );

        self.advance(run_id, state, RunState::Transforming);
        let transformed = self.pipeline.transform(run_id, Some(extracted)).await?;
        tracing::info!(
            %run_id,
            records = transformed.record_count(),
            bytes = transformed.size_bytes(),
            "sealed {} payload",
            StageId::Transform
        );

        self.advance(run_id, state, RunState::Loading);
        let records_loaded = transformed.record_count();
        let output_path = self.pipeline.load(run_id, Some(transformed)).await?;

        self.advance(run_id, state, RunState::Done);
        Ok(RunReport {
            run_id: run_id.clone(),
            output_path,
            records_loaded,
            final_state: RunState::Done,
        })
    }

    fn advance(&self, run_id: &RunId, state: &mut RunState, next: RunState) {
        tracing::info!(%run_id, from = %state, to = %next, "run state change");
        *state = next;
    }
}
