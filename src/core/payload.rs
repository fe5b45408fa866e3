use crate::domain::model::RunId;
use crate::utils::error::{EtlError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageId {
    Extract,
    Transform,
    Load,
}

impl StageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Extract => "extract",
            StageId::Transform => "transform",
            StageId::Load => "load",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sealed snapshot of one stage's complete output, keyed by run and
/// producing stage. Sealing serializes the dataset; the producer gives up
/// ownership and the one downstream consumer gets it back via [`open`].
///
/// [`open`]: HandoffPayload::open
#[derive(Debug, Clone)]
pub struct HandoffPayload {
    run: RunId,
    producer: StageId,
    record_count: usize,
    bytes: Vec<u8>,
}

impl HandoffPayload {
    /// Serializes a completed dataset under the (run, producer) key.
    pub fn seal<T: Serialize>(run: &RunId, producer: StageId, records: &[T]) -> Result<Self> {
        let bytes = serde_json::to_vec(records)?;
        Ok(Self {
            run: run.clone(),
            producer,
            record_count: records.len(),
            bytes,
        })
    }

    /// Deserializes the snapshot for `consumer`, which must name the stage
    /// it expects the payload to come from. A payload sealed by any other
    /// stage, or under another run, is rejected rather than silently read.
    pub fn open<T: DeserializeOwned>(
        &self,
        run: &RunId,
        consumer: StageId,
        expected_producer: StageId,
    ) -> Result<Vec<T>> {
        if self.run != *run {
            return Err(EtlError::PayloadMismatch {
                stage: consumer,
                expected: expected_producer,
                found: format!("{} (run {})", self.producer, self.run),
            });
        }
        if self.producer != expected_producer {
            return Err(EtlError::PayloadMismatch {
                stage: consumer,
                expected: expected_producer,
                found: self.producer.to_string(),
            });
        }
        let records = serde_json::from_slice(&self.bytes)?;
        Ok(records)
    }

    pub fn producer(&self) -> StageId {
        self.producer
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}
