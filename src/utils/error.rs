use crate::core::payload::StageId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record {record} is missing required field `{field}`")]
    MissingField { field: &'static str, record: usize },

    #[error("{stage} stage invoked without its upstream payload")]
    UpstreamPayloadMissing { stage: StageId },

    #[error("{stage} stage expected the payload sealed by {expected}, got {found}")]
    PayloadMismatch {
        stage: StageId,
        expected: StageId,
        found: String,
    },

    #[error("Invalid value `{value}` for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;
