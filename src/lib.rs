pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, CliConfig};

pub use crate::core::etl::{EtlEngine, RunReport, RunState};
pub use crate::core::fetcher::{PageFetch, PageFetcher, PageSweep};
pub use crate::core::payload::{HandoffPayload, StageId};
pub use crate::core::pipeline::PassengerPipeline;
pub use crate::domain::model::{PageEnvelope, ProjectedRecord, RawRecord, RunId};
pub use crate::utils::error::{EtlError, Result};
