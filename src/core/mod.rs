pub mod etl;
pub mod fetcher;
pub mod payload;
pub mod pipeline;

pub use crate::domain::model::{ProjectedRecord, RawRecord, RunId};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
