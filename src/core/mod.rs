pub mod duration;
pub mod etl;
pub mod normalizer;
pub mod pipeline;

pub use crate::domain::model::{InputRecord, NormalizedRow, RunSummary, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
