pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, RunConfig};
pub use crate::core::{
    duration::parse_duration,
    etl::EtlEngine,
    normalizer::{normalize_row, normalize_timestamp},
    pipeline::{normalize_csv, NormalizePipeline},
};
pub use domain::model::{InputRecord, NormalizedRow, RunSummary};
pub use utils::error::{ErrorKind, EtlError, Result, RowError};
