use crate::domain::model::{RunSummary, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Byte-level access to the input and output streams.
pub trait Storage: Send + Sync {
    fn read_input(&self) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_output(&self, data: &[u8])
        -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn report_path(&self) -> Option<&str>;

    /// Dropped rows are reported as log events instead of plain lines.
    fn json_logs(&self) -> bool {
        false
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, data: String) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<RunSummary>;
}

