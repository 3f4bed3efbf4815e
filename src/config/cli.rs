use crate::config::STDIO;
use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Reads from and writes to local files, with `-` standing for stdin/stdout.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    input: String,
    output: String,
}

impl LocalStorage {
    pub fn new(input: String, output: String) -> Self {
        Self { input, output }
    }
}

impl Storage for LocalStorage {
    async fn read_input(&self) -> Result<Vec<u8>> {
        if self.input == STDIO {
            let mut data = Vec::new();
            tokio::io::stdin().read_to_end(&mut data).await?;
            return Ok(data);
        }
        Ok(tokio::fs::read(&self.input).await?)
    }

    async fn write_output(&self, data: &[u8]) -> Result<()> {
        if self.output == STDIO {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(data).await?;
            stdout.flush().await?;
            return Ok(());
        }

        if let Some(parent) = Path::new(&self.output).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.output, data).await?;
        Ok(())
    }
}
