use async_trait::async_trait;
use bytes::Bytes;
use common::error::BoxedCause;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use super::OcrClient;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("IO error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR engine failed: {0}")]
    EngineFailure(String),

    #[error("OCR engine produced no text")]
    EmptyOutput,

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// OCR engine invoked as an external command (tesseract-compatible CLI:
/// `<command> <input> stdout`). Input bytes are staged through a temp file.
pub struct CommandLineOcr {
    command: String,
}

impl CommandLineOcr {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub async fn recognize(&self, data: &Bytes) -> Result<String, OcrError> {
        // Temp file creation hits the filesystem synchronously; keep it off
        // the async runtime threads.
        let input = tokio::task::spawn_blocking(tempfile::NamedTempFile::new).await??;
        tokio::fs::write(input.path(), data).await?;

        let output = Command::new(&self.command)
            .arg(input.path())
            .arg("stdout")
            .output()
            .await?;

        if !output.status.success() {
            return Err(OcrError::EngineFailure(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            return Err(OcrError::EmptyOutput);
        }

        debug!(bytes = data.len(), chars = text.len(), "OCR extraction finished");
        Ok(text)
    }
}

#[async_trait]
impl OcrClient for CommandLineOcr {
    async fn extract_text(&self, data: &Bytes) -> Result<String, BoxedCause> {
        self.recognize(data).await.map_err(Into::into)
    }
}
