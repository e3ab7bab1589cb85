use crate::utils::error::Result;
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Append-only audit file. Grows without bound; rotation is left to the host.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `"<timestamp> : <message>\n"`.
    pub async fn record(&self, message: &str) -> Result<()> {
        let entry = format_entry(&Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true), message);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Records the webhook body as received, unknown fields included.
    pub async fn record_payload(&self, payload: &serde_json::Value) -> Result<()> {
        let pretty = serde_json::to_string_pretty(payload)?;
        self.record(&format!("Received data:\n{}\n", pretty)).await
    }
}

fn format_entry(timestamp: &str, message: &str) -> String {
    format!("{} : {}\n", timestamp, message)
}
