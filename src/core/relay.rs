use crate::adapters::FileLogSink;
use crate::config::{DocumentConfig, RemoteConfig};
use crate::core::splitter::split;
use crate::core::transfer::{refresh_metadata, with_session, SessionWork};
use crate::domain::model::{ContentItem, SplitDocuments, SyncOutcome};
use crate::domain::ports::{Storage, TransferClient, TransferSession};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Local paths of the two documents produced by one request.
#[derive(Debug, Clone)]
pub struct WrittenDocuments {
    pub french: PathBuf,
    pub english: PathBuf,
}

/// Receives a batch of items, writes the two calendars and publishes them.
pub struct Relay<S: Storage, T: TransferClient> {
    storage: S,
    transfer: T,
    log: FileLogSink,
    documents: DocumentConfig,
    remote: RemoteConfig,
}

impl<S: Storage, T: TransferClient> Relay<S, T> {
    pub fn new(
        storage: S,
        transfer: T,
        log: FileLogSink,
        documents: DocumentConfig,
        remote: RemoteConfig,
    ) -> Self {
        Self {
            storage,
            transfer,
            log,
            documents,
            remote,
        }
    }

    pub fn log(&self) -> &FileLogSink {
        &self.log
    }

    /// Runs the whole workflow for one request.
    ///
    /// The payload is recorded exactly as received before it is read as a list
    /// of items. Local failures (audit log, documents) and a payload that is
    /// not such a list are returned as errors. Transfer failures are logged and
    /// reported through [`SyncOutcome::Failed`].
    pub async fn handle(&self, payload: &serde_json::Value) -> Result<SyncOutcome> {
        self.log.record_payload(payload).await?;

        let items = ContentItem::parse_batch(payload)?;
        tracing::info!("Received {} content items", items.len());

        let documents = split(&items);
        let written = self.write_documents(&documents).await?;

        match self.publish(&written).await {
            Ok(()) => {
                tracing::info!("Calendars published and metadata refreshed");
                Ok(SyncOutcome::Applied)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to update SFTP files or metadata: {} (category: {:?})",
                    e,
                    e.category()
                );
                if let Err(log_err) = self
                    .log
                    .record(&format!("ERROR transfer failed: {}", e))
                    .await
                {
                    tracing::warn!(
                        "Could not append the transfer failure to the audit log: {}",
                        log_err
                    );
                }
                Ok(SyncOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    pub async fn write_documents(&self, documents: &SplitDocuments) -> Result<WrittenDocuments> {
        let french = self
            .storage
            .write_file(&self.documents.french_file, documents.french.as_bytes())
            .await?;
        tracing::info!("File {} created/updated", french.display());

        let english = self
            .storage
            .write_file(&self.documents.english_file, documents.english.as_bytes())
            .await?;
        tracing::info!("File {} created/updated", english.display());

        Ok(WrittenDocuments { french, english })
    }

    /// Uploads both calendars, then refreshes every configured target, in one session.
    pub async fn publish(&self, written: &WrittenDocuments) -> Result<()> {
        with_session(
            &self.transfer,
            Publish {
                written,
                remote: &self.remote,
            },
        )
        .await
    }
}

struct Publish<'a> {
    written: &'a WrittenDocuments,
    remote: &'a RemoteConfig,
}

#[async_trait]
impl<'a, X: TransferSession> SessionWork<X> for Publish<'a> {
    type Output = ();

    async fn run(self, session: &mut X) -> Result<()> {
        session
            .upload(&self.written.french, &self.remote.french_calendar)
            .await?;
        session
            .upload(&self.written.english, &self.remote.english_calendar)
            .await?;
        tracing::info!("Files uploaded");

        for target in &self.remote.refresh_targets {
            refresh_metadata(session, target).await?;
        }
        tracing::info!("Remote file metadata refreshed");
        Ok(())
    }
}
