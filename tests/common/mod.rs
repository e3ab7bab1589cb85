//! Shared helpers: an in-memory transfer double and a relay wired to a temp dir.

#![allow(dead_code)]

use async_trait::async_trait;
use calendar_relay::config::{DocumentConfig, RemoteConfig};
use calendar_relay::domain::ports::{TransferClient, TransferSession};
use calendar_relay::{ContentItem, FileLogSink, LocalStorage, Relay, RelayError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const FR_REFRESH: &str = "/site/calendrier.html";
pub const EN_REFRESH: &str = "/site/calendar.html";

#[derive(Debug, Clone)]
pub struct Upload {
    pub local_path: PathBuf,
    pub remote_path: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub remote_files: HashMap<String, Vec<u8>>,
    pub uploads: Vec<Upload>,
    pub fetches: Vec<String>,
    pub connects: usize,
    pub closes: usize,
    pub leaked: usize,
    pub fail_connect: bool,
    pub fail_upload_to: Option<String>,
    /// Replaced by a directory when a connection is attempted, which then fails.
    pub break_log_on_connect: Option<PathBuf>,
}

/// Remote host kept in memory. Counts sessions so tests can check that each one is closed.
#[derive(Debug, Clone, Default)]
pub struct MockTransfer {
    pub state: Arc<Mutex<MockState>>,
}

impl MockTransfer {
    pub fn with_remote_file(self, path: &str, data: &[u8]) -> Self {
        self.state
            .lock()
            .unwrap()
            .remote_files
            .insert(path.to_string(), data.to_vec());
        self
    }

    pub fn failing_connect(self) -> Self {
        self.state.lock().unwrap().fail_connect = true;
        self
    }

    pub fn failing_upload_to(self, path: &str) -> Self {
        self.state.lock().unwrap().fail_upload_to = Some(path.to_string());
        self
    }

    pub fn remote_file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().remote_files.get(path).cloned()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    pub fn leaked(&self) -> usize {
        self.state.lock().unwrap().leaked
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.lock().unwrap().uploads.clone()
    }
}

impl TransferClient for MockTransfer {
    type Session = MockSession;

    async fn connect(&self) -> Result<MockSession> {
        let mut state = self.state.lock().unwrap();
        if let Some(log_path) = state.break_log_on_connect.clone() {
            let _ = std::fs::remove_file(&log_path);
            std::fs::create_dir_all(&log_path)?;
            return Err(RelayError::transfer("connect", "host unreachable"));
        }
        if state.fail_connect {
            return Err(RelayError::transfer("connect", "connection refused"));
        }
        state.connects += 1;

        Ok(MockSession {
            state: self.state.clone(),
            closed: false,
        })
    }
}

pub struct MockSession {
    state: Arc<Mutex<MockState>>,
    closed: bool,
}

#[async_trait]
impl TransferSession for MockSession {
    async fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<()> {
        assert!(!self.closed, "upload on a closed session");
        let data = std::fs::read(local_path)?;

        let mut state = self.state.lock().unwrap();
        if state.fail_upload_to.as_deref() == Some(remote_path) {
            return Err(RelayError::transfer("upload", format!("{}: permission denied", remote_path)));
        }
        state.uploads.push(Upload {
            local_path: local_path.to_path_buf(),
            remote_path: remote_path.to_string(),
            data: data.clone(),
        });
        state.remote_files.insert(remote_path.to_string(), data);
        Ok(())
    }

    async fn fetch(&mut self, remote_path: &str) -> Result<Vec<u8>> {
        assert!(!self.closed, "fetch on a closed session");
        let mut state = self.state.lock().unwrap();
        state.fetches.push(remote_path.to_string());
        state
            .remote_files
            .get(remote_path)
            .cloned()
            .ok_or_else(|| RelayError::transfer("fetch", format!("{}: no such file", remote_path)))
    }

    async fn close(&mut self) -> Result<()> {
        assert!(!self.closed, "session closed twice");
        self.closed = true;
        self.state.lock().unwrap().closes += 1;
        Ok(())
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Ok(mut state) = self.state.lock() {
                state.leaked += 1;
            }
        }
    }
}

pub fn remote_config() -> RemoteConfig {
    RemoteConfig {
        french_calendar: "/data/data_calendrier.html".to_string(),
        english_calendar: "/data/data_calendar.html".to_string(),
        refresh_targets: vec![FR_REFRESH.to_string(), EN_REFRESH.to_string()],
    }
}

/// A transfer double that already hosts both refresh targets.
pub fn seeded_transfer() -> MockTransfer {
    MockTransfer::default()
        .with_remote_file(FR_REFRESH, b"<html>calendrier</html>")
        .with_remote_file(EN_REFRESH, b"<html>calendar</html>")
}

pub fn payload(items: &[ContentItem]) -> serde_json::Value {
    serde_json::to_value(items).unwrap()
}

pub struct TestRelay {
    pub relay: Arc<Relay<LocalStorage, MockTransfer>>,
    pub transfer: MockTransfer,
    pub temp_dir: TempDir,
}

impl TestRelay {
    pub fn new(transfer: MockTransfer) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().to_str().unwrap().to_string();
        let documents = DocumentConfig {
            output_dir: output_dir.clone(),
            ..DocumentConfig::default()
        };

        let relay = Relay::new(
            LocalStorage::new(output_dir),
            transfer.clone(),
            FileLogSink::new(documents.log_path()),
            documents,
            remote_config(),
        );

        Self {
            relay: Arc::new(relay),
            transfer,
            temp_dir,
        }
    }

    pub fn local_document(&self, name: &str) -> String {
        std::fs::read_to_string(self.temp_dir.path().join(name)).unwrap()
    }

    pub fn log_path(&self) -> PathBuf {
        self.temp_dir.path().join("app.log")
    }

    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_default()
    }
}
