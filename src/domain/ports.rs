use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    /// Replaces the whole file and returns where it was written.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

/// Opens sessions against a remote file-transfer endpoint.
pub trait TransferClient: Send + Sync {
    type Session: TransferSession;

    fn connect(&self) -> impl std::future::Future<Output = Result<Self::Session>> + Send;
}

/// A live connection. Callers must `close` it once they are done, on every path.
#[async_trait]
pub trait TransferSession: Send {
    async fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<()>;
    async fn fetch(&mut self, remote_path: &str) -> Result<Vec<u8>>;
    async fn close(&mut self) -> Result<()>;
}
