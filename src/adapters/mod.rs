// Adapters layer: concrete implementations of the domain ports and the audit log.

pub mod log_sink;
pub mod sftp;
pub mod storage;

pub use log_sink::FileLogSink;
pub use sftp::{SftpClient, SftpSession};
pub use storage::LocalStorage;
