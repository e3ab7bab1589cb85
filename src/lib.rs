pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FileLogSink, LocalStorage, SftpClient};
pub use config::{CliConfig, RelayConfig};
pub use crate::core::relay::Relay;
pub use domain::model::{ContentItem, SyncOutcome};
pub use utils::error::{RelayError, Result};
