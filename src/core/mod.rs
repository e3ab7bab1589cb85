pub mod relay;
pub mod splitter;
pub mod transfer;

pub use crate::domain::model::{ContentItem, Language, SplitDocuments, SyncOutcome};
pub use crate::domain::ports::{Storage, TransferClient, TransferSession};
pub use crate::utils::error::Result;
