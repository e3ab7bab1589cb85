//! HTTP surface of the relay.

pub mod error_response;
pub mod handlers;
pub mod server;

pub use handlers::{ACKNOWLEDGEMENT, SYNC_STATUS_HEADER};
pub use server::{create_router, start_server};
