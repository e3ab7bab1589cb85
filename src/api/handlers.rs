use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    core::relay::Relay,
    domain::ports::{Storage, TransferClient},
    utils::error::RelayError,
};

/// Body returned once a request has been processed, whatever the transfer outcome.
pub const ACKNOWLEDGEMENT: &str = "Files updated successfully.";

/// `applied` or `failed`, the outcome of the SFTP half of the request.
pub const SYNC_STATUS_HEADER: &str = "x-sync-status";

/// `POST /`
pub async fn receive_items<S, T>(
    State(relay): State<Arc<Relay<S, T>>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response, RelayError>
where
    S: Storage + 'static,
    T: TransferClient + 'static,
{
    let outcome = relay.handle(&payload).await?;

    let mut response = ACKNOWLEDGEMENT.into_response();
    response.headers_mut().insert(
        HeaderName::from_static(SYNC_STATUS_HEADER),
        HeaderValue::from_static(outcome.as_str()),
    );
    Ok(response)
}
