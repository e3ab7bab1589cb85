//! Conversion of relay errors into plain-text HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::error::{ErrorCategory, RelayError};

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Transfer => StatusCode::BAD_GATEWAY,
            ErrorCategory::Payload => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::Configuration | ErrorCategory::LocalIo => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (self.status_code(), self.user_friendly_message()).into_response()
    }
}
