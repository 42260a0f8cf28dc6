//! HTTP error mapping.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shopdesk_core::error::ShopDeskError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] ShopDeskError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Products are missing required fields (name, price)")]
    MissingProductFields,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(ShopDeskError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(ShopDeskError::InvalidInput(_)) | ApiError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Domain(_) | ApiError::MissingProductFields => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {self}");
        }
        let body = serde_json::json!({"ok": false, "error": self.to_string()});
        (status, Json(body)).into_response()
    }
}
