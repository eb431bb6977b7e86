//! Mapping of editor errors onto HTTP responses.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dce_core::EditorError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub EditorError);

impl<E> From<E> for ApiError
where
    E: Into<EditorError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EditorError::Parse(_) | EditorError::InvalidContract(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            EditorError::TemplateConfiguration(_) | EditorError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            EditorError::StorageUnavailable(_) | EditorError::Worker(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "request failed");
        }
        let body = Json(json!({ "code": self.0.code(), "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
