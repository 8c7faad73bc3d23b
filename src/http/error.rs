use crate::error::AgentError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl AgentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AgentError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AgentError::UnknownAgent(_) => StatusCode::NOT_FOUND,
            AgentError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AgentError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AgentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed ({}): {}", status, self);
        } else {
            tracing::warn!("request rejected ({}): {}", status, self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for AgentError {
    fn from(rejection: JsonRejection) -> Self {
        AgentError::bad_request(rejection.body_text())
    }
}
