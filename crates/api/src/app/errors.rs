use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use vivaha_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        ServiceError::InvalidInput(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Persistence(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "persistence_error",
            e.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// A 400 for input rejected before it reaches the service.
pub fn bad_request(code: &'static str, message: impl Into<String>) -> axum::response::Response {
    let message = message.into();
    tracing::warn!(code, %message, "request rejected");
    json_error(StatusCode::BAD_REQUEST, code, message)
}
