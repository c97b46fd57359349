use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use vivaha_core::GuestId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_guests).post(create_guest))
        .route("/summary", get(guest_summary))
        .route("/:id", get(get_guest).put(update_guest).delete(delete_guest))
}

pub async fn list_guests(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_guests() {
        Ok(guests) => (StatusCode::OK, Json(guests)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn guest_summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.guest_summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_guest(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.ledger.get_guest(&GuestId::from_string(id)) {
        Ok(guest) => (StatusCode::OK, Json(guest)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_guest(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::GuestRequest>, JsonRejection>,
) -> axum::response::Response {
    let details = match dto::body(payload).and_then(dto::GuestRequest::into_details) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.create_guest(details) {
        Ok(guest) => {
            tracing::info!(guest_id = %guest.id_typed(), "guest created");
            (StatusCode::CREATED, Json(guest)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_guest(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::GuestRequest>, JsonRejection>,
) -> axum::response::Response {
    let details = match dto::body(payload).and_then(dto::GuestRequest::into_details) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.update_guest(&GuestId::from_string(id), details) {
        Ok(guest) => (StatusCode::OK, Json(guest)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_guest(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.ledger.delete_guest(&GuestId::from_string(id)) {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Guest deleted successfully" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
