use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use vivaha_core::ExpenseId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", get(get_expense).put(update_expense).delete(delete_expense))
}

/// The whole stored document: budget, expenses, guests and money received.
pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.document() {
        Ok(doc) => (StatusCode::OK, Json(doc)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.ledger.get_expense(&ExpenseId::from_string(id)) {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_expense(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::CreateExpenseRequest>, JsonRejection>,
) -> axum::response::Response {
    let cmd = match dto::body(payload).and_then(dto::CreateExpenseRequest::into_command) {
        Ok(cmd) => cmd,
        Err(resp) => return resp,
    };

    match services.ledger.create_expense(cmd) {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Edit classification fields; payments and amounts are untouched.
pub async fn update_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::UpdateExpenseRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match services
        .ledger
        .update_expense(&ExpenseId::from_string(id), body.into())
    {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.ledger.delete_expense(&ExpenseId::from_string(id)) {
        Ok(removed) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "Expense deleted successfully",
                "removed": removed,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
