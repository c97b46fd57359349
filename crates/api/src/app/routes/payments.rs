use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};

use vivaha_core::ExpenseId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Payment routes, nested under `/expenses` next to the expense routes.
pub fn router() -> Router {
    Router::new()
        .route("/:id/payment", post(add_payment))
        .route("/:id/payment/:index", put(update_payment).delete(delete_payment))
}

pub async fn add_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::AddPaymentRequest>, JsonRejection>,
) -> axum::response::Response {
    let cmd = match dto::body(payload).and_then(dto::AddPaymentRequest::into_command) {
        Ok(cmd) => cmd,
        Err(resp) => return resp,
    };

    match services.ledger.add_payment(&ExpenseId::from_string(id), cmd) {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, index)): Path<(String, String)>,
    payload: Result<Json<dto::UpdatePaymentRequest>, JsonRejection>,
) -> axum::response::Response {
    let index = match dto::parse_payment_index(&index) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let cmd = match dto::body(payload).and_then(dto::UpdatePaymentRequest::into_command) {
        Ok(cmd) => cmd,
        Err(resp) => return resp,
    };

    match services
        .ledger
        .update_payment(&ExpenseId::from_string(id), index, cmd)
    {
        Ok(expense) => {
            tracing::info!(expense_id = %expense.id_typed(), index, "payment updated");
            (StatusCode::OK, Json(expense)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, index)): Path<(String, String)>,
) -> axum::response::Response {
    let index = match dto::parse_payment_index(&index) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .ledger
        .delete_payment(&ExpenseId::from_string(id), index)
    {
        Ok(expense) => {
            tracing::info!(expense_id = %expense.id_typed(), index, "payment deleted");
            (StatusCode::OK, Json(expense)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
