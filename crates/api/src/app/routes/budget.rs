use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn set_budget(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::BudgetRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match services.ledger.set_budget(body.amount()) {
        Ok(budget) => {
            tracing::info!(budget, "budget updated");
            (StatusCode::OK, Json(serde_json::json!({ "budget": budget }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn set_money_received(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::MoneyReceivedRequest>, JsonRejection>,
) -> axum::response::Response {
    let received = match dto::body(payload).and_then(dto::MoneyReceivedRequest::into_money_received)
    {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.set_money_received(received) {
        Ok(received) => {
            tracing::info!(total = received.total(), "money received updated");
            (
                StatusCode::OK,
                Json(serde_json::json!({ "moneyReceived": received })),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
