use axum::{
    routing::{get, put},
    Router,
};

pub mod budget;
pub mod expenses;
pub mod guests;
pub mod payments;
pub mod summary;
pub mod system;

/// Router for every `/api` endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/expenses", expenses::router().merge(payments::router()))
        .nest("/guests", guests::router())
        .route("/budget", put(budget::set_budget))
        .route("/money-received", put(budget::set_money_received))
        .route("/summary", get(summary::get_summary))
}
