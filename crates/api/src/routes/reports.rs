use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/reports", post(handlers::reports::create_report))
        .route("/api/reports", get(handlers::reports::list_reports))
        .route("/api/reports/:id", put(handlers::reports::update_report))
}
