use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/coach/login", post(handlers::auth::coach_login))
        .route("/api/auth/parent/login", post(handlers::auth::parent_login))
}
