use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/students", post(handlers::students::create_student))
        .route("/api/students", get(handlers::students::list_students))
        .route("/api/students/:coder_id", get(handlers::students::get_student))
        .route(
            "/api/students/:coder_id/password",
            put(handlers::students::update_parent_password),
        )
        .route(
            "/api/students/:coder_id/project-list",
            put(handlers::students::update_project_list),
        )
}
