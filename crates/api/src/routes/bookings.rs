use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route("/api/bookings/slots", get(handlers::bookings::get_slots))
        .route("/api/bookings/cancel", post(handlers::bookings::cancel_booking))
        .route("/api/absences", post(handlers::bookings::create_absence))
        .route("/api/schedule", get(handlers::bookings::get_coach_schedule))
        .route("/api/schedule", post(handlers::bookings::create_fixed_slot))
}
