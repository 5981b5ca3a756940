/// Role login routes
pub mod auth;
/// Booking, schedule, and absence routes
pub mod bookings;
/// Health and version routes
pub mod health;
/// Session report routes
pub mod reports;
/// Student management routes
pub mod students;
