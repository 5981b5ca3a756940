/// Role login handlers
pub mod auth;
/// Booking, availability, schedule, and absence handlers
pub mod bookings;
/// Session report handlers
pub mod reports;
/// Student management handlers
pub mod students;
