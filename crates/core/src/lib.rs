//! # ClassTrack Core
//!
//! Domain types and business rules for the ClassTrack student-progress
//! service: students, session reports, ad hoc bookings, recurring fixed
//! schedules and absences, plus the seat-availability engine that combines
//! them. This crate performs no I/O; the `db` and `api` crates build on it.

/// Seat-availability computation and booking guards
pub mod availability;
/// Domain error taxonomy
pub mod errors;
/// Legacy spreadsheet header normalization and CSV ingestion
pub mod legacy;
/// Wire and domain models
pub mod models;
