/// Password hashing and the write-key guard
pub mod auth;
/// Domain-error to HTTP-response mapping
pub mod error_handling;
