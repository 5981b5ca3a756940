pub mod booking;
pub mod coach;
pub mod report;
pub mod schedule;
pub mod student;
