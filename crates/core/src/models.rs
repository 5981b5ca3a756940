/// Ad hoc booking records and seat availability
pub mod booking;
/// Coach accounts and role login
pub mod coach;
/// Session reports
pub mod report;
/// Recurring fixed schedules and absences
pub mod schedule;
/// Student records
pub mod student;
