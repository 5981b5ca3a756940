//! # Seat Availability
//!
//! The booking engine: given a coach and a calendar date, compute how many
//! of the fixed seats remain per time slot, combining three record sets:
//!
//! 1. recurring fixed-schedule assignments for that weekday/time/coach,
//! 2. ad hoc bookings for that exact date/time/coach,
//! 3. absences filed against either for that exact date/time.
//!
//! The contract is `available_seats = max(0, max_seats - occupied)` where
//! `occupied` counts fixed holders without an absence on that date plus
//! non-cancelled ad hoc bookings. Everything here is pure; persistence-side
//! enforcement (unique indexes, transactional recounts) lives in the `db`
//! crate and must agree with these rules.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::booking::{Booking, BookingStatus, SlotAvailability};
use crate::models::schedule::{Absence, FixedSlot, RosterEntry, RosterSlot, RosterStudent};

/// Seats per (coach, date, time) slot.
pub const SEAT_CAPACITY: u32 = 4;

/// The school's fixed daily time grid.
pub const MASTER_SLOTS: [&str; 4] = [
    "09:00 - 10:30",
    "11:00 - 12:30",
    "13:00 - 15:00",
    "15:30 - 17:00",
];

/// Bookable slots for a weekday. The school is closed on Mondays.
pub fn slots_for_weekday(weekday: Weekday) -> &'static [&'static str] {
    match weekday {
        Weekday::Mon => &[],
        _ => &MASTER_SLOTS,
    }
}

pub fn is_master_slot(time_slot: &str) -> bool {
    MASTER_SLOTS.contains(&time_slot)
}

/// Counts occupied seats for one (coach, date, time) triple.
///
/// A fixed-schedule holder occupies a seat unless an absence is filed for
/// that student on exactly this date and time. A booking occupies a seat
/// unless it has been cancelled.
pub fn occupied_seats(
    coach: &str,
    date: NaiveDate,
    time_slot: &str,
    fixed: &[FixedSlot],
    bookings: &[Booking],
    absences: &[Absence],
) -> u32 {
    let weekday = date.weekday();

    let fixed_holders = fixed
        .iter()
        .filter(|f| f.coach == coach && f.weekday == weekday && f.time_slot == time_slot)
        .filter(|f| {
            !absences.iter().any(|a| {
                a.coder_id == f.coder_id && a.session_date == date && a.time_slot == time_slot
            })
        })
        .count();

    let ad_hoc = bookings
        .iter()
        .filter(|b| {
            b.coach == coach
                && b.session_date == date
                && b.time_slot == time_slot
                && b.status != BookingStatus::Cancelled
        })
        .count();

    (fixed_holders + ad_hoc) as u32
}

/// Remaining seats per slot for a coach's day.
pub fn availability_for_date(
    coach: &str,
    date: NaiveDate,
    fixed: &[FixedSlot],
    bookings: &[Booking],
    absences: &[Absence],
) -> Vec<SlotAvailability> {
    slots_for_weekday(date.weekday())
        .iter()
        .map(|slot| {
            let occupied = occupied_seats(coach, date, slot, fixed, bookings, absences);
            SlotAvailability {
                time_slot: (*slot).to_string(),
                available_seats: SEAT_CAPACITY.saturating_sub(occupied),
                max_seats: SEAT_CAPACITY,
            }
        })
        .collect()
}

/// A live booking the student already holds for this date and time,
/// regardless of coach. Used to reject duplicate bookings before any
/// write is attempted.
pub fn duplicate_booking<'a>(
    bookings: &'a [Booking],
    coder_id: &str,
    date: NaiveDate,
    time_slot: &str,
) -> Option<&'a Booking> {
    bookings.iter().find(|b| {
        b.coder_id == coder_id
            && b.session_date == date
            && b.time_slot == time_slot
            && b.status != BookingStatus::Cancelled
    })
}

/// The student's fixed-schedule entry covering this date's weekday and
/// time, if any. A slot the student already attends regularly is not
/// bookable ad hoc and is flagged as the regular class in the UI.
pub fn regular_slot<'a>(
    fixed: &'a [FixedSlot],
    coder_id: &str,
    date: NaiveDate,
    time_slot: &str,
) -> Option<&'a FixedSlot> {
    let weekday = date.weekday();
    fixed
        .iter()
        .find(|f| f.coder_id == coder_id && f.weekday == weekday && f.time_slot == time_slot)
}

/// Nearest calendar date on or after `today` falling on `weekday`.
///
/// Absences against a recurring slot are filed by weekday; this resolves
/// the weekday to the concrete date the seat should be freed for.
pub fn next_weekday_occurrence(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    today + Duration::days(ahead)
}

/// Groups roster rows into schedule-board cells, ordered by weekday and
/// then by position in the time grid.
pub fn group_roster(entries: &[RosterEntry]) -> Vec<RosterSlot> {
    let mut slots: Vec<RosterSlot> = Vec::new();

    for entry in entries {
        match slots
            .iter_mut()
            .find(|s| s.weekday == entry.weekday && s.time_slot == entry.time_slot)
        {
            Some(slot) => {
                slot.students.push(RosterStudent {
                    coder_id: entry.coder_id.clone(),
                    nickname: entry.nickname.clone(),
                });
                slot.seats_taken += 1;
            }
            None => slots.push(RosterSlot {
                weekday: entry.weekday,
                time_slot: entry.time_slot.clone(),
                seats_taken: 1,
                max_seats: SEAT_CAPACITY,
                students: vec![RosterStudent {
                    coder_id: entry.coder_id.clone(),
                    nickname: entry.nickname.clone(),
                }],
            }),
        }
    }

    slots.sort_by_key(|s| {
        let grid_pos = MASTER_SLOTS
            .iter()
            .position(|m| *m == s.time_slot)
            .unwrap_or(MASTER_SLOTS.len());
        (s.weekday.num_days_from_monday(), grid_pos)
    });
    slots
}
