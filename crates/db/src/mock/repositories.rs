use chrono::NaiveDate;
use classtrack_core::errors::TrackResult;
use classtrack_core::models::report::UpdateReportRequest;
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAbsence, DbBooking, DbCoach, DbFixedSlot, DbReport, DbRosterEntry, DbStudent};

// Mock repositories for testing
mock! {
    pub StudentRepo {
        pub async fn create_student(
            &self,
            coder_id: &'static str,
            nickname: &'static str,
            fullname: &'static str,
            status: &'static str,
            course: &'static str,
            course_status: &'static str,
            program: Option<&'static str>,
            parent_password_hash: &'static str,
        ) -> eyre::Result<DbStudent>;

        pub async fn get_student_by_coder_id(
            &self,
            coder_id: &'static str,
        ) -> eyre::Result<Option<DbStudent>>;

        pub async fn list_students(&self) -> eyre::Result<Vec<DbStudent>>;

        pub async fn update_parent_password(
            &self,
            coder_id: &'static str,
            new_password_hash: &'static str,
        ) -> eyre::Result<()>;

        pub async fn update_project_list_url(
            &self,
            coder_id: &'static str,
            project_list_url: &'static str,
        ) -> eyre::Result<()>;

        pub async fn verify_parent_password(
            &self,
            coder_id: &'static str,
            password: &'static str,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub CoachRepo {
        pub async fn create_coach(
            &self,
            name: &'static str,
            password_hash: &'static str,
        ) -> eyre::Result<DbCoach>;

        pub async fn get_coach_by_name(
            &self,
            name: &'static str,
        ) -> eyre::Result<Option<DbCoach>>;

        pub async fn verify_coach_password(
            &self,
            name: &'static str,
            password: &'static str,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub ReportRepo {
        pub async fn create_report(
            &self,
            coder_id: &'static str,
            session_date: NaiveDate,
            time_slot: Option<&'static str>,
            topic: &'static str,
            session_incharge: &'static str,
            session_type: &'static str,
            session_report: &'static str,
            feedback: Option<&'static str>,
            next_recommend: Option<&'static str>,
            progress_link: Option<&'static str>,
        ) -> eyre::Result<DbReport>;

        pub async fn get_report_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbReport>>;

        pub async fn list_reports(&self) -> eyre::Result<Vec<DbReport>>;

        pub async fn list_reports_by_coder(
            &self,
            coder_id: &'static str,
        ) -> eyre::Result<Vec<DbReport>>;

        pub async fn update_report(
            &self,
            id: Uuid,
            updates: UpdateReportRequest,
        ) -> eyre::Result<DbReport>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn create_booking(
            &self,
            coder_id: &'static str,
            coach: &'static str,
            session_date: NaiveDate,
            time_slot: &'static str,
            note: Option<&'static str>,
        ) -> TrackResult<DbBooking>;

        pub async fn get_live_bookings_by_coder(
            &self,
            coder_id: &'static str,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn get_bookings_for_coach_date(
            &self,
            coach: &'static str,
            session_date: NaiveDate,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn cancel_booking(
            &self,
            coder_id: &'static str,
            session_date: NaiveDate,
            time_slot: &'static str,
        ) -> eyre::Result<Option<Uuid>>;
    }
}

mock! {
    pub ScheduleRepo {
        pub async fn create_fixed_slot(
            &self,
            coder_id: &'static str,
            coach: &'static str,
            weekday: i16,
            time_slot: &'static str,
        ) -> TrackResult<DbFixedSlot>;

        pub async fn get_fixed_slots_by_coach(
            &self,
            coach: &'static str,
        ) -> eyre::Result<Vec<DbFixedSlot>>;

        pub async fn get_fixed_slots_by_coder(
            &self,
            coder_id: &'static str,
        ) -> eyre::Result<Vec<DbFixedSlot>>;

        pub async fn get_roster_by_coach(
            &self,
            coach: &'static str,
        ) -> eyre::Result<Vec<DbRosterEntry>>;

        pub async fn create_absence(
            &self,
            coder_id: &'static str,
            session_date: NaiveDate,
            time_slot: &'static str,
            reason: &'static str,
        ) -> TrackResult<DbAbsence>;

        pub async fn get_absences_for_date(
            &self,
            session_date: NaiveDate,
        ) -> eyre::Result<Vec<DbAbsence>>;
    }
}
