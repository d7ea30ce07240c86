use bookwise_core::models::appointment::{AppointmentStatus, CandidateAppointment};
use bookwise_core::models::business::{Business, BusinessSettings};
use bookwise_core::models::service::Service;
use bookwise_core::models::staff::{StaffMember, WorkingHours};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAppointment, DbBusiness, DbService, DbStaffMember};

// Mock repositories for testing
mock! {
    pub BusinessRepo {
        pub async fn create_business(
            &self,
            name: &'static str,
            timezone: &'static str,
            settings: BusinessSettings,
        ) -> eyre::Result<DbBusiness>;

        pub async fn get_business_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBusiness>>;

        pub async fn update_settings(
            &self,
            id: Uuid,
            settings: BusinessSettings,
        ) -> eyre::Result<DbBusiness>;
    }
}

mock! {
    pub StaffRepo {
        pub async fn create_staff_member(
            &self,
            business_id: Uuid,
            user_id: Uuid,
            name: &'static str,
            email: &'static str,
            assigned_service_ids: Vec<Uuid>,
            working_hours: WorkingHours,
        ) -> eyre::Result<DbStaffMember>;

        pub async fn get_staff_member_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbStaffMember>>;

        pub async fn list_staff_by_business(
            &self,
            business_id: Uuid,
        ) -> eyre::Result<Vec<DbStaffMember>>;

        pub async fn update_working_hours(
            &self,
            id: Uuid,
            working_hours: WorkingHours,
        ) -> eyre::Result<DbStaffMember>;
    }
}

mock! {
    pub ServiceRepo {
        pub async fn create_service(
            &self,
            business_id: Uuid,
            name: &'static str,
            duration_minutes: i64,
            price_cents: i64,
            color: &'static str,
        ) -> eyre::Result<DbService>;

        pub async fn get_service_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbService>>;

        pub async fn list_services_by_business(
            &self,
            business_id: Uuid,
            active_only: bool,
        ) -> eyre::Result<Vec<DbService>>;

        pub async fn deactivate_service(
            &self,
            id: Uuid,
        ) -> eyre::Result<DbService>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn get_appointment_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn get_staff_appointments_in_range(
            &self,
            staff_id: Uuid,
            from_millis: i64,
            to_millis: i64,
            include_cancelled: bool,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn book_appointment(
            &self,
            business: Business,
            staff: StaffMember,
            service: Service,
            candidate: CandidateAppointment,
            initial_status: AppointmentStatus,
            notes: Option<&'static str>,
        ) -> bookwise_core::errors::BookingResult<DbAppointment>;

        pub async fn reschedule_appointment(
            &self,
            business: Business,
            staff: StaffMember,
            service: Service,
            appointment_id: Uuid,
            candidate: CandidateAppointment,
        ) -> bookwise_core::errors::BookingResult<DbAppointment>;

        pub async fn update_status(
            &self,
            id: Uuid,
            from: AppointmentStatus,
            to: AppointmentStatus,
        ) -> bookwise_core::errors::BookingResult<DbAppointment>;

        pub async fn record_reminder_sent(
            &self,
            id: Uuid,
            reminder: &'static str,
        ) -> eyre::Result<Option<DbAppointment>>;
    }
}
