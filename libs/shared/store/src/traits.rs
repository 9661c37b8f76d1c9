// libs/shared/store/src/traits.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use shared_models::{
    Appointment, AppointmentStatus, BookingError, Business, BusinessService, Employee,
    ScheduleOverride, ScheduleTemplate, User,
};

/// Failures surfaced by a persistence collaborator. Not-found is
/// distinguishable so services can map it onto the entity they asked for;
/// `Conflict` carries uniqueness/exclusion violations raised by the write
/// path under concurrent requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("constraint violated: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Map onto the domain taxonomy, naming the entity the lookup was for.
    pub fn into_booking(self, entity: &'static str) -> BookingError {
        match self {
            StoreError::NotFound => BookingError::NotFound(entity),
            StoreError::Conflict(detail) => BookingError::Conflict(detail),
            StoreError::Unavailable(detail) => BookingError::Store(detail),
        }
    }
}

#[async_trait]
pub trait BusinessStore: Send + Sync {
    async fn get(&self, id: i32) -> Result<Business, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: i32) -> Result<User, StoreError>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn get(&self, id: i32) -> Result<Employee, StoreError>;

    /// Services the employee is assigned to offer.
    async fn assigned_services(&self, employee_id: i32)
        -> Result<Vec<BusinessService>, StoreError>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn get(&self, id: i32) -> Result<BusinessService, StoreError>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Persists a new template; the input id is ignored and the stored row
    /// is returned.
    async fn create_template(
        &self,
        template: ScheduleTemplate,
    ) -> Result<ScheduleTemplate, StoreError>;

    async fn update_template(
        &self,
        template: ScheduleTemplate,
    ) -> Result<ScheduleTemplate, StoreError>;

    async fn delete_template(&self, id: i32) -> Result<(), StoreError>;

    async fn get_template(&self, id: i32) -> Result<ScheduleTemplate, StoreError>;

    async fn list_templates(&self, employee_id: i32) -> Result<Vec<ScheduleTemplate>, StoreError>;

    /// The weekly template in effect for the given weekday (0 = Sunday).
    /// When an employee carries several rows for one weekday the earliest
    /// non-break row wins.
    async fn template_for_weekday(
        &self,
        employee_id: i32,
        day_of_week: i32,
    ) -> Result<Option<ScheduleTemplate>, StoreError>;

    async fn create_override(
        &self,
        schedule_override: ScheduleOverride,
    ) -> Result<ScheduleOverride, StoreError>;

    async fn update_override(
        &self,
        schedule_override: ScheduleOverride,
    ) -> Result<ScheduleOverride, StoreError>;

    async fn delete_override(&self, id: i32) -> Result<(), StoreError>;

    async fn get_override(&self, id: i32) -> Result<ScheduleOverride, StoreError>;

    /// At most one override exists per (employee, date).
    async fn override_for_date(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> Result<Option<ScheduleOverride>, StoreError>;

    async fn list_overrides(
        &self,
        employee_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScheduleOverride>, StoreError>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persists a new appointment. Implementations must enforce the
    /// exclusion constraint (at most one scheduled appointment per
    /// overlapping interval per employee) and fail with
    /// [`StoreError::Conflict`] when a concurrent write got there first.
    async fn create(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    async fn get(&self, id: i32) -> Result<Appointment, StoreError>;

    /// Full-row update, subject to the same exclusion constraint as
    /// `create`.
    async fn update(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    async fn set_status(
        &self,
        id: i32,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError>;

    async fn list_by_employee(
        &self,
        employee_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn list_by_business(
        &self,
        business_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn list_by_client(
        &self,
        client_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;
}

/// The full set of persistence collaborators, injected into services as one
/// value.
#[derive(Clone)]
pub struct Stores {
    pub business: Arc<dyn BusinessStore>,
    pub user: Arc<dyn UserStore>,
    pub employee: Arc<dyn EmployeeStore>,
    pub service: Arc<dyn ServiceStore>,
    pub schedule: Arc<dyn ScheduleStore>,
    pub appointment: Arc<dyn AppointmentStore>,
}
