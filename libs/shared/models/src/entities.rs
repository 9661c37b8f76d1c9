// libs/shared/models/src/entities.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ==============================================================================
// TENANT DIRECTORY
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i32,
    pub name: String,
    pub logo_url: Option<String>,
    /// Free-form branding blob owned by the web client.
    pub color_scheme: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessService {
    pub id: i32,
    pub business_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price_cents: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub business_id: i32,
    pub user_id: i32,
    pub specialization: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub business_id: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Employee => write!(f, "employee"),
            Role::Client => write!(f, "client"),
        }
    }
}

// ==============================================================================
// SCHEDULES
// ==============================================================================

/// Recurring weekly working (or break) window for one employee.
///
/// `day_of_week` runs 0 (Sunday) through 6 (Saturday). Times are
/// times-of-day in the deployment timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTemplate {
    pub id: i32,
    pub employee_id: i32,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_break: bool,
    pub created_at: DateTime<Utc>,
}

/// Date-specific exception. When present for a date it fully replaces the
/// weekly template for that date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub id: i32,
    pub employee_id: i32,
    pub override_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_working_day: bool,
    pub is_break: bool,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i32,
    pub business_id: i32,
    pub client_id: i32,
    pub employee_id: i32,
    pub service_id: i32,
    pub start_time: DateTime<Utc>,
    /// Always `start_time + service duration` at creation time.
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reminder_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Only scheduled appointments block other bookings.
    pub fn is_blocking(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}
