// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::BookingError;

// ==============================================================================
// DERIVED VALUES
// ==============================================================================

/// One bookable unit of a service's duration. Derived per request, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub client_id: i32,
    pub employee_id: i32,
    pub service_id: i32,
    pub start_time: DateTime<Utc>,
    pub reminder_minutes: Option<i32>,
}

/// Rescheduling changes the start time and reminder lead only; the
/// business/client/employee/service identity of the appointment is
/// preserved from the original record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub start_time: DateTime<Utc>,
    pub reminder_minutes: Option<i32>,
}

// ==============================================================================
// CONFLICT DECISION MODELS
// ==============================================================================

/// Outcome of the read-only bookability check for a proposed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotVerdict {
    Bookable,
    Rejected(RejectReason),
}

impl SlotVerdict {
    pub fn is_bookable(&self) -> bool {
        matches!(self, SlotVerdict::Bookable)
    }

    /// Turn a rejection into the corresponding domain error; accepted
    /// verdicts pass through.
    pub fn into_result(self) -> Result<(), BookingError> {
        match self {
            SlotVerdict::Bookable => Ok(()),
            SlotVerdict::Rejected(reason) => Err(reason.into_error()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InThePast,
    DurationMismatch,
    NoSchedule,
    OutsideWorkingHours,
    OverlapsExisting,
}

impl RejectReason {
    pub fn into_error(self) -> BookingError {
        match self {
            RejectReason::InThePast => BookingError::InvalidInterval(
                "appointment start must be in the future".to_string(),
            ),
            RejectReason::DurationMismatch => BookingError::InvalidInterval(
                "appointment duration must match service duration".to_string(),
            ),
            RejectReason::NoSchedule => BookingError::OutsideAvailability(
                "no schedule for the requested date".to_string(),
            ),
            RejectReason::OutsideWorkingHours => BookingError::OutsideAvailability(
                "outside the employee's working hours".to_string(),
            ),
            RejectReason::OverlapsExisting => {
                BookingError::Conflict("time slot is not available".to_string())
            }
        }
    }
}
