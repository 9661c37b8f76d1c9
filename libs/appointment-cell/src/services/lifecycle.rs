// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use shared_models::{Appointment, AppointmentStatus, BookingError};

/// Governs legal status transitions and the temporal preconditions for
/// mutating an appointment.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// All legal next statuses for a given current status.
    pub fn valid_transitions(&self, current: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::NoShow => vec![],
        }
    }

    pub fn validate_transition(
        &self,
        current: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<(), BookingError> {
        debug!("Validating status transition {} -> {}", current, next);
        if !self.valid_transitions(current).contains(&next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(BookingError::InvalidTransition(format!(
                "cannot transition from {current} to {next}"
            )));
        }
        Ok(())
    }

    /// Whether the appointment may still be cancelled or rescheduled: it
    /// must be scheduled and must not have started yet.
    pub fn ensure_mutable(
        &self,
        appointment: &Appointment,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        if appointment.status != AppointmentStatus::Scheduled {
            return Err(BookingError::InvalidTransition(format!(
                "appointment is {}, only scheduled appointments can be changed",
                appointment.status
            )));
        }
        if appointment.start_time <= now {
            return Err(BookingError::InvalidTransition(
                "appointment has already started".to_string(),
            ));
        }
        Ok(())
    }
}
