// libs/appointment-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::debug;

use schedule_cell::services::ScheduleResolver;
use shared_config::AppConfig;
use shared_models::BookingError;
use shared_store::{AppointmentStore, Clock, ScheduleStore};
use shared_utils::time::{at_local, local_date, local_time, minutes_since_midnight, spans_overlap};

use crate::models::{RejectReason, SlotVerdict};

/// Read-only bookability decision for a proposed [start, end) interval.
/// Checks run in a fixed order and the first failure decides the verdict.
pub struct ConflictService {
    resolver: ScheduleResolver,
    appointments: Arc<dyn AppointmentStore>,
    clock: Arc<dyn Clock>,
    config: AppConfig,
}

impl ConflictService {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        appointments: Arc<dyn AppointmentStore>,
        clock: Arc<dyn Clock>,
        config: AppConfig,
    ) -> Self {
        Self {
            resolver: ScheduleResolver::new(schedule),
            appointments,
            clock,
            config,
        }
    }

    /// Decide whether [start, end) may be booked for the employee.
    /// `exclude_appointment_id` makes rescheduling ignore the appointment
    /// being moved.
    pub async fn check(
        &self,
        employee_id: i32,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        service_duration_minutes: i32,
        exclude_appointment_id: Option<i32>,
    ) -> Result<SlotVerdict, BookingError> {
        debug!(
            "Checking bookability for employee {} from {} to {}",
            employee_id, start_time, end_time
        );

        if start_time <= self.clock.now() {
            return Ok(SlotVerdict::Rejected(RejectReason::InThePast));
        }

        // Exact match is required; callers compute the end from the
        // service duration rather than pass an arbitrary interval.
        if (end_time - start_time).num_minutes() != i64::from(service_duration_minutes) {
            return Ok(SlotVerdict::Rejected(RejectReason::DurationMismatch));
        }

        let offset = self.config.deployment_offset();
        let date = local_date(start_time, offset);

        let window = match self.resolver.resolve(employee_id, date).await? {
            None => return Ok(SlotVerdict::Rejected(RejectReason::NoSchedule)),
            Some(window) if window.is_break => {
                return Ok(SlotVerdict::Rejected(RejectReason::OutsideWorkingHours));
            }
            Some(window) => window,
        };

        // Containment on time-of-day components with inclusive boundaries:
        // an interval sitting exactly on the window bounds is accepted.
        let start_minutes = minutes_since_midnight(local_time(start_time, offset));
        let end_minutes = minutes_since_midnight(local_time(end_time, offset));
        let contained = end_minutes > start_minutes
            && minutes_since_midnight(window.start_time) <= start_minutes
            && end_minutes <= minutes_since_midnight(window.end_time);
        if !contained {
            return Ok(SlotVerdict::Rejected(RejectReason::OutsideWorkingHours));
        }

        let day_start = at_local(date, NaiveTime::MIN, offset);
        let day_end = day_start + Duration::days(1);
        let existing = self
            .appointments
            .list_by_employee(employee_id, day_start, day_end)
            .await
            .map_err(|e| e.into_booking("appointment"))?;

        let overlapping = existing.iter().any(|appointment| {
            appointment.is_blocking()
                && Some(appointment.id) != exclude_appointment_id
                && spans_overlap(
                    start_time,
                    end_time,
                    appointment.start_time,
                    appointment.end_time,
                )
        });
        if overlapping {
            return Ok(SlotVerdict::Rejected(RejectReason::OverlapsExisting));
        }

        Ok(SlotVerdict::Bookable)
    }
}
