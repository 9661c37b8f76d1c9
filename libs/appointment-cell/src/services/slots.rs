// libs/appointment-cell/src/services/slots.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use tracing::debug;

use schedule_cell::models::EffectiveWindow;
use schedule_cell::services::ScheduleResolver;
use shared_config::AppConfig;
use shared_models::{Appointment, BookingError, CallerContext};
use shared_store::{Clock, Stores};
use shared_utils::time::{at_local, spans_overlap};

use crate::models::TimeSlot;

/// Enumerate the bookable start times within an effective window.
///
/// The cursor starts at the window start and always advances by exactly
/// `duration_minutes`; no finer-grained stepping. A slot is kept when it
/// ends at or after the cutoff and overlaps none of the blocking
/// appointments. Output is ordered earliest first.
pub fn generate_slots(
    window: &EffectiveWindow,
    date: NaiveDate,
    duration_minutes: i32,
    blocking: &[Appointment],
    cutoff: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<TimeSlot> {
    if window.is_break || duration_minutes <= 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(duration_minutes));
    let window_end = at_local(date, window.end_time, offset);

    let mut slots = Vec::new();
    let mut current = at_local(date, window.start_time, offset);

    while current + duration <= window_end {
        let slot_end = current + duration;

        let conflicts = blocking.iter().any(|appointment| {
            spans_overlap(current, slot_end, appointment.start_time, appointment.end_time)
        });

        if slot_end >= cutoff && !conflicts {
            slots.push(TimeSlot {
                start_time: current,
                end_time: slot_end,
            });
        }

        current = slot_end;
    }

    slots
}

/// Computes the open slots for (employee, service, date). A missing or
/// break window is a normal empty result; a bad employee/service pairing
/// is a hard error.
pub struct SlotService {
    stores: Stores,
    resolver: ScheduleResolver,
    clock: Arc<dyn Clock>,
    config: AppConfig,
}

impl SlotService {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        let resolver = ScheduleResolver::new(stores.schedule.clone());
        Self {
            stores,
            resolver,
            clock,
            config,
        }
    }

    pub async fn available_slots(
        &self,
        ctx: &CallerContext,
        employee_id: i32,
        service_id: i32,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, BookingError> {
        debug!(
            "Calculating available slots for employee {} on {}",
            employee_id, date
        );

        let employee = self
            .stores
            .employee
            .get(employee_id)
            .await
            .map_err(|e| e.into_booking("employee"))?;
        if employee.business_id != ctx.business_id {
            return Err(BookingError::NotFound("employee"));
        }
        if !employee.is_active {
            return Err(BookingError::Inactive("employee"));
        }

        let service = self
            .stores
            .service
            .get(service_id)
            .await
            .map_err(|e| e.into_booking("service"))?;
        if service.business_id != ctx.business_id {
            return Err(BookingError::NotFound("service"));
        }
        if !service.is_active {
            return Err(BookingError::Inactive("service"));
        }

        let assigned = self
            .stores
            .employee
            .assigned_services(employee_id)
            .await
            .map_err(|e| e.into_booking("employee"))?;
        if !assigned.iter().any(|s| s.id == service_id) {
            return Err(BookingError::NotAssigned);
        }

        let window = match self.resolver.resolve(employee_id, date).await? {
            Some(window) if !window.is_break => window,
            _ => {
                debug!("No availability for employee {} on {}", employee_id, date);
                return Ok(Vec::new());
            }
        };

        let offset = self.config.deployment_offset();
        let day_start = at_local(date, chrono::NaiveTime::MIN, offset);
        let day_end = day_start + Duration::days(1);
        let blocking: Vec<Appointment> = self
            .stores
            .appointment
            .list_by_employee(employee_id, day_start, day_end)
            .await
            .map_err(|e| e.into_booking("appointment"))?
            .into_iter()
            .filter(Appointment::is_blocking)
            .collect();

        let cutoff = self.clock.now() + Duration::minutes(self.config.booking_lead_minutes);

        let slots = generate_slots(
            &window,
            date,
            service.duration_minutes,
            &blocking,
            cutoff,
            offset,
        );
        debug!("Found {} available slots", slots.len());
        Ok(slots)
    }
}
