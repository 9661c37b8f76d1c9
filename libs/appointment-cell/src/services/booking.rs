// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::{
    Appointment, AppointmentStatus, BookingError, CallerContext, Role,
};
use shared_store::{Clock, Stores};

use crate::models::{CreateAppointmentRequest, RescheduleAppointmentRequest, TimeSlot};
use crate::services::conflict::ConflictService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::slots::SlotService;

/// Appointment entry point for the booking workflow: creation, lookup,
/// cancellation, rescheduling, listing and open-slot queries. Every
/// operation is tenant-scoped through the caller context.
pub struct AppointmentBookingService {
    stores: Stores,
    clock: Arc<dyn Clock>,
    config: AppConfig,
    conflict_service: ConflictService,
    slot_service: SlotService,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        let conflict_service = ConflictService::new(
            stores.schedule.clone(),
            stores.appointment.clone(),
            clock.clone(),
            config.clone(),
        );
        let slot_service = SlotService::new(stores.clone(), clock.clone(), config.clone());

        Self {
            stores,
            clock,
            config,
            conflict_service,
            slot_service,
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    pub async fn create(
        &self,
        ctx: &CallerContext,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        info!(
            "Booking appointment for client {} with employee {}",
            request.client_id, request.employee_id
        );

        self.stores
            .business
            .get(ctx.business_id)
            .await
            .map_err(|e| e.into_booking("business"))?;

        // Clients book for themselves; cross-client bookings are hidden
        // the same way cross-tenant records are.
        if !ctx.can_act_for(request.client_id) {
            return Err(BookingError::NotFound("client"));
        }
        let client = self
            .stores
            .user
            .get(request.client_id)
            .await
            .map_err(|e| e.into_booking("client"))?;
        if client.business_id != ctx.business_id || client.role != Role::Client {
            return Err(BookingError::NotFound("client"));
        }

        let employee = self
            .stores
            .employee
            .get(request.employee_id)
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
            .get(request.service_id)
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
            .assigned_services(request.employee_id)
            .await
            .map_err(|e| e.into_booking("employee"))?;
        if !assigned.iter().any(|s| s.id == request.service_id) {
            return Err(BookingError::NotAssigned);
        }

        let end_time = request.start_time + Duration::minutes(i64::from(service.duration_minutes));
        self.conflict_service
            .check(
                request.employee_id,
                request.start_time,
                end_time,
                service.duration_minutes,
                None,
            )
            .await?
            .into_result()?;

        let appointment = Appointment {
            id: 0,
            business_id: ctx.business_id,
            client_id: request.client_id,
            employee_id: request.employee_id,
            service_id: request.service_id,
            start_time: request.start_time,
            end_time,
            status: AppointmentStatus::Scheduled,
            reminder_minutes: request.reminder_minutes,
            created_at: self.clock.now(),
        };

        // The store enforces the exclusion constraint, so a concurrent
        // booking that won the race surfaces here as a conflict.
        let created = self
            .stores
            .appointment
            .create(appointment)
            .await
            .map_err(|e| e.into_booking("appointment"))?;
        info!("Appointment {} created", created.id);
        Ok(created)
    }

    pub async fn get(&self, ctx: &CallerContext, id: i32) -> Result<Appointment, BookingError> {
        let appointment = self
            .stores
            .appointment
            .get(id)
            .await
            .map_err(|e| e.into_booking("appointment"))?;
        if appointment.business_id != ctx.business_id || !ctx.can_act_for(appointment.client_id) {
            return Err(BookingError::NotFound("appointment"));
        }
        Ok(appointment)
    }

    pub async fn cancel(&self, ctx: &CallerContext, id: i32) -> Result<Appointment, BookingError> {
        let appointment = self.get(ctx, id).await?;
        self.lifecycle_service
            .ensure_mutable(&appointment, self.clock.now())?;

        let cancelled = self
            .stores
            .appointment
            .set_status(id, AppointmentStatus::Cancelled)
            .await
            .map_err(|e| e.into_booking("appointment"))?;
        info!("Appointment {} cancelled", id);
        Ok(cancelled)
    }

    pub async fn reschedule(
        &self,
        ctx: &CallerContext,
        id: i32,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        let existing = self.get(ctx, id).await?;
        self.lifecycle_service
            .ensure_mutable(&existing, self.clock.now())?;

        let service = self
            .stores
            .service
            .get(existing.service_id)
            .await
            .map_err(|e| e.into_booking("service"))?;

        let end_time = request.start_time + Duration::minutes(i64::from(service.duration_minutes));
        self.conflict_service
            .check(
                existing.employee_id,
                request.start_time,
                end_time,
                service.duration_minutes,
                Some(existing.id),
            )
            .await?
            .into_result()?;

        // Identity fields come from the stored record; a reschedule moves
        // the interval and the reminder lead, nothing else.
        let updated = Appointment {
            start_time: request.start_time,
            end_time,
            reminder_minutes: request.reminder_minutes,
            ..existing
        };
        let stored = self
            .stores
            .appointment
            .update(updated)
            .await
            .map_err(|e| e.into_booking("appointment"))?;
        info!("Appointment {} rescheduled to {}", id, stored.start_time);
        Ok(stored)
    }

    pub async fn list_by_business(
        &self,
        ctx: &CallerContext,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, BookingError> {
        self.validate_range(from, to)?;
        self.stores
            .business
            .get(ctx.business_id)
            .await
            .map_err(|e| e.into_booking("business"))?;

        let appointments = self
            .stores
            .appointment
            .list_by_business(ctx.business_id, from, to)
            .await
            .map_err(|e| e.into_booking("appointment"))?;
        Ok(self.visible_to(ctx, appointments))
    }

    pub async fn list_by_client(
        &self,
        ctx: &CallerContext,
        client_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, BookingError> {
        self.validate_range(from, to)?;
        if !ctx.can_act_for(client_id) {
            return Err(BookingError::NotFound("client"));
        }
        let client = self
            .stores
            .user
            .get(client_id)
            .await
            .map_err(|e| e.into_booking("client"))?;
        if client.business_id != ctx.business_id {
            return Err(BookingError::NotFound("client"));
        }

        self.stores
            .appointment
            .list_by_client(client_id, from, to)
            .await
            .map_err(|e| e.into_booking("appointment"))
    }

    pub async fn list_by_employee(
        &self,
        ctx: &CallerContext,
        employee_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, BookingError> {
        self.validate_range(from, to)?;
        let employee = self
            .stores
            .employee
            .get(employee_id)
            .await
            .map_err(|e| e.into_booking("employee"))?;
        if employee.business_id != ctx.business_id {
            return Err(BookingError::NotFound("employee"));
        }

        let appointments = self
            .stores
            .appointment
            .list_by_employee(employee_id, from, to)
            .await
            .map_err(|e| e.into_booking("appointment"))?;
        Ok(self.visible_to(ctx, appointments))
    }

    pub async fn available_slots(
        &self,
        ctx: &CallerContext,
        employee_id: i32,
        service_id: i32,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, BookingError> {
        self.slot_service
            .available_slots(ctx, employee_id, service_id, date)
            .await
    }

    fn validate_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<(), BookingError> {
        if to < from {
            return Err(BookingError::InvalidInterval(
                "end time must be after start time".to_string(),
            ));
        }
        let max_days = self.config.max_list_range_days;
        if to - from > Duration::days(max_days) {
            warn!(
                "Rejected listing range of more than {} days",
                max_days
            );
            return Err(BookingError::RangeTooLarge { max_days });
        }
        Ok(())
    }

    /// Client callers only ever see their own appointments.
    fn visible_to(&self, ctx: &CallerContext, appointments: Vec<Appointment>) -> Vec<Appointment> {
        if ctx.is_staff() {
            return appointments;
        }
        debug!("Filtering listing down to caller {}", ctx.user_id);
        appointments
            .into_iter()
            .filter(|appointment| appointment.client_id == ctx.user_id)
            .collect()
    }
}
