use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_models::{
    BookingError, CallerContext, Employee, ScheduleOverride, ScheduleTemplate,
};
use shared_store::{Clock, Stores};
use shared_utils::time::{clock_ranges_overlap, local_date, minutes_since_midnight};

use crate::models::{
    CreateOverrideRequest, CreateTemplateRequest, UpdateOverrideRequest, UpdateTemplateRequest,
};

/// Employee-scheduling workflow: weekly template and date-override
/// maintenance with the validation rules the booking core depends on.
pub struct ScheduleService {
    stores: Stores,
    clock: Arc<dyn Clock>,
    config: AppConfig,
}

impl ScheduleService {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        Self {
            stores,
            clock,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Weekly templates
    // ------------------------------------------------------------------

    pub async fn create_template(
        &self,
        ctx: &CallerContext,
        request: CreateTemplateRequest,
    ) -> Result<ScheduleTemplate, BookingError> {
        debug!(
            "Creating template for employee {} on weekday {}",
            request.employee_id, request.day_of_week
        );

        let employee = self.tenant_employee(ctx, request.employee_id).await?;
        if !employee.is_active {
            return Err(BookingError::Inactive("employee"));
        }

        validate_day_of_week(request.day_of_week)?;
        validate_window(request.start_time, request.end_time)?;

        if !request.is_break {
            self.reject_template_overlap(
                request.employee_id,
                request.day_of_week,
                request.start_time,
                request.end_time,
                None,
            )
            .await?;
        }

        let template = ScheduleTemplate {
            id: 0,
            employee_id: request.employee_id,
            day_of_week: request.day_of_week,
            start_time: request.start_time,
            end_time: request.end_time,
            is_break: request.is_break,
            created_at: self.clock.now(),
        };

        let created = self
            .stores
            .schedule
            .create_template(template)
            .await
            .map_err(|e| e.into_booking("template"))?;
        info!("Template {} created for employee {}", created.id, created.employee_id);
        Ok(created)
    }

    pub async fn update_template(
        &self,
        ctx: &CallerContext,
        template_id: i32,
        request: UpdateTemplateRequest,
    ) -> Result<ScheduleTemplate, BookingError> {
        let existing = self
            .stores
            .schedule
            .get_template(template_id)
            .await
            .map_err(|e| e.into_booking("template"))?;
        self.tenant_employee(ctx, existing.employee_id).await?;

        validate_window(request.start_time, request.end_time)?;

        if !request.is_break {
            self.reject_template_overlap(
                existing.employee_id,
                existing.day_of_week,
                request.start_time,
                request.end_time,
                Some(template_id),
            )
            .await?;
        }

        let updated = ScheduleTemplate {
            start_time: request.start_time,
            end_time: request.end_time,
            is_break: request.is_break,
            ..existing
        };
        self.stores
            .schedule
            .update_template(updated)
            .await
            .map_err(|e| e.into_booking("template"))
    }

    pub async fn delete_template(
        &self,
        ctx: &CallerContext,
        template_id: i32,
    ) -> Result<(), BookingError> {
        let existing = self
            .stores
            .schedule
            .get_template(template_id)
            .await
            .map_err(|e| e.into_booking("template"))?;
        self.tenant_employee(ctx, existing.employee_id).await?;

        self.stores
            .schedule
            .delete_template(template_id)
            .await
            .map_err(|e| e.into_booking("template"))
    }

    pub async fn list_templates(
        &self,
        ctx: &CallerContext,
        employee_id: i32,
    ) -> Result<Vec<ScheduleTemplate>, BookingError> {
        self.tenant_employee(ctx, employee_id).await?;
        self.stores
            .schedule
            .list_templates(employee_id)
            .await
            .map_err(|e| e.into_booking("template"))
    }

    // ------------------------------------------------------------------
    // Date overrides
    // ------------------------------------------------------------------

    pub async fn create_override(
        &self,
        ctx: &CallerContext,
        request: CreateOverrideRequest,
    ) -> Result<ScheduleOverride, BookingError> {
        debug!(
            "Creating override for employee {} on {}",
            request.employee_id, request.override_date
        );

        self.tenant_employee(ctx, request.employee_id).await?;
        self.reject_past_date(request.override_date)?;
        validate_override_shape(
            request.is_working_day,
            request.start_time,
            request.end_time,
        )?;

        let existing = self
            .stores
            .schedule
            .override_for_date(request.employee_id, request.override_date)
            .await
            .map_err(|e| e.into_booking("override"))?;
        if existing.is_some() {
            return Err(BookingError::Conflict(
                "override already exists for this date".to_string(),
            ));
        }

        let schedule_override = ScheduleOverride {
            id: 0,
            employee_id: request.employee_id,
            override_date: request.override_date,
            start_time: request.start_time,
            end_time: request.end_time,
            is_working_day: request.is_working_day,
            is_break: request.is_break,
            created_at: self.clock.now(),
        };

        let created = self
            .stores
            .schedule
            .create_override(schedule_override)
            .await
            .map_err(|e| e.into_booking("override"))?;
        info!(
            "Override {} created for employee {} on {}",
            created.id, created.employee_id, created.override_date
        );
        Ok(created)
    }

    pub async fn update_override(
        &self,
        ctx: &CallerContext,
        override_id: i32,
        request: UpdateOverrideRequest,
    ) -> Result<ScheduleOverride, BookingError> {
        let existing = self
            .stores
            .schedule
            .get_override(override_id)
            .await
            .map_err(|e| e.into_booking("override"))?;
        self.tenant_employee(ctx, existing.employee_id).await?;

        // The date is immutable, so a past-dated override can no longer be
        // edited at all.
        self.reject_past_date(existing.override_date)?;
        validate_override_shape(
            request.is_working_day,
            request.start_time,
            request.end_time,
        )?;

        let updated = ScheduleOverride {
            start_time: request.start_time,
            end_time: request.end_time,
            is_working_day: request.is_working_day,
            is_break: request.is_break,
            ..existing
        };
        self.stores
            .schedule
            .update_override(updated)
            .await
            .map_err(|e| e.into_booking("override"))
    }

    pub async fn delete_override(
        &self,
        ctx: &CallerContext,
        override_id: i32,
    ) -> Result<(), BookingError> {
        let existing = self
            .stores
            .schedule
            .get_override(override_id)
            .await
            .map_err(|e| e.into_booking("override"))?;
        self.tenant_employee(ctx, existing.employee_id).await?;
        self.reject_past_date(existing.override_date)?;

        self.stores
            .schedule
            .delete_override(override_id)
            .await
            .map_err(|e| e.into_booking("override"))
    }

    pub async fn list_overrides(
        &self,
        ctx: &CallerContext,
        employee_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScheduleOverride>, BookingError> {
        self.tenant_employee(ctx, employee_id).await?;

        if to < from {
            return Err(BookingError::InvalidInterval(
                "end date must be after start date".to_string(),
            ));
        }
        let max_days = self.config.max_list_range_days;
        if (to - from).num_days() > max_days {
            return Err(BookingError::RangeTooLarge { max_days });
        }

        self.stores
            .schedule
            .list_overrides(employee_id, from, to)
            .await
            .map_err(|e| e.into_booking("override"))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn tenant_employee(
        &self,
        ctx: &CallerContext,
        employee_id: i32,
    ) -> Result<Employee, BookingError> {
        let employee = self
            .stores
            .employee
            .get(employee_id)
            .await
            .map_err(|e| e.into_booking("employee"))?;
        if employee.business_id != ctx.business_id {
            return Err(BookingError::NotFound("employee"));
        }
        Ok(employee)
    }

    async fn reject_template_overlap(
        &self,
        employee_id: i32,
        day_of_week: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_id: Option<i32>,
    ) -> Result<(), BookingError> {
        let templates = self
            .stores
            .schedule
            .list_templates(employee_id)
            .await
            .map_err(|e| e.into_booking("template"))?;

        let overlapping = templates.iter().any(|existing| {
            Some(existing.id) != exclude_id
                && !existing.is_break
                && existing.day_of_week == day_of_week
                && clock_ranges_overlap(
                    existing.start_time,
                    existing.end_time,
                    start_time,
                    end_time,
                )
        });
        if overlapping {
            return Err(BookingError::Conflict(
                "template overlaps with existing schedule".to_string(),
            ));
        }
        Ok(())
    }

    fn reject_past_date(&self, date: NaiveDate) -> Result<(), BookingError> {
        let today = local_date(self.clock.now(), self.config.deployment_offset());
        if date < today {
            return Err(BookingError::InvalidTransition(
                "cannot modify schedule overrides for past dates".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_day_of_week(day_of_week: i32) -> Result<(), BookingError> {
    if !(0..=6).contains(&day_of_week) {
        return Err(BookingError::InvalidInterval(
            "day of week must be between 0 (Sunday) and 6 (Saturday)".to_string(),
        ));
    }
    Ok(())
}

fn validate_window(start_time: NaiveTime, end_time: NaiveTime) -> Result<(), BookingError> {
    if minutes_since_midnight(start_time) >= minutes_since_midnight(end_time) {
        return Err(BookingError::InvalidInterval(
            "end time must be after start time".to_string(),
        ));
    }
    Ok(())
}

fn validate_override_shape(
    is_working_day: bool,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Result<(), BookingError> {
    if !is_working_day {
        return Ok(());
    }
    match (start_time, end_time) {
        (Some(start), Some(end)) => validate_window(start, end),
        (None, None) => Ok(()),
        _ => Err(BookingError::InvalidInterval(
            "start time and end time must be provided together".to_string(),
        )),
    }
}
