use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use shared_models::BookingError;
use shared_store::ScheduleStore;
use shared_utils::time::weekday_index;

use crate::models::EffectiveWindow;

/// Resolves the effective working window for (employee, date): a
/// date-specific override fully replaces the weekly template when present,
/// and a missing schedule is a normal outcome, not an error.
pub struct ScheduleResolver {
    schedule: Arc<dyn ScheduleStore>,
}

impl ScheduleResolver {
    pub fn new(schedule: Arc<dyn ScheduleStore>) -> Self {
        Self { schedule }
    }

    pub async fn resolve(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> Result<Option<EffectiveWindow>, BookingError> {
        if let Some(schedule_override) = self
            .schedule
            .override_for_date(employee_id, date)
            .await
            .map_err(|e| e.into_booking("override"))?
        {
            debug!(
                "Override found for employee {} on {}: working_day={}",
                employee_id, date, schedule_override.is_working_day
            );
            if !schedule_override.is_working_day {
                return Ok(None);
            }
            // A working-day override without explicit times contributes no
            // hours of its own, and the template it replaces never applies.
            return Ok(match (schedule_override.start_time, schedule_override.end_time) {
                (Some(start_time), Some(end_time)) => Some(EffectiveWindow {
                    start_time,
                    end_time,
                    is_break: schedule_override.is_break,
                }),
                _ => None,
            });
        }

        let template = self
            .schedule
            .template_for_weekday(employee_id, weekday_index(date))
            .await
            .map_err(|e| e.into_booking("template"))?;

        match template {
            Some(template) => Ok(Some(EffectiveWindow::from_template(&template))),
            None => {
                debug!("No schedule for employee {} on {}", employee_id, date);
                Ok(None)
            }
        }
    }
}
