// libs/schedule-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_models::{ScheduleOverride, ScheduleTemplate};

/// The resolved availability for one employee on one concrete date, after
/// override-vs-template resolution. Derived per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_break: bool,
}

impl EffectiveWindow {
    pub fn from_template(template: &ScheduleTemplate) -> Self {
        Self {
            start_time: template.start_time,
            end_time: template.end_time,
            is_break: template.is_break,
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub employee_id: i32,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_break: bool,
}

/// Weekday assignment is immutable; updates touch the window and break flag
/// only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTemplateRequest {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_break: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOverrideRequest {
    pub employee_id: i32,
    pub override_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_working_day: bool,
    pub is_break: bool,
}

/// The override date is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOverrideRequest {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_working_day: bool,
    pub is_break: bool,
}

impl UpdateOverrideRequest {
    pub fn from_override(schedule_override: &ScheduleOverride) -> Self {
        Self {
            start_time: schedule_override.start_time,
            end_time: schedule_override.end_time,
            is_working_day: schedule_override.is_working_day,
            is_break: schedule_override.is_break,
        }
    }
}
