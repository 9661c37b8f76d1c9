// libs/shared/utils/src/test_utils.rs
//
// Fixture builders shared by the cells' test suites. Builders return
// entities with id 0; stores assign real identifiers on insert.

use std::sync::Once;

use chrono::{NaiveDate, NaiveTime, Utc};

use shared_models::{
    Business, BusinessService, CallerContext, Employee, Role, ScheduleOverride, ScheduleTemplate,
    User,
};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn business(name: &str) -> Business {
    Business {
        id: 0,
        name: name.to_string(),
        logo_url: None,
        color_scheme: None,
        created_at: Utc::now(),
    }
}

pub fn user(business_id: i32, name: &str, role: Role) -> User {
    User {
        id: 0,
        business_id,
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        phone: None,
        full_name: name.to_string(),
        role,
        created_at: Utc::now(),
    }
}

pub fn client_user(business_id: i32, name: &str) -> User {
    user(business_id, name, Role::Client)
}

pub fn employee(business_id: i32, user_id: i32) -> Employee {
    Employee {
        id: 0,
        business_id,
        user_id,
        specialization: None,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn service(business_id: i32, duration_minutes: i32) -> BusinessService {
    BusinessService {
        id: 0,
        business_id,
        name: format!("{duration_minutes}-minute session"),
        description: None,
        duration_minutes,
        price_cents: 5_000,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn template(
    employee_id: i32,
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> ScheduleTemplate {
    ScheduleTemplate {
        id: 0,
        employee_id,
        day_of_week,
        start_time,
        end_time,
        is_break: false,
        created_at: Utc::now(),
    }
}

pub fn working_override(
    employee_id: i32,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> ScheduleOverride {
    ScheduleOverride {
        id: 0,
        employee_id,
        override_date: date,
        start_time: Some(start_time),
        end_time: Some(end_time),
        is_working_day: true,
        is_break: false,
        created_at: Utc::now(),
    }
}

pub fn day_off(employee_id: i32, date: NaiveDate) -> ScheduleOverride {
    ScheduleOverride {
        id: 0,
        employee_id,
        override_date: date,
        start_time: None,
        end_time: None,
        is_working_day: false,
        is_break: false,
        created_at: Utc::now(),
    }
}

pub fn caller(user_id: i32, business_id: i32, role: Role) -> CallerContext {
    CallerContext::new(user_id, business_id, role)
}
