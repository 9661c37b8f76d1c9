use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use shared_models::{Appointment, AppointmentStatus, ScheduleOverride, ScheduleTemplate};
use shared_store::{AppointmentStore, MemoryStore, ScheduleStore, StoreError};

fn appointment(employee_id: i32, start_hour: u32, start_minute: u32, minutes: i64) -> Appointment {
    let start_time = Utc
        .with_ymd_and_hms(2030, 1, 7, start_hour, start_minute, 0)
        .unwrap();
    Appointment {
        id: 0,
        business_id: 1,
        client_id: 2,
        employee_id,
        service_id: 3,
        start_time,
        end_time: start_time + chrono::Duration::minutes(minutes),
        status: AppointmentStatus::Scheduled,
        reminder_minutes: None,
        created_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn template(employee_id: i32, day_of_week: i32, start: (u32, u32), is_break: bool) -> ScheduleTemplate {
    ScheduleTemplate {
        id: 0,
        employee_id,
        day_of_week,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        is_break,
        created_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn create_assigns_distinct_ids() {
    let store = MemoryStore::new();
    let first = store.create(appointment(7, 9, 0, 30)).await.unwrap();
    let second = store.create(appointment(7, 10, 0, 30)).await.unwrap();
    assert_ne!(first.id, 0);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn overlapping_scheduled_insert_trips_the_exclusion_constraint() {
    let store = MemoryStore::new();
    store.create(appointment(7, 10, 0, 30)).await.unwrap();

    let result = store.create(appointment(7, 10, 15, 30)).await;
    assert_matches!(result, Err(StoreError::Conflict(_)));

    // Touching intervals and other employees are fine.
    store.create(appointment(7, 10, 30, 30)).await.unwrap();
    store.create(appointment(8, 10, 0, 30)).await.unwrap();
}

#[tokio::test]
async fn cancelled_appointments_do_not_block_inserts() {
    let store = MemoryStore::new();
    let booked = store.create(appointment(7, 10, 0, 30)).await.unwrap();
    store
        .set_status(booked.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    store.create(appointment(7, 10, 0, 30)).await.unwrap();
}

#[tokio::test]
async fn update_ignores_the_row_being_moved() {
    let store = MemoryStore::new();
    let booked = store.create(appointment(7, 10, 0, 30)).await.unwrap();

    // Shifting within its own old interval is not a self-conflict.
    let mut moved = booked.clone();
    moved.start_time += chrono::Duration::minutes(15);
    moved.end_time += chrono::Duration::minutes(15);
    store.update(moved).await.unwrap();

    // But moving onto another scheduled row still fails.
    let other = store.create(appointment(7, 12, 0, 30)).await.unwrap();
    let mut clash = other.clone();
    clash.start_time = booked.start_time + chrono::Duration::minutes(15);
    clash.end_time = clash.start_time + chrono::Duration::minutes(30);
    assert_matches!(store.update(clash).await, Err(StoreError::Conflict(_)));
}

#[tokio::test]
async fn one_override_per_employee_and_date() {
    let store = MemoryStore::new();
    let date = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap();
    let schedule_override = ScheduleOverride {
        id: 0,
        employee_id: 7,
        override_date: date,
        start_time: None,
        end_time: None,
        is_working_day: false,
        is_break: false,
        created_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    };
    store.create_override(schedule_override.clone()).await.unwrap();
    assert_matches!(
        store.create_override(schedule_override.clone()).await,
        Err(StoreError::Conflict(_))
    );

    // A different date for the same employee is fine.
    let mut next_day = schedule_override;
    next_day.override_date = date.succ_opt().unwrap();
    store.create_override(next_day).await.unwrap();
}

#[tokio::test]
async fn template_for_weekday_prefers_non_break_rows() {
    let store = MemoryStore::new();
    store.create_template(template(7, 1, (8, 0), true)).await.unwrap();
    store.create_template(template(7, 1, (9, 0), false)).await.unwrap();

    let resolved = store.template_for_weekday(7, 1).await.unwrap().unwrap();
    assert!(!resolved.is_break);
    assert_eq!(resolved.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());

    assert!(store.template_for_weekday(7, 2).await.unwrap().is_none());
}

#[tokio::test]
async fn listings_filter_by_owner_and_order_by_start() {
    let store = MemoryStore::new();
    let late = store.create(appointment(7, 15, 0, 30)).await.unwrap();
    let early = store.create(appointment(7, 9, 0, 30)).await.unwrap();
    store.create(appointment(8, 9, 0, 30)).await.unwrap();

    let from = Utc.with_ymd_and_hms(2030, 1, 7, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2030, 1, 8, 0, 0, 0).unwrap();
    let listed = store.list_by_employee(7, from, to).await.unwrap();
    assert_eq!(
        listed.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![early.id, late.id]
    );
}
