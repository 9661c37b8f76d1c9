use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use appointment_cell::models::{RejectReason, SlotVerdict};
use appointment_cell::services::ConflictService;
use shared_config::AppConfig;
use shared_models::{Appointment, AppointmentStatus, ScheduleTemplate};
use shared_store::{AppointmentStore, FixedClock, MemoryStore, ScheduleStore};
use shared_utils::test_utils::{t, template};
use shared_utils::time::at_local;

const EMPLOYEE: i32 = 7;

// 2030-01-07 is a Monday, weekday index 1.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    at_local(monday(), t(hour, minute), AppConfig::default().deployment_offset())
}

async fn setup() -> (ConflictService, Arc<MemoryStore>) {
    let store = MemoryStore::new();
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap(),
    ));

    // Monday 09:00-17:00, plus a Wednesday break row.
    store
        .create_template(template(EMPLOYEE, 1, t(9, 0), t(17, 0)))
        .await
        .unwrap();
    let mut wednesday_break: ScheduleTemplate = template(EMPLOYEE, 3, t(9, 0), t(17, 0));
    wednesday_break.is_break = true;
    store.create_template(wednesday_break).await.unwrap();

    let service = ConflictService::new(
        store.clone(),
        store.clone(),
        clock,
        AppConfig::default(),
    );
    (service, store)
}

#[tokio::test]
async fn accepts_an_open_interval() {
    let (service, _store) = setup().await;
    let verdict = service
        .check(EMPLOYEE, at(10, 0), at(10, 30), 30, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Bookable);
}

#[tokio::test]
async fn window_bounds_are_inclusive_and_exact() {
    let (service, _store) = setup().await;

    // Exactly the working window is accepted.
    let verdict = service
        .check(EMPLOYEE, at(9, 0), at(17, 0), 480, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Bookable);

    // One minute outside either bound is not.
    let verdict = service
        .check(EMPLOYEE, at(8, 59), at(16, 59), 480, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Rejected(RejectReason::OutsideWorkingHours));

    let verdict = service
        .check(EMPLOYEE, at(9, 1), at(17, 1), 480, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Rejected(RejectReason::OutsideWorkingHours));
}

#[tokio::test]
async fn past_intervals_are_rejected_first() {
    let (service, _store) = setup().await;
    let start = Utc.with_ymd_and_hms(2029, 12, 31, 10, 0, 0).unwrap();
    let verdict = service
        .check(EMPLOYEE, start, start + Duration::minutes(30), 30, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Rejected(RejectReason::InThePast));
}

#[tokio::test]
async fn interval_must_match_the_service_duration_exactly() {
    let (service, _store) = setup().await;
    let verdict = service
        .check(EMPLOYEE, at(10, 0), at(10, 30), 45, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Rejected(RejectReason::DurationMismatch));
}

#[tokio::test]
async fn days_without_a_schedule_reject_with_no_schedule() {
    let (service, _store) = setup().await;
    // Tuesday has no template.
    let tuesday = monday().succ_opt().unwrap();
    let start = at_local(tuesday, t(10, 0), AppConfig::default().deployment_offset());
    let verdict = service
        .check(EMPLOYEE, start, start + Duration::minutes(30), 30, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Rejected(RejectReason::NoSchedule));
}

#[tokio::test]
async fn break_days_reject_as_outside_working_hours() {
    let (service, _store) = setup().await;
    // Wednesday carries the break row.
    let wednesday = NaiveDate::from_ymd_opt(2030, 1, 9).unwrap();
    let start = at_local(wednesday, t(10, 0), AppConfig::default().deployment_offset());
    let verdict = service
        .check(EMPLOYEE, start, start + Duration::minutes(30), 30, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Rejected(RejectReason::OutsideWorkingHours));
}

#[tokio::test]
async fn scheduled_overlaps_reject_and_reschedules_exclude_themselves() {
    let (service, store) = setup().await;
    let booked = store
        .create(Appointment {
            id: 0,
            business_id: 1,
            client_id: 2,
            employee_id: EMPLOYEE,
            service_id: 3,
            start_time: at(10, 0),
            end_time: at(10, 30),
            status: AppointmentStatus::Scheduled,
            reminder_minutes: None,
            created_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        })
        .await
        .unwrap();

    let verdict = service
        .check(EMPLOYEE, at(10, 15), at(10, 45), 30, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Rejected(RejectReason::OverlapsExisting));

    // Touching intervals never conflict under half-open semantics.
    let verdict = service
        .check(EMPLOYEE, at(9, 30), at(10, 0), 30, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Bookable);

    // A reschedule ignores the appointment being moved.
    let verdict = service
        .check(EMPLOYEE, at(10, 15), at(10, 45), 30, Some(booked.id))
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Bookable);

    // Cancelled rows stop blocking.
    store
        .set_status(booked.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();
    let verdict = service
        .check(EMPLOYEE, at(10, 0), at(10, 30), 30, None)
        .await
        .unwrap();
    assert_eq!(verdict, SlotVerdict::Bookable);

    assert_matches!(verdict.into_result(), Ok(()));
}
