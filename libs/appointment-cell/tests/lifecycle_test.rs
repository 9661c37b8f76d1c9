use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};

use appointment_cell::services::AppointmentLifecycleService;
use shared_models::{Appointment, AppointmentStatus, BookingError};

fn scheduled_at(hours_from_reference: i64) -> Appointment {
    let reference = Utc.with_ymd_and_hms(2030, 1, 7, 12, 0, 0).unwrap();
    let start_time = reference + Duration::hours(hours_from_reference);
    Appointment {
        id: 1,
        business_id: 1,
        client_id: 2,
        employee_id: 3,
        service_id: 4,
        start_time,
        end_time: start_time + Duration::minutes(30),
        status: AppointmentStatus::Scheduled,
        reminder_minutes: None,
        created_at: reference - Duration::days(1),
    }
}

#[test]
fn scheduled_reaches_every_terminal_state() {
    let lifecycle = AppointmentLifecycleService::new();
    let next = lifecycle.valid_transitions(AppointmentStatus::Scheduled);
    assert_eq!(
        next,
        vec![
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ]
    );
}

#[test]
fn terminal_states_allow_no_transitions() {
    let lifecycle = AppointmentLifecycleService::new();
    for status in [
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ] {
        assert!(lifecycle.valid_transitions(status).is_empty());
        assert_matches!(
            lifecycle.validate_transition(status, AppointmentStatus::Scheduled),
            Err(BookingError::InvalidTransition(_))
        );
    }
}

#[test]
fn validate_transition_accepts_scheduled_to_cancelled() {
    let lifecycle = AppointmentLifecycleService::new();
    lifecycle
        .validate_transition(AppointmentStatus::Scheduled, AppointmentStatus::Cancelled)
        .unwrap();
}

#[test]
fn future_scheduled_appointments_are_mutable() {
    let lifecycle = AppointmentLifecycleService::new();
    let now = Utc.with_ymd_and_hms(2030, 1, 7, 12, 0, 0).unwrap();
    lifecycle.ensure_mutable(&scheduled_at(2), now).unwrap();
}

#[test]
fn started_appointments_are_frozen() {
    let lifecycle = AppointmentLifecycleService::new();
    let now = Utc.with_ymd_and_hms(2030, 1, 7, 12, 0, 0).unwrap();
    assert_matches!(
        lifecycle.ensure_mutable(&scheduled_at(-1), now),
        Err(BookingError::InvalidTransition(_))
    );
    // Starting exactly now counts as started.
    assert_matches!(
        lifecycle.ensure_mutable(&scheduled_at(0), now),
        Err(BookingError::InvalidTransition(_))
    );
}

#[test]
fn non_scheduled_appointments_are_frozen() {
    let lifecycle = AppointmentLifecycleService::new();
    let now = Utc.with_ymd_and_hms(2030, 1, 7, 12, 0, 0).unwrap();
    let mut completed = scheduled_at(2);
    completed.status = AppointmentStatus::Completed;
    assert_matches!(
        lifecycle.ensure_mutable(&completed, now),
        Err(BookingError::InvalidTransition(_))
    );
}
