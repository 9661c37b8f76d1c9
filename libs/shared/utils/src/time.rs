// libs/shared/utils/src/time.rs
//
// Interval primitives shared by the schedule and appointment cells. All
// interval comparisons are half-open: [start, end).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

pub fn minutes_since_midnight(t: NaiveTime) -> i32 {
    (t.hour() * 60 + t.minute()) as i32
}

/// Whether two time-of-day ranges overlap, compared as minutes since
/// midnight. Callers guarantee start < end for both ranges.
pub fn clock_ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    minutes_since_midnight(a_start) < minutes_since_midnight(b_end)
        && minutes_since_midnight(a_end) > minutes_since_midnight(b_start)
}

/// Whether two absolute spans overlap. Callers guarantee start < end for
/// both spans.
pub fn spans_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Calendar date of an instant in the deployment timezone.
pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// Time-of-day of an instant in the deployment timezone.
pub fn local_time(at: DateTime<Utc>, offset: FixedOffset) -> NaiveTime {
    at.with_timezone(&offset).time()
}

/// The instant at which a local date and time-of-day occur in the
/// deployment timezone. Fixed offsets map local datetimes unambiguously.
pub fn at_local(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Weekday index with 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}
