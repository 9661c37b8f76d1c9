use std::env;

use chrono::FixedOffset;
use tracing::warn;

/// Minimum notice before a slot's end that still permits booking.
pub const DEFAULT_BOOKING_LEAD_MINUTES: i64 = 15;

/// Upper bound on appointment/override listing ranges.
pub const DEFAULT_MAX_LIST_RANGE_DAYS: i64 = 31;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Offset of the deployment's single configured timezone, in minutes
    /// east of UTC. Calendar dates and times-of-day are interpreted in
    /// this zone.
    pub utc_offset_minutes: i32,
    pub booking_lead_minutes: i64,
    pub max_list_range_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            utc_offset_minutes: env_parsed("BOOKING_UTC_OFFSET_MINUTES", 0),
            booking_lead_minutes: env_parsed(
                "BOOKING_LEAD_MINUTES",
                DEFAULT_BOOKING_LEAD_MINUTES,
            ),
            max_list_range_days: env_parsed(
                "BOOKING_MAX_LIST_RANGE_DAYS",
                DEFAULT_MAX_LIST_RANGE_DAYS,
            ),
        }
    }

    /// The deployment timezone as a chrono offset.
    pub fn deployment_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            booking_lead_minutes: DEFAULT_BOOKING_LEAD_MINUTES,
            max_list_range_days: DEFAULT_MAX_LIST_RANGE_DAYS,
        }
    }
}

fn env_parsed<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value, using default {}", name, default);
            default
        }),
        Err(_) => default,
    }
}
