use thiserror::Error;

/// Domain error taxonomy shared by every cell. All of these are normal,
/// synchronously returned outcomes; none are retried and none are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} is not active")]
    Inactive(&'static str),

    #[error("service is not assigned to employee")]
    NotAssigned,

    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    #[error("outside availability: {0}")]
    OutsideAvailability(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("date range cannot exceed {max_days} days")]
    RangeTooLarge { max_days: i64 },

    #[error("storage error: {0}")]
    Store(String),
}
