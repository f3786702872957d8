//! Error types for the planning pipeline.

use thiserror::Error;

/// Failures the planning core and its boundary checks can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A run parameter the pipeline cannot work with (only `days < 1` today).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Too few places for the requested trip length.
    #[error("only {found} places found, which is too few for {days} days (need at least {required})")]
    InsufficientData {
        found: usize,
        days: usize,
        required: usize,
    },

    /// A day label outside `1..=days`.
    #[error("day {day} is outside the range 1..={days}")]
    DayOutOfRange { day: usize, days: usize },
}

impl PlanError {
    pub(crate) fn zero_days() -> Self {
        PlanError::InvalidParameter {
            name: "days",
            reason: "number of days must be >= 1".to_string(),
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
