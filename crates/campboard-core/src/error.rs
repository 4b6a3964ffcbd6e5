//! Core error types for campboard-core.
//!
//! This module defines the error hierarchy for the scheduling engine using
//! thiserror. Everything here is a local, recoverable condition; nothing in
//! the core is fatal.

use chrono::NaiveDate;
use thiserror::Error;

use crate::housing::UnitId;
use crate::interval::IntervalId;

/// Top-level error type for scheduling operations.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// An attempted create/update/move would break the non-overlap invariant.
    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Structural validation of input data failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A relocation or creation target became invalid between planning and
    /// commit (a concurrent remote write landed in between). The caller
    /// should re-plan; nothing was applied.
    #[error("Stale target: unit {unit_id} starting {start} is no longer available")]
    StaleTarget { unit_id: UnitId, start: NaiveDate },

    /// The referenced interval is not present in the store.
    #[error("Unknown interval: {0}")]
    UnknownInterval(IntervalId),

    /// The persistence collaborator reported a failure. The local cache was
    /// not mutated; the caller decides whether to retry.
    #[error("Persistence error: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A relocation deleted the original interval but the destination create
    /// failed, and the compensating re-create of the original also failed.
    /// Carries both failures; the interval exists only in the cache until the
    /// caller reconciles with the backend.
    #[error("Relocation rollback failed: create: {create}; rollback: {rollback}")]
    RelocationRollbackFailed {
        create: Box<dyn std::error::Error + Send + Sync>,
        rollback: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Structured refusal for overlap conflicts, raised before any persistence
/// call is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// Another interval already occupies a day in the requested range.
    #[error("unit {unit_id} is already reserved on {day} by interval {existing_id}")]
    Overlap {
        unit_id: UnitId,
        day: NaiveDate,
        existing_id: IntervalId,
    },
}

/// Structural validation errors for interval and season data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid date range: end date precedes start date.
    #[error("invalid date range: end ({end}) precedes start ({start})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// The date range falls outside every configured season window.
    #[error("date range {start}..={end} is outside the season calendar")]
    OutsideSeason { start: NaiveDate, end: NaiveDate },

    /// The referenced housing unit does not exist in this session.
    #[error("unknown housing unit: {0}")]
    UnknownUnit(UnitId),

    /// Seasons must be ordered by year and non-overlapping.
    #[error("season list is not ordered and non-overlapping at year {year}")]
    MalformedSeasonList { year: i32 },

    /// A season calendar needs at least one season.
    #[error("season calendar is empty")]
    EmptySeasonList,
}

/// Result type alias for ScheduleError.
pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;
