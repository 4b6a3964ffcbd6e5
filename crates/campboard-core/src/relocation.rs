//! Relocation planning: finding valid destination slots for an existing stay.
//!
//! The planner searches every unit and every day from today forward for runs
//! of days long enough to hold the interval being moved. A day counts as free
//! when no interval occupies it or when the occupant is the moving interval
//! itself, so the current placement is always offered (a no-op move is
//! idempotent).
//!
//! Committing a move is destructive by design: delete the original, create a
//! replacement on the destination. Source and destination may live in
//! different persistence partitions (regular vs. overflow), so an in-place
//! update is not possible. The commit itself lives on the engine.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::housing::{HousingUnit, Partition, UnitId};
use crate::interval::{IntervalId, StayInterval};
use crate::store::IntervalStore;

/// A valid destination slot for a relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationTarget {
    pub unit_id: UnitId,
    pub start: NaiveDate,
}

/// A planned move, ready for commit. Describes the replacement interval and
/// the partitions involved; the engine executes the delete-then-create pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelocationPlan {
    pub interval_id: IntervalId,
    pub target: RelocationTarget,
    pub source_partition: Partition,
    pub target_partition: Partition,
}

impl RelocationPlan {
    pub fn crosses_partition(&self) -> bool {
        self.source_partition != self.target_partition
    }

    /// Whether the plan lands exactly on the interval's current placement.
    pub fn is_noop(&self, current: &StayInterval) -> bool {
        self.target.unit_id == current.unit_id && self.target.start == current.start
    }
}

/// Searches for valid relocation destinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelocationPlanner;

impl RelocationPlanner {
    pub fn new() -> Self {
        Self
    }

    /// All (unit, start) pairs where `moving` fits, for starts in
    /// `days` at or after `today`.
    ///
    /// Each start index is scanned independently with a forward run that
    /// stops at the first invalid day; worst case O(units x days x length),
    /// acceptable for a bounded season.
    pub fn candidates(
        &self,
        moving: &StayInterval,
        units: &[HousingUnit],
        days: &[NaiveDate],
        today: NaiveDate,
        store: &IntervalStore,
    ) -> Vec<RelocationTarget> {
        let length = moving.len_days();
        let Some(&last_day) = days.last() else {
            return Vec::new();
        };
        let mut targets = Vec::new();

        for unit in units.iter().filter(|u| !u.deleted) {
            for &start in days.iter().filter(|&&d| d >= today) {
                // The whole run must stay inside the season window.
                if start + Duration::days(length - 1) > last_day {
                    break;
                }
                if self.fits(moving, unit.id, start, length, store) {
                    targets.push(RelocationTarget { unit_id: unit.id, start });
                }
            }
        }
        targets
    }

    /// Whether `length` consecutive days from `start` on `unit` are each
    /// free or occupied by the moving interval itself.
    pub fn fits(
        &self,
        moving: &StayInterval,
        unit: UnitId,
        start: NaiveDate,
        length: i64,
        store: &IntervalStore,
    ) -> bool {
        (0..length).all(|offset| {
            let day = start + Duration::days(offset);
            match store.by_unit_and_day(unit, day) {
                None => true,
                Some(occupant) => occupant.id == moving.id,
            }
        })
    }

    /// Build a commit-ready plan for one chosen target.
    pub fn plan(&self, moving: &StayInterval, target: RelocationTarget) -> RelocationPlan {
        RelocationPlan {
            interval_id: moving.id,
            target,
            source_partition: Partition::of(moving.unit_id),
            target_partition: Partition::of(target.unit_id),
        }
    }
}

/// The replacement interval a plan produces: same reservation data, new
/// placement. The id is provisional until the persistence backend assigns one.
pub fn relocated_interval(original: &StayInterval, target: RelocationTarget) -> StayInterval {
    let length = original.len_days();
    let mut moved = original.clone();
    moved.unit_id = target.unit_id;
    moved.start = target.start;
    moved.end = target.start + Duration::days(length - 1);
    moved
}
