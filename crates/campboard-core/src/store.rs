//! In-memory authoritative cache of stay intervals.
//!
//! The store is a pure data container with lookup indices. It deliberately
//! does NOT enforce the non-overlap invariant on `upsert`: whether a conflict
//! is acceptable depends on why it exists (a relocation target may overlap
//! the interval being moved), so validation lives with the callers and the
//! `conflict` helper.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::housing::UnitId;
use crate::interval::{IntervalId, StayInterval};

/// Authoritative in-memory cache of stay intervals for one editing session.
///
/// Regular and overflow units share one store; the partition is derivable
/// from the unit id.
#[derive(Debug, Clone, Default)]
pub struct IntervalStore {
    by_id: HashMap<IntervalId, StayInterval>,
    /// (unit, day) -> occupying interval. One stamp per reserved day.
    day_index: HashMap<(UnitId, NaiveDate), IntervalId>,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire contents with a freshly loaded interval set.
    pub fn load(&mut self, intervals: Vec<StayInterval>) {
        self.by_id.clear();
        self.day_index.clear();
        for interval in intervals {
            self.upsert(interval);
        }
    }

    /// Insert or replace an interval by id, re-stamping the day index.
    ///
    /// Does not check the non-overlap invariant; callers validate with
    /// [`conflict`](Self::conflict) first. Returns the previous record with
    /// the same id, if any.
    pub fn upsert(&mut self, interval: StayInterval) -> Option<StayInterval> {
        let previous = self.remove(interval.id);
        for day in interval.days() {
            self.day_index.insert((interval.unit_id, day), interval.id);
        }
        self.by_id.insert(interval.id, interval);
        previous
    }

    /// Remove an interval by id, clearing its day stamps.
    /// Safe no-op when the id is absent.
    pub fn remove(&mut self, id: IntervalId) -> Option<StayInterval> {
        let interval = self.by_id.remove(&id)?;
        for day in interval.days() {
            // Only clear stamps that still point at this interval; an
            // overlapping upsert may have overwritten some of them.
            if self.day_index.get(&(interval.unit_id, day)) == Some(&id) {
                self.day_index.remove(&(interval.unit_id, day));
            }
        }
        Some(interval)
    }

    pub fn get(&self, id: IntervalId) -> Option<&StayInterval> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: IntervalId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// The interval occupying `unit` on `day`, if any.
    pub fn by_unit_and_day(&self, unit: UnitId, day: NaiveDate) -> Option<&StayInterval> {
        let id = self.day_index.get(&(unit, day))?;
        self.by_id.get(id)
    }

    /// All intervals for a unit, ordered by start date.
    pub fn all_for_unit(&self, unit: UnitId) -> Vec<&StayInterval> {
        let mut intervals: Vec<_> = self
            .by_id
            .values()
            .filter(|iv| iv.unit_id == unit)
            .collect();
        intervals.sort_by_key(|iv| iv.start);
        intervals
    }

    /// First interval on `unit` occupying any day in `start..=end`, skipping
    /// `ignore` (the interval a caller is about to replace or move).
    pub fn conflict(
        &self,
        unit: UnitId,
        start: NaiveDate,
        end: NaiveDate,
        ignore: Option<IntervalId>,
    ) -> Option<&StayInterval> {
        let len = (end - start).num_days() + 1;
        (0..len)
            .map(|offset| start + chrono::Duration::days(offset))
            .filter_map(|day| self.by_unit_and_day(unit, day))
            .find(|iv| Some(iv.id) != ignore)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StayInterval> {
        self.by_id.values()
    }
}
