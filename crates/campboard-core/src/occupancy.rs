//! Live occupancy classification per housing unit.
//!
//! Derives a single status from today's intervals, the arrival/departure
//! flags, and an externally supplied cleaning-task signal. The result is a
//! fixed priority chain, not independent booleans:
//!
//! ```text
//! Occupied > NeedsCleaning > ArrivalDay > Free
//! ```

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::housing::{HousingUnit, UnitId};
use crate::store::IntervalStore;

/// Derived per-unit status. Never persisted; recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStatus {
    Free,
    ArrivalDay,
    Occupied,
    NeedsCleaning,
}

/// Read-only signal from the task subsystem: whether a unit has an
/// unresolved, scheduled (non-ad-hoc) cleaning or maintenance task.
pub trait TaskSignal {
    fn has_unresolved_scheduled_task(&self, unit: UnitId) -> bool;
}

/// A set of unit ids with outstanding scheduled tasks.
impl TaskSignal for HashSet<UnitId> {
    fn has_unresolved_scheduled_task(&self, unit: UnitId) -> bool {
        self.contains(&unit)
    }
}

/// Signal for contexts with no task subsystem attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTasks;

impl TaskSignal for NoTasks {
    fn has_unresolved_scheduled_task(&self, _unit: UnitId) -> bool {
        false
    }
}

/// Classifies the live status of housing units.
#[derive(Debug, Clone, Copy, Default)]
pub struct OccupancyClassifier;

impl OccupancyClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one unit against `today` (date-only, no time component).
    pub fn classify(
        &self,
        unit: UnitId,
        today: NaiveDate,
        store: &IntervalStore,
        tasks: &impl TaskSignal,
    ) -> OccupancyStatus {
        let status = self.physical_status(unit, today, store);

        // Fixed priority chain: an occupied unit is never reported as
        // needing cleaning; anything below Occupied is.
        if status != OccupancyStatus::Occupied && tasks.has_unresolved_scheduled_task(unit) {
            return OccupancyStatus::NeedsCleaning;
        }
        status
    }

    /// Classify every unit in the list.
    pub fn classify_all(
        &self,
        units: &[HousingUnit],
        today: NaiveDate,
        store: &IntervalStore,
        tasks: &impl TaskSignal,
    ) -> Vec<(UnitId, OccupancyStatus)> {
        units
            .iter()
            .map(|u| (u.id, self.classify(u.id, today, store, tasks)))
            .collect()
    }

    /// Physical presence status before the cleaning-task override.
    fn physical_status(&self, unit: UnitId, today: NaiveDate, store: &IntervalStore) -> OccupancyStatus {
        let yesterday = today - Duration::days(1);

        // Intervals relevant to "today": covering it, or ending exactly
        // yesterday (a departure that may not have been marked yet).
        let mut matches: Vec<_> = store
            .all_for_unit(unit)
            .into_iter()
            .filter(|iv| iv.covers(today) || iv.end == yesterday)
            .collect();
        matches.sort_by_key(|iv| iv.start);

        match matches.as_slice() {
            [] => OccupancyStatus::Free,

            [only] => {
                if only.start == today {
                    // A reservation starting today with nobody else present.
                    if only.departed {
                        OccupancyStatus::Free
                    } else if only.arrived {
                        OccupancyStatus::Occupied
                    } else {
                        OccupancyStatus::ArrivalDay
                    }
                } else if only.arrived && !only.departed {
                    OccupancyStatus::Occupied
                } else {
                    // Not yet arrived, or already departed: nobody present.
                    OccupancyStatus::Free
                }
            }

            // A departure and a same-day arrival share the unit. The earlier
            // interval is the departing one.
            [departing, arriving, ..] => {
                if !departing.departed {
                    OccupancyStatus::Occupied
                } else if arriving.arrived {
                    OccupancyStatus::Occupied
                } else {
                    OccupancyStatus::ArrivalDay
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::StayInterval;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 7, 15)
    }

    fn interval(id: i64, unit: UnitId, start: NaiveDate, end: NaiveDate) -> StayInterval {
        StayInterval::try_new(id, unit, start, end, "Guest").unwrap()
    }

    fn classify(store: &IntervalStore, tasks: &impl TaskSignal) -> OccupancyStatus {
        OccupancyClassifier::new().classify(5, today(), store, tasks)
    }

    #[test]
    fn empty_unit_is_free() {
        let store = IntervalStore::new();
        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::Free);
    }

    #[test]
    fn spanning_interval_arrived_is_occupied() {
        let mut store = IntervalStore::new();
        let mut iv = interval(1, 5, date(2026, 7, 12), date(2026, 7, 18));
        iv.arrived = true;
        store.upsert(iv);
        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::Occupied);
    }

    #[test]
    fn spanning_interval_not_arrived_is_free() {
        let mut store = IntervalStore::new();
        store.upsert(interval(1, 5, date(2026, 7, 12), date(2026, 7, 18)));
        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::Free);
    }

    #[test]
    fn departed_with_cleaning_task_needs_cleaning() {
        let mut store = IntervalStore::new();
        let mut iv = interval(1, 5, date(2026, 7, 12), date(2026, 7, 18));
        iv.arrived = true;
        iv.departed = true;
        store.upsert(iv);

        let tasks: HashSet<UnitId> = [5].into_iter().collect();
        assert_eq!(classify(&store, &tasks), OccupancyStatus::NeedsCleaning);
        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::Free);
    }

    #[test]
    fn occupied_wins_over_cleaning_task() {
        let mut store = IntervalStore::new();
        let mut iv = interval(1, 5, date(2026, 7, 12), date(2026, 7, 18));
        iv.arrived = true;
        store.upsert(iv);

        let tasks: HashSet<UnitId> = [5].into_iter().collect();
        assert_eq!(classify(&store, &tasks), OccupancyStatus::Occupied);
    }

    #[test]
    fn reservation_starting_today_is_arrival_day() {
        let mut store = IntervalStore::new();
        store.upsert(interval(1, 5, today(), date(2026, 7, 20)));
        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::ArrivalDay);
    }

    #[test]
    fn cleaning_task_beats_arrival_day() {
        let mut store = IntervalStore::new();
        store.upsert(interval(1, 5, today(), date(2026, 7, 20)));
        let tasks: HashSet<UnitId> = [5].into_iter().collect();
        assert_eq!(classify(&store, &tasks), OccupancyStatus::NeedsCleaning);
    }

    #[test]
    fn unmarked_departure_ending_yesterday_counts() {
        let mut store = IntervalStore::new();
        let mut iv = interval(1, 5, date(2026, 7, 10), date(2026, 7, 14));
        iv.arrived = true;
        store.upsert(iv);
        // Ended yesterday, departure never marked: guest presumed present.
        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::Occupied);
    }

    #[test]
    fn changeover_day_previous_guest_still_present() {
        let mut store = IntervalStore::new();
        let mut leaving = interval(1, 5, date(2026, 7, 10), date(2026, 7, 14));
        leaving.arrived = true;
        store.upsert(leaving);
        store.upsert(interval(2, 5, today(), date(2026, 7, 20)));

        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::Occupied);
    }

    #[test]
    fn changeover_day_departed_but_not_arrived() {
        let mut store = IntervalStore::new();
        let mut leaving = interval(1, 5, date(2026, 7, 10), date(2026, 7, 14));
        leaving.arrived = true;
        leaving.departed = true;
        store.upsert(leaving);
        store.upsert(interval(2, 5, today(), date(2026, 7, 20)));

        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::ArrivalDay);
    }

    #[test]
    fn changeover_day_both_departed_and_arrived() {
        let mut store = IntervalStore::new();
        let mut leaving = interval(1, 5, date(2026, 7, 10), date(2026, 7, 14));
        leaving.arrived = true;
        leaving.departed = true;
        store.upsert(leaving);
        let mut arriving = interval(2, 5, today(), date(2026, 7, 20));
        arriving.arrived = true;
        store.upsert(arriving);

        assert_eq!(classify(&store, &NoTasks), OccupancyStatus::Occupied);
    }

    #[test]
    fn classify_all_covers_every_unit() {
        let mut store = IntervalStore::new();
        let mut iv = interval(1, 5, date(2026, 7, 12), date(2026, 7, 18));
        iv.arrived = true;
        store.upsert(iv);

        let units = vec![
            HousingUnit::new(5, "5", "", 1),
            HousingUnit::new(6, "6", "", 1),
        ];
        let statuses = OccupancyClassifier::new().classify_all(&units, today(), &store, &NoTasks);
        assert_eq!(
            statuses,
            vec![(5, OccupancyStatus::Occupied), (6, OccupancyStatus::Free)]
        );
    }
}
