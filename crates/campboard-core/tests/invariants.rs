//! Property tests for the no-overlap invariant and gap-search soundness.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use campboard_core::{
    HousingUnit, IntervalStore, RelocationPlanner, RelocationTarget, StayInterval, UnitId,
};

fn season_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    season_start() + Duration::days(offset)
}

fn season_days(len: i64) -> Vec<NaiveDate> {
    (0..len).map(day).collect()
}

/// A randomly placed stay attempt: unit, start offset, length.
fn attempt_strategy() -> impl Strategy<Value = (UnitId, i64, i64)> {
    (1i64..=4, 0i64..28, 1i64..=5)
}

/// Apply attempts the way callers must: validate with `conflict` first, only
/// upsert when the slot is clear.
fn apply_attempts(attempts: &[(UnitId, i64, i64)]) -> IntervalStore {
    let mut store = IntervalStore::new();
    let mut next_id = 1;
    for &(unit, start_off, len) in attempts {
        let start = day(start_off);
        let end = day(start_off + len - 1);
        if store.conflict(unit, start, end, None).is_none() {
            let iv = StayInterval::try_new(next_id, unit, start, end, "Guest").unwrap();
            store.upsert(iv);
            next_id += 1;
        }
    }
    store
}

proptest! {
    /// After any sequence of validated creates, no two intervals on the same
    /// unit share a calendar day.
    #[test]
    fn no_overlap_invariant_holds(attempts in prop::collection::vec(attempt_strategy(), 0..40)) {
        let store = apply_attempts(&attempts);

        let intervals: Vec<_> = store.iter().collect();
        for a in &intervals {
            for b in &intervals {
                if a.id != b.id && a.unit_id == b.unit_id {
                    prop_assert!(
                        !a.overlaps(b),
                        "intervals {} and {} overlap on unit {}",
                        a.id, b.id, a.unit_id
                    );
                }
            }
        }
    }

    /// The day index agrees with interval ranges: every stamped day belongs
    /// to exactly the interval that covers it.
    #[test]
    fn day_index_matches_interval_ranges(attempts in prop::collection::vec(attempt_strategy(), 0..40)) {
        let store = apply_attempts(&attempts);

        for unit in 1..=4 {
            for d in season_days(35) {
                let stamped = store.by_unit_and_day(unit, d).map(|iv| iv.id);
                let covering: Vec<_> = store
                    .iter()
                    .filter(|iv| iv.unit_id == unit && iv.covers(d))
                    .map(|iv| iv.id)
                    .collect();
                match stamped {
                    Some(id) => prop_assert_eq!(covering, vec![id]),
                    None => prop_assert!(covering.is_empty()),
                }
            }
        }
    }

    /// Every target the planner reports survives a direct free-or-self scan,
    /// and every start it omits has a genuine blocker or falls outside the
    /// window.
    #[test]
    fn gap_search_is_sound_and_complete(
        attempts in prop::collection::vec(attempt_strategy(), 1..30),
        today_off in 0i64..20,
    ) {
        let store = apply_attempts(&attempts);
        // The first attempt always lands in an empty store, so at least one
        // interval exists; move the lowest-id one.
        let moving = store.iter().min_by_key(|iv| iv.id).cloned().unwrap();

        let units: Vec<_> = (1..=4)
            .map(|id| HousingUnit::new(id, format!("{id}"), "", 1))
            .collect();
        let days = season_days(33);
        let today = day(today_off);
        let length = moving.len_days();
        let last_day = *days.last().unwrap();

        let targets = RelocationPlanner::new().candidates(&moving, &units, &days, today, &store);

        for unit in &units {
            for &start in &days {
                if start < today {
                    let target = RelocationTarget { unit_id: unit.id, start };
                    prop_assert!(!targets.contains(&target));
                    continue;
                }
                let inside = start + Duration::days(length - 1) <= last_day;
                let free_or_self = (0..length).all(|off| {
                    store
                        .by_unit_and_day(unit.id, start + Duration::days(off))
                        .map_or(true, |iv| iv.id == moving.id)
                });
                let reported = targets.contains(&RelocationTarget { unit_id: unit.id, start });
                prop_assert_eq!(reported, inside && free_or_self);
            }
        }
    }
}
