//! The per-session scheduling engine.
//!
//! One `ScheduleEngine` is constructed per season-editing session and owns
//! the interval cache for that session -- there is no ambient global state.
//! Every commit follows the same ordering: validate against the live cache,
//! await the persistence collaborator, and mutate the cache only on confirmed
//! success. Remote edits from other staff enter through `apply_remote`.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{ConflictError, Result, ScheduleError, ValidationError};
use crate::grid::{GridMatrix, GridProjector};
use crate::housing::{HousingUnit, Partition, UnitId};
use crate::interval::{IntervalId, StayInterval};
use crate::occupancy::{OccupancyClassifier, OccupancyStatus, TaskSignal};
use crate::persist::StayPersistence;
use crate::relocation::{relocated_interval, RelocationPlan, RelocationPlanner, RelocationTarget};
use crate::season::SeasonCalendar;
use crate::selection::{blocked_days, SelectionReducer};
use crate::store::IntervalStore;
use crate::sync::{Applied, ChangeEvent, ReconciliationEngine};

/// Scheduling engine for one editing session.
#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    store: IntervalStore,
    calendar: SeasonCalendar,
    units: Vec<HousingUnit>,
    projector: GridProjector,
    classifier: OccupancyClassifier,
    planner: RelocationPlanner,
    reconciler: ReconciliationEngine,
}

impl ScheduleEngine {
    pub fn new(calendar: SeasonCalendar, units: Vec<HousingUnit>) -> Self {
        Self {
            store: IntervalStore::new(),
            calendar,
            units,
            projector: GridProjector::new(),
            classifier: OccupancyClassifier::new(),
            planner: RelocationPlanner::new(),
            reconciler: ReconciliationEngine::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &IntervalStore {
        &self.store
    }

    pub fn calendar(&self) -> &SeasonCalendar {
        &self.calendar
    }

    pub fn units(&self) -> &[HousingUnit] {
        &self.units
    }

    pub fn can_go_prev_season(&self) -> bool {
        self.calendar.can_go_prev()
    }

    pub fn can_go_next_season(&self) -> bool {
        self.calendar.can_go_next()
    }

    pub fn go_prev_season(&mut self) -> bool {
        self.calendar.go_prev()
    }

    pub fn go_next_season(&mut self) -> bool {
        self.calendar.go_next()
    }

    /// Project the active season onto a cell matrix for all live units.
    pub fn project(&self) -> GridMatrix {
        let units: Vec<_> = self.units.iter().filter(|u| !u.deleted).cloned().collect();
        self.projector
            .project(&units, &self.calendar.day_sequence(), &self.store)
    }

    /// Project only the units of one type, in display order.
    pub fn project_for_type(&self, unit_type_id: i64) -> GridMatrix {
        let mut units: Vec<_> = self
            .units
            .iter()
            .filter(|u| !u.deleted && u.unit_type_id == unit_type_id)
            .cloned()
            .collect();
        units.sort_by(|a, b| a.number.cmp(&b.number));
        self.projector
            .project(&units, &self.calendar.day_sequence(), &self.store)
    }

    pub fn classify(
        &self,
        unit: UnitId,
        today: NaiveDate,
        tasks: &impl TaskSignal,
    ) -> OccupancyStatus {
        self.classifier.classify(unit, today, &self.store, tasks)
    }

    pub fn classify_all(
        &self,
        today: NaiveDate,
        tasks: &impl TaskSignal,
    ) -> Vec<(UnitId, OccupancyStatus)> {
        self.classifier
            .classify_all(&self.units, today, &self.store, tasks)
    }

    /// All valid destinations for moving an interval, from today forward.
    pub fn plan_relocation(
        &self,
        id: IntervalId,
        today: NaiveDate,
    ) -> Result<Vec<RelocationTarget>> {
        let moving = self
            .store
            .get(id)
            .ok_or(ScheduleError::UnknownInterval(id))?;
        Ok(self.planner.candidates(
            moving,
            &self.units,
            &self.calendar.day_sequence(),
            today,
            &self.store,
        ))
    }

    /// Build a commit-ready plan for one chosen target.
    pub fn relocation_plan(&self, id: IntervalId, target: RelocationTarget) -> Result<RelocationPlan> {
        let moving = self
            .store
            .get(id)
            .ok_or(ScheduleError::UnknownInterval(id))?;
        Ok(self.planner.plan(moving, target))
    }

    /// Blocked-day mask for starting a drag selection on a unit row.
    pub fn selection_mask(&self, unit: UnitId, today: NaiveDate) -> Vec<bool> {
        blocked_days(unit, &self.calendar.day_sequence(), today, &self.store)
    }

    /// Begin a drag selection on a unit row. `None` when the anchor day is
    /// already reserved or in the past.
    pub fn begin_selection(
        &self,
        unit: UnitId,
        day_index: usize,
        today: NaiveDate,
    ) -> Option<SelectionReducer> {
        SelectionReducer::begin(unit, day_index, self.selection_mask(unit, today))
    }

    // ── Load & remote events ─────────────────────────────────────────

    /// Load the active season's intervals from the backend, replacing the
    /// cache. Returns the number of intervals loaded.
    pub async fn load_season<P: StayPersistence>(&mut self, persistence: &P) -> Result<usize> {
        let intervals = persistence
            .list(self.calendar.active())
            .await
            .map_err(box_persistence)?;
        let count = intervals.len();
        self.store.load(intervals);
        debug!(count, season = self.calendar.active().year, "season loaded");
        Ok(count)
    }

    /// Merge one remote change event into the cache. The caller re-projects
    /// when the outcome says so.
    pub fn apply_remote(&mut self, event: &ChangeEvent) -> Applied {
        self.reconciler.apply(&mut self.store, event)
    }

    // ── Commits ──────────────────────────────────────────────────────

    /// Create a new interval: validate, persist, then cache.
    ///
    /// The draft's id is provisional; the backend-assigned id is returned and
    /// stored.
    pub async fn commit_create<P: StayPersistence>(
        &mut self,
        draft: StayInterval,
        persistence: &P,
    ) -> Result<IntervalId> {
        self.validate_placement(&draft, None)?;

        let id = persistence.create(&draft).await.map_err(box_persistence)?;
        let mut created = draft;
        created.id = id;
        self.store.upsert(created);
        Ok(id)
    }

    /// Update an existing interval: validate, persist, then cache.
    pub async fn commit_update<P: StayPersistence>(
        &mut self,
        interval: StayInterval,
        persistence: &P,
    ) -> Result<()> {
        if !self.store.contains(interval.id) {
            return Err(ScheduleError::UnknownInterval(interval.id));
        }
        self.validate_placement(&interval, Some(interval.id))?;

        persistence
            .update(&interval)
            .await
            .map_err(box_persistence)?;
        self.store.upsert(interval);
        Ok(())
    }

    /// Delete an interval: persist, then drop from the cache.
    pub async fn commit_delete<P: StayPersistence>(
        &mut self,
        id: IntervalId,
        persistence: &P,
    ) -> Result<()> {
        let interval = self
            .store
            .get(id)
            .ok_or(ScheduleError::UnknownInterval(id))?;
        let partition = Partition::of(interval.unit_id);

        persistence
            .delete(id, partition)
            .await
            .map_err(box_persistence)?;
        self.store.remove(id);
        Ok(())
    }

    /// Execute a relocation as an explicit two-phase delete-then-create.
    ///
    /// The target is re-validated against the live cache immediately before
    /// the first persistence call; a concurrent remote write that landed in
    /// between aborts the move with `StaleTarget` and nothing is applied.
    /// If the create fails after the delete succeeded, a compensating
    /// re-create of the original is attempted.
    ///
    /// Returns the id of the replacement interval.
    pub async fn commit_relocation<P: StayPersistence>(
        &mut self,
        plan: &RelocationPlan,
        persistence: &P,
    ) -> Result<IntervalId> {
        let original = self
            .store
            .get(plan.interval_id)
            .ok_or(ScheduleError::UnknownInterval(plan.interval_id))?
            .clone();

        let moved = relocated_interval(&original, plan.target);

        // Same checks as create/update, ignoring the interval's own current
        // placement. A conflict here means a concurrent write landed on the
        // target between planning and commit; unit and season violations
        // surface as the validation errors they are.
        match self.validate_placement(&moved, Some(original.id)) {
            Err(ScheduleError::Conflict(_)) => {
                return Err(ScheduleError::StaleTarget {
                    unit_id: plan.target.unit_id,
                    start: plan.target.start,
                });
            }
            other => other?,
        }

        // Phase one: delete the original from its partition. Failure here
        // leaves everything untouched.
        persistence
            .delete(original.id, plan.source_partition)
            .await
            .map_err(box_persistence)?;

        // Phase two: create the replacement on the destination partition.
        match persistence.create(&moved).await {
            Ok(new_id) => {
                self.store.remove(original.id);
                let mut replacement = moved;
                replacement.id = new_id;
                self.store.upsert(replacement);
                debug!(
                    from_unit = original.unit_id,
                    to_unit = plan.target.unit_id,
                    new_id,
                    "relocation committed"
                );
                Ok(new_id)
            }
            Err(create_err) => {
                // Compensate: re-create the original where it was.
                warn!(
                    id = original.id,
                    "relocation create failed, attempting rollback"
                );
                match persistence.create(&original).await {
                    Ok(restored_id) => {
                        self.store.remove(original.id);
                        let mut restored = original;
                        restored.id = restored_id;
                        self.store.upsert(restored);
                        Err(ScheduleError::Persistence(Box::new(create_err)))
                    }
                    Err(rollback_err) => Err(ScheduleError::RelocationRollbackFailed {
                        create: Box::new(create_err),
                        rollback: Box::new(rollback_err),
                    }),
                }
            }
        }
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Structural and invariant checks shared by create and update. `ignore`
    /// is the interval's own id on update, so it never conflicts with itself.
    fn validate_placement(
        &self,
        interval: &StayInterval,
        ignore: Option<IntervalId>,
    ) -> Result<()> {
        if interval.end < interval.start {
            return Err(ValidationError::InvalidDateRange {
                start: interval.start,
                end: interval.end,
            }
            .into());
        }
        if !self.units.iter().any(|u| u.id == interval.unit_id && !u.deleted) {
            return Err(ValidationError::UnknownUnit(interval.unit_id).into());
        }
        if !self.calendar.contains(interval.start) || !self.calendar.contains(interval.end) {
            return Err(ValidationError::OutsideSeason {
                start: interval.start,
                end: interval.end,
            }
            .into());
        }
        if let Some(existing) =
            self.store
                .conflict(interval.unit_id, interval.start, interval.end, ignore)
        {
            let day = existing.start.max(interval.start);
            return Err(ConflictError::Overlap {
                unit_id: interval.unit_id,
                day,
                existing_id: existing.id,
            }
            .into());
        }
        Ok(())
    }
}

fn box_persistence<E: std::error::Error + Send + Sync + 'static>(err: E) -> ScheduleError {
    ScheduleError::Persistence(Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::NoTasks;
    use crate::season::Season;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn engine() -> ScheduleEngine {
        let season = Season::new(2026, date(1), date(31)).unwrap();
        let calendar = SeasonCalendar::new(vec![season]).unwrap();
        let units = vec![
            HousingUnit::new(5, "5", "Meadow", 1),
            HousingUnit::new(7, "7", "Lakeside", 1),
            HousingUnit::new(-1, "T1", "Overflow", 1),
        ];
        ScheduleEngine::new(calendar, units)
    }

    fn interval(id: IntervalId, unit: UnitId, start: u32, end: u32) -> StayInterval {
        StayInterval::try_new(id, unit, date(start), date(end), "Guest").unwrap()
    }

    #[test]
    fn validate_rejects_overlap_with_structured_refusal() {
        let mut engine = engine();
        engine.apply_remote(&ChangeEvent::insert(interval(1, 5, 10, 14)));

        let err = engine
            .validate_placement(&interval(0, 5, 12, 16), None)
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Conflict(ConflictError::Overlap { unit_id: 5, existing_id: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_unit_and_out_of_season() {
        let engine = engine();
        assert!(matches!(
            engine.validate_placement(&interval(0, 99, 10, 12), None),
            Err(ScheduleError::Validation(ValidationError::UnknownUnit(99)))
        ));

        let outside =
            StayInterval::try_new(0, 5, date(30), NaiveDate::from_ymd_opt(2026, 8, 2).unwrap(), "G")
                .unwrap();
        assert!(matches!(
            engine.validate_placement(&outside, None),
            Err(ScheduleError::Validation(ValidationError::OutsideSeason { .. }))
        ));
    }

    #[test]
    fn update_ignores_its_own_placement() {
        let mut engine = engine();
        engine.apply_remote(&ChangeEvent::insert(interval(1, 5, 10, 14)));

        // Extending the same interval by one day conflicts only with itself.
        assert!(engine
            .validate_placement(&interval(1, 5, 10, 15), Some(1))
            .is_ok());
    }

    #[test]
    fn remote_events_feed_projection_and_classification() {
        let mut engine = engine();
        let mut iv = interval(1, 5, 10, 14);
        iv.arrived = true;

        let applied = engine.apply_remote(&ChangeEvent::insert(iv));
        assert!(applied.needs_reprojection());

        let matrix = engine.project();
        assert!(matrix.row_for_unit(5).unwrap().cells[9].is_start);
        assert_eq!(
            engine.classify(5, date(12), &NoTasks),
            OccupancyStatus::Occupied
        );
    }

    #[test]
    fn project_for_type_filters_and_orders() {
        let season = Season::new(2026, date(1), date(31)).unwrap();
        let calendar = SeasonCalendar::new(vec![season]).unwrap();
        let units = vec![
            HousingUnit::new(2, "B2", "", 1),
            HousingUnit::new(1, "A1", "", 1),
            HousingUnit::new(3, "C3", "", 2),
        ];
        let engine = ScheduleEngine::new(calendar, units);

        let matrix = engine.project_for_type(1);
        let numbers: Vec<_> = matrix.rows.iter().map(|r| r.unit.number.clone()).collect();
        assert_eq!(numbers, vec!["A1", "B2"]);
    }

    #[test]
    fn plan_relocation_unknown_interval() {
        let engine = engine();
        assert!(matches!(
            engine.plan_relocation(42, date(1)),
            Err(ScheduleError::UnknownInterval(42))
        ));
    }

    #[test]
    fn begin_selection_respects_mask() {
        let mut engine = engine();
        engine.apply_remote(&ChangeEvent::insert(interval(1, 5, 10, 14)));

        // Day index 9 is 2026-07-10, reserved.
        assert!(engine.begin_selection(5, 9, date(1)).is_none());
        assert!(engine.begin_selection(5, 4, date(1)).is_some());
        // Past days blocked.
        assert!(engine.begin_selection(5, 4, date(8)).is_none());
    }
}
