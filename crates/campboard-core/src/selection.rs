//! Drag-gesture reduction for new-interval date ranges.
//!
//! A drag starts on one cell of a unit row and extends along that row. The
//! reducer clamps the range so it never crosses a day that already has a
//! reservation or lies in the past: when a drag would cross such a boundary
//! the end freezes at the last valid index instead of rejecting the gesture.
//! Aborting the gesture (dropping the reducer) has zero side effects; nothing
//! is written until release.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::housing::UnitId;
use crate::store::IntervalStore;

/// A resolved, clamped selection: inclusive day indices into the season's
/// day sequence, on one unit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub unit_id: UnitId,
    pub start_index: usize,
    pub end_index: usize,
}

impl SelectionRange {
    /// Number of days selected; at least 1, since both ends are inclusive.
    pub fn day_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// In-flight drag gesture on one unit row.
///
/// Caller-driven: the rendering layer feeds `extend` with raw day indices as
/// the pointer moves and calls `release` on pointer-up. The reducer holds no
/// reference to shared state; the blocked mask is captured at `begin`.
#[derive(Debug, Clone)]
pub struct SelectionReducer {
    unit_id: UnitId,
    /// Per-day-index validity captured when the gesture began. Blocked days
    /// are reserved days and past days.
    blocked: Vec<bool>,
    anchor: usize,
    end: usize,
    /// Whether any extend call validly moved the end off the anchor.
    dragged: bool,
}

impl SelectionReducer {
    /// Begin a gesture at `day_index` on `unit`.
    ///
    /// Returns `None` when the anchor itself is blocked or out of range: the
    /// gesture never starts.
    pub fn begin(unit: UnitId, day_index: usize, blocked: Vec<bool>) -> Option<Self> {
        if day_index >= blocked.len() || blocked[day_index] {
            return None;
        }
        Some(Self {
            unit_id: unit,
            blocked,
            anchor: day_index,
            end: day_index,
            dragged: false,
        })
    }

    pub fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    /// Current clamped range, anchor-inclusive, ends normalized.
    pub fn current(&self) -> (usize, usize) {
        if self.end >= self.anchor {
            (self.anchor, self.end)
        } else {
            (self.end, self.anchor)
        }
    }

    /// Extend the gesture toward `day_index`, clamping at the first blocked
    /// day between the anchor and the requested index.
    pub fn extend(&mut self, day_index: usize) {
        let requested = day_index.min(self.blocked.len().saturating_sub(1));
        let clamped = if requested >= self.anchor {
            // Walk forward from the anchor, freeze before the first block.
            let mut end = self.anchor;
            for idx in self.anchor + 1..=requested {
                if self.blocked[idx] {
                    break;
                }
                end = idx;
            }
            end
        } else {
            // Walk backward from the anchor.
            let mut end = self.anchor;
            for idx in (requested..self.anchor).rev() {
                if self.blocked[idx] {
                    break;
                }
                end = idx;
            }
            end
        };

        if clamped != self.anchor {
            self.dragged = true;
        }
        self.end = clamped;
    }

    /// Finish the gesture.
    ///
    /// Returns `None` when the range collapsed to the original single cell
    /// without ever being dragged validly; the caller treats that as a no-op.
    pub fn release(self) -> Option<SelectionRange> {
        if !self.dragged && self.end == self.anchor {
            return None;
        }
        let (start_index, end_index) = self.current();
        Some(SelectionRange {
            unit_id: self.unit_id,
            start_index,
            end_index,
        })
    }
}

/// Derive the blocked mask for a unit row: a day is blocked when it already
/// has a reservation or lies before `today`.
pub fn blocked_days(
    unit: UnitId,
    days: &[NaiveDate],
    today: NaiveDate,
    store: &IntervalStore,
) -> Vec<bool> {
    days.iter()
        .map(|&day| day < today || store.by_unit_and_day(unit, day).is_some())
        .collect()
}
