//! Grid projection: intervals to a renderable occupancy matrix.
//!
//! The projector turns the interval set into a unit-by-day cell matrix with
//! per-cell classification and display metadata. It is a pure function of its
//! inputs and cheap enough to recompute wholesale after every mutation or
//! remote event, so nothing is patched incrementally.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::housing::{HousingUnit, UnitId};
use crate::interval::{IntervalId, PetCounts, StayInterval};
use crate::store::IntervalStore;

/// Hover/tooltip metadata for a reserved cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipFields {
    pub guest_name: String,
    pub reference_code: String,
    pub adults: u32,
    pub children: u32,
    pub pets: PetCounts,
    pub cribs: u32,
    pub arrival_time: Option<NaiveTime>,
    pub departure_time: Option<NaiveTime>,
    pub note: Option<String>,
}

impl TooltipFields {
    fn from_interval(interval: &StayInterval) -> Self {
        Self {
            guest_name: interval.guest_name.clone(),
            reference_code: interval.reference_code.clone(),
            adults: interval.adults,
            children: interval.children,
            pets: interval.pets,
            cribs: interval.cribs,
            arrival_time: interval.arrival_time,
            departure_time: interval.departure_time,
            note: interval.note.clone(),
        }
    }
}

/// One cell of the projected matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    /// Id of the occupying interval, when reserved.
    pub interval_id: Option<IntervalId>,
    pub is_reserved: bool,
    pub is_start: bool,
    pub is_middle: bool,
    pub is_end: bool,
    /// Text drawn in the cell: guest label on the start cell, reference code
    /// on the second cell of a 2+ day stay, empty otherwise.
    pub display_text: String,
    pub fill_color: Option<String>,
    pub text_color: Option<String>,
    pub tooltip: Option<TooltipFields>,
}

/// One projected row: a unit and its cells, aligned with the day sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRow {
    pub unit: HousingUnit,
    pub cells: Vec<CellData>,
}

/// The full projected matrix for one season window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMatrix {
    pub days: Vec<NaiveDate>,
    pub rows: Vec<GridRow>,
}

impl GridMatrix {
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellData> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn row_for_unit(&self, unit: UnitId) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.unit.id == unit)
    }
}

/// Projects the interval set onto a unit-by-day cell matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridProjector;

impl GridProjector {
    pub fn new() -> Self {
        Self
    }

    /// Project `units` x `days` against the store.
    ///
    /// The (unit, day) index is built by stamping each interval's days, so
    /// the cost is O(total reserved days) plus the matrix fill, independent
    /// of how intervals and days interleave.
    pub fn project(
        &self,
        units: &[HousingUnit],
        days: &[NaiveDate],
        store: &IntervalStore,
    ) -> GridMatrix {
        let mut index: HashMap<(UnitId, NaiveDate), &StayInterval> = HashMap::new();
        for interval in store.iter() {
            for day in interval.days() {
                index.insert((interval.unit_id, day), interval);
            }
        }

        let rows = units
            .iter()
            .map(|unit| GridRow {
                unit: unit.clone(),
                cells: days
                    .iter()
                    .map(|&day| match index.get(&(unit.id, day)) {
                        Some(interval) => Self::reserved_cell(interval, day),
                        None => CellData::default(),
                    })
                    .collect(),
            })
            .collect();

        GridMatrix {
            days: days.to_vec(),
            rows,
        }
    }

    fn reserved_cell(interval: &StayInterval, day: NaiveDate) -> CellData {
        // Day-level equality: a single-day stay is start and end at once,
        // never middle.
        let is_start = day == interval.start;
        let is_end = day == interval.end;
        let is_middle = !is_start && !is_end;

        let display_text = if is_start {
            interval.guest_name.clone()
        } else if day == interval.start + chrono::Duration::days(1) && interval.len_days() >= 2 {
            interval.reference_code.clone()
        } else {
            String::new()
        };

        CellData {
            interval_id: Some(interval.id),
            is_reserved: true,
            is_start,
            is_middle,
            is_end,
            display_text,
            fill_color: Some(interval.tint.fill.clone()),
            text_color: Some(interval.tint.text.clone()),
            tooltip: Some(TooltipFields::from_interval(interval)),
        }
    }
}
