//! Stay interval (reservation) types and day-range arithmetic.
//!
//! A stay interval is an inclusive date range on one housing unit. Both ends
//! are inclusive, so a single-day stay has `start == end`. All scheduling
//! math in the engine is day-level; times of day are display metadata only.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::housing::UnitId;

/// Identifier for a stay interval, assigned by the persistence backend.
pub type IntervalId = i64;

/// Pet headcount by subtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetCounts {
    #[serde(default)]
    pub dogs: u32,
    #[serde(default)]
    pub cats: u32,
    #[serde(default)]
    pub other: u32,
}

impl PetCounts {
    pub fn total(&self) -> u32 {
        self.dogs + self.cats + self.other
    }
}

/// Display color pair for a reservation block. Values are CSS-style color
/// strings; the engine never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tint {
    pub fill: String,
    pub text: String,
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            fill: "#4a7fb5".to_string(),
            text: "#ffffff".to_string(),
        }
    }
}

/// A reservation: an inclusive date range on one housing unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayInterval {
    pub id: IntervalId,
    pub unit_id: UnitId,
    /// First occupied day (inclusive).
    pub start: NaiveDate,
    /// Last occupied day (inclusive). `start == end` is a valid single-day stay.
    pub end: NaiveDate,
    pub guest_name: String,
    pub reference_code: String,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub pets: PetCounts,
    #[serde(default)]
    pub cribs: u32,
    /// Whether the guest has physically checked in.
    #[serde(default)]
    pub arrived: bool,
    /// Whether the guest has physically checked out.
    #[serde(default)]
    pub departed: bool,
    pub arrival_time: Option<NaiveTime>,
    pub departure_time: Option<NaiveTime>,
    #[serde(default)]
    pub tint: Tint,
    pub note: Option<String>,
    /// Visual continuity hint: the previous booking on this unit belongs to
    /// the same guest.
    #[serde(default)]
    pub connected_prev: bool,
    /// Visual continuity hint: the next booking on this unit belongs to the
    /// same guest.
    #[serde(default)]
    pub connected_next: bool,
    pub updated_at: DateTime<Utc>,
}

impl StayInterval {
    /// Create a new interval with structural validation.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidDateRange` if `end < start`.
    pub fn try_new(
        id: IntervalId,
        unit_id: UnitId,
        start: NaiveDate,
        end: NaiveDate,
        guest_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self {
            id,
            unit_id,
            start,
            end,
            guest_name: guest_name.into(),
            reference_code: String::new(),
            adults: 0,
            children: 0,
            pets: PetCounts::default(),
            cribs: 0,
            arrived: false,
            departed: false,
            arrival_time: None,
            departure_time: None,
            tint: Tint::default(),
            note: None,
            connected_prev: false,
            connected_next: false,
            updated_at: Utc::now(),
        })
    }

    /// Number of calendar days covered, inclusive of both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Number of nights, one less than the day count. A single-day stay has
    /// zero nights.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The inclusive occupied range as (start, end).
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Whether `day` falls inside the occupied range.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Iterate over every occupied calendar day in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let len = self.len_days();
        (0..len).map(move |offset| self.start + Duration::days(offset))
    }

    /// Whether this interval shares at least one calendar day with another.
    /// Unit ids are not compared; the caller decides whether that matters.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Set the reference code.
    pub fn with_reference(mut self, code: impl Into<String>) -> Self {
        self.reference_code = code.into();
        self
    }

    /// Set occupant counts.
    pub fn with_occupants(mut self, adults: u32, children: u32) -> Self {
        self.adults = adults;
        self.children = children;
        self
    }

    /// Set the display tint.
    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = tint;
        self
    }

    /// Set the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
