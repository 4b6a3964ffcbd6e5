//! Season calendar: the bounded date windows eligible for scheduling.
//!
//! Seasons are contiguous, non-overlapping, and ordered by year. Navigation
//! moves one season at a time and is disabled past the first and last.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One scheduling season: an inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Season {
    pub fn new(year: i32, start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { year, start, end })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Ordered sequence of every day in the window, inclusive.
    pub fn day_sequence(&self) -> Vec<NaiveDate> {
        let len = (self.end - self.start).num_days() + 1;
        (0..len).map(|offset| self.start + Duration::days(offset)).collect()
    }
}

/// Ordered list of seasons with an active cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonCalendar {
    seasons: Vec<Season>,
    active: usize,
}

impl SeasonCalendar {
    /// Build a calendar from a season list.
    ///
    /// The list is sorted by year; it must be non-empty, strictly ordered,
    /// and non-overlapping. The first season becomes active.
    ///
    /// # Errors
    /// `EmptySeasonList` if no seasons are given, `MalformedSeasonList` if
    /// two seasons share a year or their windows overlap.
    pub fn new(mut seasons: Vec<Season>) -> Result<Self, ValidationError> {
        if seasons.is_empty() {
            return Err(ValidationError::EmptySeasonList);
        }
        seasons.sort_by_key(|s| s.year);
        for pair in seasons.windows(2) {
            if pair[0].year == pair[1].year || pair[0].end >= pair[1].start {
                return Err(ValidationError::MalformedSeasonList { year: pair[1].year });
            }
        }
        Ok(Self { seasons, active: 0 })
    }

    /// Build a calendar and activate the season containing `day`, falling
    /// back to the first season when none contains it.
    pub fn new_active_at(seasons: Vec<Season>, day: NaiveDate) -> Result<Self, ValidationError> {
        let mut calendar = Self::new(seasons)?;
        if let Some(idx) = calendar.seasons.iter().position(|s| s.contains(day)) {
            calendar.active = idx;
        }
        Ok(calendar)
    }

    pub fn active(&self) -> &Season {
        &self.seasons[self.active]
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Ordered day sequence for the active season window.
    pub fn day_sequence(&self) -> Vec<NaiveDate> {
        self.active().day_sequence()
    }

    pub fn can_go_prev(&self) -> bool {
        self.active > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.active + 1 < self.seasons.len()
    }

    /// Move to the previous season. Returns false at the first season.
    pub fn go_prev(&mut self) -> bool {
        if self.can_go_prev() {
            self.active -= 1;
            true
        } else {
            false
        }
    }

    /// Move to the next season. Returns false at the last season.
    pub fn go_next(&mut self) -> bool {
        if self.can_go_next() {
            self.active += 1;
            true
        } else {
            false
        }
    }

    /// Find the season containing `day`, if any.
    pub fn season_for(&self, day: NaiveDate) -> Option<&Season> {
        self.seasons.iter().find(|s| s.contains(day))
    }

    /// Whether any season window contains `day`.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.season_for(day).is_some()
    }
}
