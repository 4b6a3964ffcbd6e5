//! Housing unit types.
//!
//! A housing unit is a bookable accommodation: a pitch, cabin, or mobile
//! home. Overflow (temporary) capacity uses negative ids and lives in a
//! separate persistence partition, but shares all scheduling rules.

use serde::{Deserialize, Serialize};

/// Identifier for a housing unit. Negative ids denote overflow capacity.
pub type UnitId = i64;

/// Persistence partition a unit belongs to.
///
/// Regular and overflow units are persisted separately, which is why a
/// relocation across the boundary is a delete-then-create rather than an
/// in-place update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Regular,
    Overflow,
}

impl Partition {
    /// Derive the partition from a unit id.
    pub fn of(unit_id: UnitId) -> Self {
        if unit_id < 0 {
            Self::Overflow
        } else {
            Self::Regular
        }
    }
}

/// A bookable housing unit.
///
/// Identity is immutable once created; removal is a soft delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingUnit {
    pub id: UnitId,
    /// Display number, e.g. "12" or "A3".
    pub number: String,
    pub name: String,
    pub unit_type_id: i64,
    #[serde(default)]
    pub deleted: bool,
}

impl HousingUnit {
    pub fn new(id: UnitId, number: impl Into<String>, name: impl Into<String>, unit_type_id: i64) -> Self {
        Self {
            id,
            number: number.into(),
            name: name.into(),
            unit_type_id,
            deleted: false,
        }
    }

    pub fn is_overflow(&self) -> bool {
        self.id < 0
    }

    pub fn partition(&self) -> Partition {
        Partition::of(self.id)
    }

    /// Full identifying label shown on reservation start cells.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.number.clone()
        } else {
            format!("{} {}", self.number, self.name)
        }
    }
}
