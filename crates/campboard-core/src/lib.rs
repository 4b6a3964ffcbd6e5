//! # Campboard Core Library
//!
//! This library provides the reservation scheduling and occupancy engine for
//! the Campboard campsite manager. It is a library-level core: the embedding
//! application owns all presentation (forms, charts, export, map rendering)
//! and all persistence I/O, and talks to this engine through plain calls and
//! boundary traits.
//!
//! ## Architecture
//!
//! - **IntervalStore**: in-memory authoritative cache of stay intervals with
//!   lookup indices; the single shared mutable structure per session
//! - **GridProjector**: pure projection of the interval set onto a
//!   unit-by-day cell matrix for rendering
//! - **OccupancyClassifier**: live per-unit status derived from today's
//!   intervals, arrival/departure flags, and the task-signal collaborator
//! - **RelocationPlanner / SelectionReducer**: gap search and drag-gesture
//!   reduction for moving and creating reservations
//! - **ReconciliationEngine**: idempotent merge of concurrent remote edits
//!   into the cache
//! - **ScheduleEngine**: the per-session root that owns the store and wires
//!   validation, persistence ordering, and two-phase relocation together
//!
//! ## Key Components
//!
//! - [`ScheduleEngine`]: session root, one instance per season-editing session
//! - [`IntervalStore`]: the interval cache
//! - [`StayPersistence`]: async boundary trait for create/update/delete/list
//! - [`TaskSignal`]: read-only boundary trait for cleaning-task state

pub mod engine;
pub mod error;
pub mod grid;
pub mod housing;
pub mod interval;
pub mod occupancy;
pub mod persist;
pub mod relocation;
pub mod season;
pub mod selection;
pub mod store;
pub mod sync;

pub use engine::ScheduleEngine;
pub use error::{ConflictError, Result, ScheduleError, ValidationError};
pub use grid::{CellData, GridMatrix, GridProjector, GridRow, TooltipFields};
pub use housing::{HousingUnit, Partition, UnitId};
pub use interval::{IntervalId, PetCounts, StayInterval, Tint};
pub use occupancy::{NoTasks, OccupancyClassifier, OccupancyStatus, TaskSignal};
pub use persist::StayPersistence;
pub use relocation::{RelocationPlan, RelocationPlanner, RelocationTarget};
pub use season::{Season, SeasonCalendar};
pub use selection::{blocked_days, SelectionRange, SelectionReducer};
pub use store::IntervalStore;
pub use sync::{decode_change_event, Applied, ChangeEvent, ChangeOp, ReconciliationEngine, SyncError};
