//! Reconciliation of concurrent remote edits into the local cache.
//!
//! Other staff edit the same season at the same time; their creates, updates
//! and deletes arrive as an ordered-per-id change-event stream. This module
//! merges those events into the [`IntervalStore`](crate::store::IntervalStore)
//! idempotently, without clobbering local state that was never touched.

pub mod engine;
pub mod types;

pub use engine::{Applied, ReconciliationEngine};
pub use types::{decode_change_event, ChangeEvent, ChangeOp, SyncError};
