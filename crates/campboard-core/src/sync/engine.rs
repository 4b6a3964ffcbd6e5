//! Applies inbound change events to the interval store.
//!
//! Last-writer-wins at the record level: an UPDATE replaces the local record
//! unconditionally. This is a deliberate simplification -- there are no
//! version stamps or vector clocks, so two staff editing the same interval
//! race, and the later event wins. The engine logs a warning when an inbound
//! update replaces a locally newer record so the race is at least visible.

use tracing::{debug, warn};

use crate::store::IntervalStore;
use crate::sync::types::{ChangeEvent, ChangeOp};

/// Outcome of applying one change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// INSERT applied; the record is new locally.
    Inserted,
    /// UPDATE applied; the local record was replaced.
    Replaced,
    /// DELETE applied; the local record was removed.
    Removed,
    /// INSERT for an id that already exists locally, usually the echo of a
    /// locally originated create. Skipped to avoid double-apply.
    SkippedExisting,
    /// DELETE for an id that is already absent. Safe no-op.
    SkippedAbsent,
    /// UPDATE for a record with no post-image in the event. Dropped.
    Rejected,
}

impl Applied {
    /// Whether the store changed and the grid must be re-projected. The
    /// projection is pure and cheap, so consumers recompute it wholesale
    /// rather than patching incrementally.
    pub fn needs_reprojection(&self) -> bool {
        matches!(self, Self::Inserted | Self::Replaced | Self::Removed)
    }
}

/// Merges the remote change stream into the local authoritative cache.
///
/// Events for the same id must be fed in the order received; ordering across
/// different ids does not matter since each id's state is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply one event. Idempotent: re-applying an INSERT or a DELETE leaves
    /// the store unchanged.
    pub fn apply(&self, store: &mut IntervalStore, event: &ChangeEvent) -> Applied {
        match event.op {
            ChangeOp::Insert => {
                if store.contains(event.id) {
                    debug!(id = event.id, "skipping insert echo for existing interval");
                    return Applied::SkippedExisting;
                }
                match &event.post_image {
                    Some(interval) => {
                        store.upsert(interval.clone());
                        debug!(id = event.id, "applied remote insert");
                        Applied::Inserted
                    }
                    None => {
                        warn!(id = event.id, "insert event without post-image dropped");
                        Applied::Rejected
                    }
                }
            }

            ChangeOp::Update => match &event.post_image {
                Some(interval) => {
                    if let Some(local) = store.get(event.id) {
                        if local.updated_at > interval.updated_at {
                            warn!(
                                id = event.id,
                                "remote update replaces a locally newer record (last-writer-wins)"
                            );
                        }
                    }
                    store.upsert(interval.clone());
                    debug!(id = event.id, "applied remote update");
                    Applied::Replaced
                }
                None => {
                    warn!(id = event.id, "update event without post-image dropped");
                    Applied::Rejected
                }
            },

            ChangeOp::Delete => {
                if store.remove(event.id).is_some() {
                    debug!(id = event.id, "applied remote delete");
                    Applied::Removed
                } else {
                    debug!(id = event.id, "delete for absent interval, no-op");
                    Applied::SkippedAbsent
                }
            }
        }
    }
}
