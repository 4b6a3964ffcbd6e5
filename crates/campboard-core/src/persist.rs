//! Persistence boundary contract.
//!
//! The engine never performs I/O itself; the embedding application supplies
//! an implementation of [`StayPersistence`]. All calls are asynchronous
//! round-trips and may fail; failures surface to the caller unchanged and are
//! never silently retried. The local cache is mutated only after a call
//! confirms success.

use crate::housing::Partition;
use crate::interval::{IntervalId, StayInterval};
use crate::season::Season;

/// Asynchronous persistence collaborator for stay intervals.
///
/// Regular and overflow units live in different partitions; `delete` receives
/// the partition so the backend can route the call. `create` returns the
/// backend-assigned id (the interval's own id field is provisional on create).
pub trait StayPersistence {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create(
        &self,
        interval: &StayInterval,
    ) -> impl std::future::Future<Output = Result<IntervalId, Self::Error>> + Send;

    fn update(
        &self,
        interval: &StayInterval,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;

    fn delete(
        &self,
        id: IntervalId,
        partition: Partition,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;

    /// Load every interval whose range touches the season window.
    fn list(
        &self,
        window: &Season,
    ) -> impl std::future::Future<Output = Result<Vec<StayInterval>, Self::Error>> + Send;
}
