//! Persistence port for closed sessions.

use crate::error::StoreError;
use crate::stats::Session;

/// Append-only, month-partitioned session history.
///
/// `partition` is the `YYYY-MM` of the session start. Implementations never
/// rewrite a historical partition -- closed sessions are only appended to
/// the partition they belong to. `load` merges all partitions; order within
/// a partition is insertion order, with no ordering guarantee across
/// partitions beyond partition sort.
pub trait SessionStore {
    /// Append a closed session under its partition.
    fn append(&self, session: &Session, partition: &str) -> Result<(), StoreError>;

    /// Load all partitions into one sequence.
    fn load(&self) -> Result<Vec<Session>, StoreError>;
}
