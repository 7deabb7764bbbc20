//! Critical error ledger interface.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::ledger::QueryOptions;
use crate::types::CriticalErrorEntry;

/// Append-only anomaly store. Entries are never deleted; the only
/// mutation is marking resolution.
#[async_trait]
pub trait CriticalErrorLedger: Send + Sync {
    async fn append(&self, entry: &CriticalErrorEntry) -> StoreResult<()>;

    async fn find(&self, entry_id: &str) -> StoreResult<Option<CriticalErrorEntry>>;

    async fn list_unresolved(&self, options: QueryOptions)
        -> StoreResult<Vec<CriticalErrorEntry>>;

    /// Mark an entry resolved, recording who resolved it and what was
    /// done. Returns the updated entry.
    async fn resolve(
        &self,
        entry_id: &str,
        resolved_by: &str,
        action: &str,
    ) -> StoreResult<CriticalErrorEntry>;
}
