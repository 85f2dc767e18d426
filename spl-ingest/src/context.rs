//! Cross-cutting ingest state
//!
//! One context per document pass, threaded explicitly through every
//! collaborator. There is no ambient mutable state: the current parent
//! scope always travels as an argument next to the context.

use spl_common::SyncStrategy;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Shared state for one document ingest pass
#[derive(Clone)]
pub struct IngestContext {
    /// Store handle shared by all nested collaborators
    pub db: SqlitePool,
    /// Persisted id of the document being ingested
    pub document_id: i64,
    /// Correlates log lines across one ingest pass
    pub session_id: Uuid,
    /// Strategy used by the resolver and the synchronizer
    pub strategy: SyncStrategy,
}

impl IngestContext {
    pub fn new(db: SqlitePool, document_id: i64, strategy: SyncStrategy) -> Self {
        Self {
            db,
            document_id,
            session_id: Uuid::new_v4(),
            strategy,
        }
    }

    /// Same pass, different strategy. Used when a caller wants to force
    /// one subtree through the other execution path.
    pub fn with_strategy(&self, strategy: SyncStrategy) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }
}
