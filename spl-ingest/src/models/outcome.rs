//! Outcome reports returned by the resolver and the synchronizer
//!
//! Failures surface here as collected messages rather than propagated
//! errors, so one failing subtree or product never aborts its siblings.
//! Callers decide whether a non-empty error list is pipeline-fatal.

use serde::Serialize;

/// Result of one `resolve_hierarchy` call
#[derive(Debug, Clone, Default, Serialize)]
pub struct HierarchyOutcome {
    /// Edges created by this call
    pub edges_created: usize,
    /// Children skipped because their resolution failed
    pub children_failed: usize,
    /// Human-readable failure messages, in encounter order
    pub errors: Vec<String>,
}

impl HierarchyOutcome {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of one `synchronize` call
#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacteristicOutcome {
    /// Records persisted by this call
    pub records_created: usize,
    /// Records skipped as exact duplicates within their scope
    pub records_skipped: usize,
    /// Human-readable failure messages, in encounter order
    pub errors: Vec<String>,
}

impl CharacteristicOutcome {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}
