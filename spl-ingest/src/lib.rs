//! # SPL Ingest Library
//!
//! Materializes a structured product labeling document as a normalized
//! graph of persisted records:
//! - Section hierarchy edges, synchronized idempotently by the
//!   [`HierarchyResolver`]
//! - Typed characteristic records, deduplicated by fingerprint and
//!   persisted by the [`CharacteristicSynchronizer`]
//!
//! Both run under an Incremental (per-node) or Batch (bulk-query)
//! strategy selected through the [`IngestContext`]; the strategies
//! produce equivalent persisted state.

pub mod context;
pub mod db;
pub mod models;
pub mod parser;
pub mod services;

pub use context::IngestContext;
pub use models::{CharacteristicOutcome, Element, HierarchyOutcome};
pub use parser::SectionContentParser;
pub use services::{CharacteristicSynchronizer, HierarchyResolver};
