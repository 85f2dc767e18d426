//! Store operations for ingest tables
//!
//! Free functions over the shared pool, one module per table.

pub mod characteristics;
pub mod documents;
pub mod hierarchy;
pub mod products;
pub mod sections;
