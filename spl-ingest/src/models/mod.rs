//! Ingest-side models: the parsed source element tree and call outcomes

pub mod element;
pub mod outcome;

pub use element::Element;
pub use outcome::{CharacteristicOutcome, HierarchyOutcome};
