//! Core ingest services

pub mod characteristic_sync;
pub mod fingerprint;
pub mod hierarchy_resolver;
pub mod value_decoder;

pub use characteristic_sync::CharacteristicSynchronizer;
pub use fingerprint::{fingerprint, Fingerprint};
pub use hierarchy_resolver::HierarchyResolver;
pub use value_decoder::{decode_characteristic, decode_value, CharacteristicValue};
