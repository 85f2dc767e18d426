//! Dedup fingerprint computation
//!
//! Two characteristic records are duplicates iff their fingerprints are
//! equal. The key covers exactly the twelve significant value fields;
//! absent values normalize to the empty sentinel, so an omitted field
//! and an explicitly empty one compare equal. Coded code system, coded
//! display name, and an interval's high bound stay outside the key.

use spl_common::db::models::Characteristic;

/// Canonical fingerprint over a characteristic's significant fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    code: String,
    value_type: String,
    coded_code: String,
    string_value: String,
    quantity_value: String,
    quantity_unit: String,
    integer_value: String,
    boolean_value: String,
    media_type: String,
    media_content: String,
    null_flavor: String,
    original_text: String,
}

impl Fingerprint {
    /// Pipe-joined canonical form, for diagnostics
    pub fn canonical(&self) -> String {
        [
            self.code.as_str(),
            self.value_type.as_str(),
            self.coded_code.as_str(),
            self.string_value.as_str(),
            self.quantity_value.as_str(),
            self.quantity_unit.as_str(),
            self.integer_value.as_str(),
            self.boolean_value.as_str(),
            self.media_type.as_str(),
            self.media_content.as_str(),
            self.null_flavor.as_str(),
            self.original_text.as_str(),
        ]
        .join("|")
    }
}

/// Compute the fingerprint of a decoded or persisted record
pub fn fingerprint(record: &Characteristic) -> Fingerprint {
    Fingerprint {
        code: text(&record.code),
        value_type: text(&record.value_type),
        coded_code: text(&record.coded_code),
        string_value: text(&record.string_value),
        quantity_value: decimal(record.quantity_value),
        quantity_unit: text(&record.quantity_unit),
        integer_value: record
            .integer_value
            .map(|v| v.to_string())
            .unwrap_or_default(),
        boolean_value: record
            .boolean_value
            .map(|v| v.to_string())
            .unwrap_or_default(),
        media_type: text(&record.media_type),
        media_content: text(&record.media_content),
        null_flavor: text(&record.null_flavor),
        original_text: text(&record.original_text),
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn decimal(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
