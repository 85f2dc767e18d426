//! Store row models
//!
//! Ids are store-assigned rowids, absent until the row is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Labeling document header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Option<i64>,
    pub guid: Uuid,
    pub title: Option<String>,
    pub effective_time: Option<NaiveDate>,
}

/// Document section node
///
/// Created by the content parser through the upsert primitive; the
/// hierarchy resolver references sections but never creates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: Option<i64>,
    pub document_id: i64,
    /// Document-scoped stable identifier taken from the source element
    pub natural_key: String,
    pub title: Option<String>,
    pub code: Option<String>,
    pub code_system: Option<String>,
    /// A point effective time populates only the low bound
    pub effective_time_low: Option<NaiveDate>,
    pub effective_time_high: Option<NaiveDate>,
}

/// Parent to child section relation carrying an order index
///
/// The (parent, child) pair is unique and an edge is immutable once
/// created. Exclusively written by the hierarchy resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHierarchy {
    pub id: Option<i64>,
    pub parent_section_id: i64,
    pub child_section_id: i64,
    /// 1-based, dense, strictly increasing per parent in creation order
    pub sequence_number: i64,
}

/// Product referenced as a characteristic scope owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<i64>,
    pub document_id: i64,
    pub name: Option<String>,
}

/// Packaging level within a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingLevel {
    pub id: Option<i64>,
    pub product_id: i64,
    pub package_code: Option<String>,
    pub package_code_system: Option<String>,
}

/// Typed attribute record attached to a product or packaging level
///
/// `packaging_level_id` absent means product-level scope. Which value
/// fields populate depends on `value_type`; an interval's low bound
/// shares the quantity fields and its high bound uses the high fields.
/// Records are created once per unique fingerprint and never updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Characteristic {
    pub id: Option<i64>,
    pub product_id: i64,
    pub packaging_level_id: Option<i64>,
    pub code: Option<String>,
    pub code_system: Option<String>,
    /// Normalized (uppercase) type discriminator from the source element
    pub value_type: Option<String>,
    pub quantity_value: Option<f64>,
    pub quantity_unit: Option<String>,
    pub high_value: Option<f64>,
    pub high_unit: Option<String>,
    pub integer_value: Option<i64>,
    pub coded_code: Option<String>,
    pub coded_code_system: Option<String>,
    pub coded_display_name: Option<String>,
    pub string_value: Option<String>,
    pub boolean_value: Option<bool>,
    pub media_type: Option<String>,
    pub media_content: Option<String>,
    pub null_flavor: Option<String>,
    pub original_text: Option<String>,
}
