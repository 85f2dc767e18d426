//! Typed characteristic value decoding
//!
//! A characteristic's `<value>` element carries a type discriminator
//! that selects which fields of the record populate. Decoding is pure
//! and never fails: malformed numeric or boolean tokens decode to
//! absence with a diagnostic, and absent fields stay `None` so the
//! dedup fingerprint never conflates "omitted" with "blank".

use crate::models::Element;
use spl_common::db::models::Characteristic;

/// One decoded value variant per recognized discriminator
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicValue {
    /// PQ, REAL: decimal magnitude plus unit
    Quantity {
        value: Option<f64>,
        unit: Option<String>,
    },
    /// INT: integer magnitude (a null flavor may stand in for it)
    Integer { value: Option<i64> },
    /// IVL_PQ: low and high bounds, each independently optional
    Interval {
        low_value: Option<f64>,
        low_unit: Option<String>,
        high_value: Option<f64>,
        high_unit: Option<String>,
    },
    /// CE, CV, CO: coded concept
    Coded {
        code: Option<String>,
        code_system: Option<String>,
        display_name: Option<String>,
    },
    /// ST: free text, with the same code attributes as coded values
    Text {
        code: Option<String>,
        code_system: Option<String>,
        value: Option<String>,
    },
    /// ED: media type plus a display-name-as-filename field
    EncodedMedia {
        media_type: Option<String>,
        content: Option<String>,
    },
    /// BL: boolean from the source lexicon
    Boolean { value: Option<bool> },
    /// Unrecognized or absent discriminator: no value fields populate
    Unspecified,
}

/// Decode one `<characteristic>` container into an unscoped record.
///
/// Scope fields (product, packaging level) are assigned by the
/// synchronizer before persistence.
pub fn decode_characteristic(element: &Element) -> Characteristic {
    let mut record = Characteristic::default();

    if let Some(code) = element.child("code") {
        record.code = code.attr("code").map(str::to_string);
        record.code_system = code.attr("codeSystem").map(str::to_string);
    }

    let Some(value) = element.child("value") else {
        return record;
    };

    record.value_type = value.type_discriminator().map(|t| t.to_ascii_uppercase());
    record.null_flavor = value.attr("nullFlavor").map(str::to_string);
    record.original_text = value
        .child("originalText")
        .and_then(|t| t.text_content())
        .map(str::to_string);

    match decode_value(value) {
        CharacteristicValue::Quantity { value, unit } => {
            record.quantity_value = value;
            record.quantity_unit = unit;
        }
        CharacteristicValue::Integer { value } => {
            record.integer_value = value;
        }
        CharacteristicValue::Interval {
            low_value,
            low_unit,
            high_value,
            high_unit,
        } => {
            record.quantity_value = low_value;
            record.quantity_unit = low_unit;
            record.high_value = high_value;
            record.high_unit = high_unit;
        }
        CharacteristicValue::Coded {
            code,
            code_system,
            display_name,
        } => {
            record.coded_code = code;
            record.coded_code_system = code_system;
            record.coded_display_name = display_name;
        }
        CharacteristicValue::Text {
            code,
            code_system,
            value,
        } => {
            record.coded_code = code;
            record.coded_code_system = code_system;
            record.string_value = value;
        }
        CharacteristicValue::EncodedMedia {
            media_type,
            content,
        } => {
            record.media_type = media_type;
            record.media_content = content;
        }
        CharacteristicValue::Boolean { value } => {
            record.boolean_value = value;
        }
        CharacteristicValue::Unspecified => {}
    }

    record
}

/// Decode a `<value>` element into its variant (case-insensitive
/// discriminator)
pub fn decode_value(value: &Element) -> CharacteristicValue {
    let discriminator = value.type_discriminator().map(|t| t.to_ascii_uppercase());

    match discriminator.as_deref() {
        Some("PQ") | Some("REAL") => CharacteristicValue::Quantity {
            value: value.attr("value").and_then(parse_decimal),
            unit: value.attr("unit").map(str::to_string),
        },
        Some("INT") => CharacteristicValue::Integer {
            value: value.attr("value").and_then(parse_integer),
        },
        Some("IVL_PQ") => {
            let (low_value, low_unit) = decode_bound(value.child("low"));
            let (high_value, high_unit) = decode_bound(value.child("high"));
            CharacteristicValue::Interval {
                low_value,
                low_unit,
                high_value,
                high_unit,
            }
        }
        Some("CE") | Some("CV") | Some("CO") => CharacteristicValue::Coded {
            code: value.attr("code").map(str::to_string),
            code_system: value.attr("codeSystem").map(str::to_string),
            display_name: value.attr("displayName").map(str::to_string),
        },
        Some("ST") => CharacteristicValue::Text {
            code: value.attr("code").map(str::to_string),
            code_system: value.attr("codeSystem").map(str::to_string),
            value: value.text_content().map(str::to_string),
        },
        Some("ED") => CharacteristicValue::EncodedMedia {
            media_type: value.attr("mediaType").map(str::to_string),
            content: value
                .attr("displayName")
                .map(str::to_string)
                .or_else(|| value.text_content().map(str::to_string)),
        },
        Some("BL") => CharacteristicValue::Boolean {
            value: value.attr("value").and_then(parse_boolean),
        },
        _ => CharacteristicValue::Unspecified,
    }
}

fn decode_bound(element: Option<&Element>) -> (Option<f64>, Option<String>) {
    match element {
        Some(el) => (
            el.attr("value").and_then(parse_decimal),
            el.attr("unit").map(str::to_string),
        ),
        None => (None, None),
    }
}

/// Decimal magnitude; malformed or non-finite tokens read as absent
fn parse_decimal(raw: &str) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::warn!(token = raw, "Unparseable decimal magnitude, treating as absent");
            None
        }
    }
}

/// Integer magnitude; malformed tokens read as absent
fn parse_integer(raw: &str) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(token = raw, "Unparseable integer magnitude, treating as absent");
            None
        }
    }
}

/// Boolean from the XML Schema lexicon: true/false/1/0, word forms
/// case-insensitive
fn parse_boolean(raw: &str) -> Option<bool> {
    match raw {
        "1" => Some(true),
        "0" => Some(false),
        _ if raw.eq_ignore_ascii_case("true") => Some(true),
        _ if raw.eq_ignore_ascii_case("false") => Some(false),
        _ => {
            tracing::warn!(token = raw, "Unparseable boolean token, treating as absent");
            None
        }
    }
}
