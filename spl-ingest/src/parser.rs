//! Content-parser seam and element-to-row construction helpers
//!
//! The full document parser lives outside this core. The hierarchy
//! resolver only drives it through [`SectionContentParser`]; the helpers
//! below are shared with implementors so natural keys and effective
//! times parse the same way on both sides of the seam.

use crate::context::IngestContext;
use crate::models::Element;
use async_trait::async_trait;
use chrono::NaiveDate;
use spl_common::db::models::Section;
use spl_common::Result;

/// Resolves section content on behalf of the hierarchy resolver
#[async_trait]
pub trait SectionContentParser: Send + Sync {
    /// Fully resolve and persist one child section's subtree, depth-first.
    ///
    /// Returns the persisted child node, or `None` when the element
    /// carries no resolvable section.
    async fn resolve_child_section(
        &self,
        ctx: &IngestContext,
        element: &Element,
    ) -> Result<Option<Section>>;

    /// Resolve and persist an entire subtree in one pass.
    ///
    /// With `deep` set the parser recurses into all descendant sections
    /// internally; the caller performs no per-child round trips.
    async fn resolve_subtree(
        &self,
        ctx: &IngestContext,
        element: &Element,
        deep: bool,
    ) -> Result<()>;
}

/// Natural key of a section element: the `root` of its `<id>`, with the
/// `extension` appended when present.
pub fn section_natural_key(element: &Element) -> Option<String> {
    let id = element.child("id")?;
    let root = id.attr("root")?;
    Some(match id.attr("extension") {
        Some(extension) => format!("{}:{}", root, extension),
        None => root.to_string(),
    })
}

/// Build an unpersisted Section row from a source section element.
///
/// Returns `None` when the element carries no parseable identifier.
pub fn section_from_element(document_id: i64, element: &Element) -> Option<Section> {
    let natural_key = section_natural_key(element)?;
    let (effective_time_low, effective_time_high) = effective_time_bounds(element);
    let code = element.child("code");

    Some(Section {
        id: None,
        document_id,
        natural_key,
        title: element
            .child("title")
            .and_then(|t| t.text_content())
            .map(str::to_string),
        code: code.and_then(|c| c.attr("code")).map(str::to_string),
        code_system: code.and_then(|c| c.attr("codeSystem")).map(str::to_string),
        effective_time_low,
        effective_time_high,
    })
}

/// Effective time of a section: a point value populates only the low
/// bound, an interval populates low and high independently.
fn effective_time_bounds(element: &Element) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let Some(effective_time) = element.child("effectiveTime") else {
        return (None, None);
    };

    if let Some(value) = effective_time.attr("value") {
        return (parse_timestamp(value), None);
    }

    let low = effective_time
        .child("low")
        .and_then(|l| l.attr("value"))
        .and_then(parse_timestamp);
    let high = effective_time
        .child("high")
        .and_then(|h| h.attr("value"))
        .and_then(parse_timestamp);
    (low, high)
}

/// Parse the leading date portion of a source timestamp token (yyyyMMdd,
/// longer precision tolerated). Malformed tokens read as absent.
fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    if let Some(prefix) = raw.get(..8) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y%m%d") {
            return Some(date);
        }
    }
    tracing::warn!(token = raw, "Unparseable effective time token, treating as absent");
    None
}
