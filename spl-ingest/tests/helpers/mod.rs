//! Shared integration-test fixtures
//!
//! In-memory store setup, a stub content parser that persists sections
//! straight from the element tree, and element builders for the source
//! shapes the pipeline consumes.

#![allow(dead_code)]

use async_trait::async_trait;
use spl_common::db::models::{Document, PackagingLevel, Product, Section};
use spl_common::{Error, Result, SyncStrategy};
use spl_ingest::context::IngestContext;
use spl_ingest::db::{documents, products, sections};
use spl_ingest::models::Element;
use spl_ingest::parser::{section_from_element, SectionContentParser};
use sqlx::SqlitePool;
use uuid::Uuid;

/// In-memory store with the full schema
pub async fn setup_test_db() -> SqlitePool {
    spl_common::logging::init_tracing("warn");
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    spl_common::db::init::create_tables(&pool).await.unwrap();
    pool
}

/// Fresh store plus a persisted document to scope the pass
pub async fn setup_context(strategy: SyncStrategy) -> IngestContext {
    let pool = setup_test_db().await;
    let document = Document {
        id: None,
        guid: Uuid::new_v4(),
        title: Some("Test Label".to_string()),
        effective_time: None,
    };
    let document_id = documents::insert_document(&pool, &document).await.unwrap();
    IngestContext::new(pool, document_id, strategy)
}

/// Persist a section element as the resolver's parent node
pub async fn persist_parent(ctx: &IngestContext, element: &Element) -> Section {
    let mut section = section_from_element(ctx.document_id, element).unwrap();
    let id = sections::upsert_section(&ctx.db, &section).await.unwrap();
    section.id = Some(id);
    section
}

pub async fn seed_product(ctx: &IngestContext) -> i64 {
    let product = Product {
        id: None,
        document_id: ctx.document_id,
        name: Some("Test Product".to_string()),
    };
    products::insert_product(&ctx.db, &product).await.unwrap()
}

pub async fn seed_packaging_level(ctx: &IngestContext, product_id: i64, code: &str) -> i64 {
    let level = PackagingLevel {
        id: None,
        product_id,
        package_code: Some(code.to_string()),
        package_code_system: Some("2.16.840.1.113883.6.69".to_string()),
    };
    products::insert_packaging_level(&ctx.db, &level)
        .await
        .unwrap()
}

/// Content parser that persists sections straight from the element tree.
///
/// Natural keys listed in `failing` refuse to resolve, for
/// failure-isolation tests.
#[derive(Default)]
pub struct StubParser {
    pub failing: Vec<String>,
}

impl StubParser {
    pub fn failing_on(keys: &[&str]) -> Self {
        Self {
            failing: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SectionContentParser for StubParser {
    async fn resolve_child_section(
        &self,
        ctx: &IngestContext,
        element: &Element,
    ) -> Result<Option<Section>> {
        let Some(mut section) = section_from_element(ctx.document_id, element) else {
            return Ok(None);
        };
        if self.failing.contains(&section.natural_key) {
            return Err(Error::MalformedReference(format!(
                "unresolvable section '{}'",
                section.natural_key
            )));
        }

        let id = sections::upsert_section(&ctx.db, &section).await?;
        section.id = Some(id);

        // Depth-first into nested components
        for component in element.children_named("component") {
            if let Some(child) = component.child("section") {
                self.resolve_child_section(ctx, child).await?;
            }
        }

        Ok(Some(section))
    }

    async fn resolve_subtree(&self, ctx: &IngestContext, element: &Element, deep: bool) -> Result<()> {
        for component in element.children_named("component") {
            let Some(child) = component.child("section") else {
                continue;
            };
            let Some(section) = section_from_element(ctx.document_id, child) else {
                continue;
            };
            // What the parser cannot resolve it leaves unpersisted
            if self.failing.contains(&section.natural_key) {
                continue;
            }
            sections::upsert_section(&ctx.db, &section).await?;
            if deep {
                self.resolve_subtree(ctx, child, deep).await?;
            }
        }
        Ok(())
    }
}

/// `<section>` element with an id, code, and title
pub fn section_element(natural_key: &str, title: &str) -> Element {
    Element::new("section")
        .with_child(Element::new("id").with_attr("root", natural_key))
        .with_child(
            Element::new("code")
                .with_attr("code", "34089-3")
                .with_attr("codeSystem", "2.16.840.1.113883.6.1"),
        )
        .with_child(Element::new("title").with_text(title))
        .with_child(Element::new("effectiveTime").with_attr("value", "20240301"))
}

/// `<component>` wrapper around a section element
pub fn component(section: Element) -> Element {
    Element::new("component").with_child(section)
}

/// `<characteristic>` with a quantity value
pub fn quantity_characteristic(code: &str, value: &str, unit: &str) -> Element {
    characteristic_element(
        code,
        Element::new("value")
            .with_attr("xsi:type", "PQ")
            .with_attr("value", value)
            .with_attr("unit", unit),
    )
}

/// `<characteristic>` with a boolean value
pub fn boolean_characteristic(code: &str, value: &str) -> Element {
    characteristic_element(
        code,
        Element::new("value")
            .with_attr("xsi:type", "BL")
            .with_attr("value", value),
    )
}

pub fn characteristic_element(code: &str, value: Element) -> Element {
    Element::new("characteristic")
        .with_child(
            Element::new("code")
                .with_attr("code", code)
                .with_attr("codeSystem", "2.16.840.1.113883.1.11.19255"),
        )
        .with_child(value)
}

/// `<subjectOf>` container wrapping characteristics, the shape the
/// synchronizer walks
pub fn subject_of(characteristics: Vec<Element>) -> Element {
    let mut container = Element::new("subjectOf");
    for characteristic in characteristics {
        container = container.with_child(characteristic);
    }
    container
}

/// Packaging container with a package code
pub fn packaging_container(package_code: &str) -> Element {
    Element::new("containerPackagedProduct").with_child(
        Element::new("code")
            .with_attr("code", package_code)
            .with_attr("codeSystem", "2.16.840.1.113883.6.69"),
    )
}

/// All edges as (parent natural key, child natural key, sequence number),
/// ordered by parent then sequence
pub async fn edge_keys(pool: &SqlitePool) -> Vec<(String, String, i64)> {
    sqlx::query_as::<_, (String, String, i64)>(
        r#"
        SELECT p.natural_key, c.natural_key, h.sequence_number
        FROM section_hierarchy h
        JOIN sections p ON p.id = h.parent_section_id
        JOIN sections c ON c.id = h.child_section_id
        ORDER BY p.natural_key, h.sequence_number, c.natural_key
        "#,
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

pub async fn count_characteristics(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM product_characteristics")
        .fetch_one(pool)
        .await
        .unwrap()
}
