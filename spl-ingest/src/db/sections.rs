//! Section store operations
//!
//! Sections are created by the content parser through the upsert
//! primitive; the hierarchy resolver only reads them back by natural key.

use chrono::NaiveDate;
use spl_common::db::models::Section;
use spl_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Insert or refresh a section row, keyed by (document_id, natural_key).
/// Returns the store-assigned id in either case.
pub async fn upsert_section(pool: &SqlitePool, section: &Section) -> Result<i64> {
    let row = sqlx::query(
        r#"
        INSERT INTO sections (document_id, natural_key, title, code, code_system, effective_time_low, effective_time_high)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(document_id, natural_key) DO UPDATE SET
            title = excluded.title,
            code = excluded.code,
            code_system = excluded.code_system,
            effective_time_low = excluded.effective_time_low,
            effective_time_high = excluded.effective_time_high
        RETURNING id
        "#,
    )
    .bind(section.document_id)
    .bind(&section.natural_key)
    .bind(&section.title)
    .bind(&section.code)
    .bind(&section.code_system)
    .bind(section.effective_time_low.map(|d| d.to_string()))
    .bind(section.effective_time_high.map(|d| d.to_string()))
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>(0))
}

/// Load one section by its document-scoped natural key
pub async fn find_by_natural_key(
    pool: &SqlitePool,
    document_id: i64,
    natural_key: &str,
) -> Result<Option<Section>> {
    let row = sqlx::query(
        r#"
        SELECT id, document_id, natural_key, title, code, code_system, effective_time_low, effective_time_high
        FROM sections
        WHERE document_id = ? AND natural_key = ?
        "#,
    )
    .bind(document_id)
    .bind(natural_key)
    .fetch_optional(pool)
    .await?;

    row.map(section_from_row).transpose()
}

/// Bulk lookup resolving natural keys to persisted sections.
///
/// Returns only the keys that exist; callers diff against their input to
/// find unresolved children.
pub async fn find_by_natural_keys(
    pool: &SqlitePool,
    document_id: i64,
    natural_keys: &[String],
) -> Result<Vec<Section>> {
    if natural_keys.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; natural_keys.len()].join(", ");
    let sql = format!(
        "SELECT id, document_id, natural_key, title, code, code_system, effective_time_low, effective_time_high \
         FROM sections WHERE document_id = ? AND natural_key IN ({})",
        placeholders
    );

    let mut query = sqlx::query(&sql).bind(document_id);
    for key in natural_keys {
        query = query.bind(key);
    }

    let rows = query.fetch_all(pool).await?;
    rows.into_iter().map(section_from_row).collect()
}

fn section_from_row(row: SqliteRow) -> Result<Section> {
    Ok(Section {
        id: Some(row.get("id")),
        document_id: row.get("document_id"),
        natural_key: row.get("natural_key"),
        title: row.get("title"),
        code: row.get("code"),
        code_system: row.get("code_system"),
        effective_time_low: date_from_column(row.get("effective_time_low"))?,
        effective_time_high: date_from_column(row.get("effective_time_high"))?,
    })
}

fn date_from_column(value: Option<String>) -> Result<Option<NaiveDate>> {
    match value {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| Error::Internal(format!("Invalid date in store: {}", e))),
        None => Ok(None),
    }
}
