//! Characteristic store operations
//!
//! Records are insert-only; the synchronizer filters duplicates by
//! fingerprint before anything reaches the store.

use spl_common::db::models::Characteristic;
use spl_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const COLUMNS: &str = "id, product_id, packaging_level_id, code, code_system, value_type, \
     quantity_value, quantity_unit, high_value, high_unit, integer_value, \
     coded_code, coded_code_system, coded_display_name, string_value, boolean_value, \
     media_type, media_content, null_flavor, original_text";

/// Existing records for one exact (product, packaging level) scope.
///
/// `packaging_level_id` of `None` selects product-level records only.
pub async fn find_by_scope(
    pool: &SqlitePool,
    product_id: i64,
    packaging_level_id: Option<i64>,
) -> Result<Vec<Characteristic>> {
    let sql = format!(
        "SELECT {} FROM product_characteristics WHERE product_id = ? AND packaging_level_id IS ?",
        COLUMNS
    );

    let rows = sqlx::query(&sql)
        .bind(product_id)
        .bind(packaging_level_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(characteristic_from_row).collect())
}

/// Existing records for a product across all packaging levels
pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> Result<Vec<Characteristic>> {
    let sql = format!(
        "SELECT {} FROM product_characteristics WHERE product_id = ?",
        COLUMNS
    );

    let rows = sqlx::query(&sql).bind(product_id).fetch_all(pool).await?;

    Ok(rows.into_iter().map(characteristic_from_row).collect())
}

/// Insert one record, returning its store-assigned id
pub async fn insert_characteristic(pool: &SqlitePool, record: &Characteristic) -> Result<i64> {
    let result = bind_record(sqlx::query(INSERT_ONE), record)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Bulk insert of records, chunked to stay inside the SQLite bind budget
pub async fn insert_characteristics(
    pool: &SqlitePool,
    records: &[Characteristic],
) -> Result<()> {
    // 19 binds per row
    for chunk in records.chunks(50) {
        let values = vec![ROW_PLACEHOLDERS; chunk.len()].join(", ");
        let sql = format!("{} VALUES {}", INSERT_PREFIX, values);

        let mut query = sqlx::query(&sql);
        for record in chunk {
            query = bind_record(query, record);
        }
        query.execute(pool).await?;
    }
    Ok(())
}

const INSERT_PREFIX: &str = "INSERT INTO product_characteristics (\
     product_id, packaging_level_id, code, code_system, value_type, \
     quantity_value, quantity_unit, high_value, high_unit, integer_value, \
     coded_code, coded_code_system, coded_display_name, string_value, boolean_value, \
     media_type, media_content, null_flavor, original_text)";

const ROW_PLACEHOLDERS: &str = "(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const INSERT_ONE: &str = "INSERT INTO product_characteristics (\
     product_id, packaging_level_id, code, code_system, value_type, \
     quantity_value, quantity_unit, high_value, high_unit, integer_value, \
     coded_code, coded_code_system, coded_display_name, string_value, boolean_value, \
     media_type, media_content, null_flavor, original_text) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

fn bind_record<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    record: &'q Characteristic,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(record.product_id)
        .bind(record.packaging_level_id)
        .bind(&record.code)
        .bind(&record.code_system)
        .bind(&record.value_type)
        .bind(record.quantity_value)
        .bind(&record.quantity_unit)
        .bind(record.high_value)
        .bind(&record.high_unit)
        .bind(record.integer_value)
        .bind(&record.coded_code)
        .bind(&record.coded_code_system)
        .bind(&record.coded_display_name)
        .bind(&record.string_value)
        .bind(record.boolean_value)
        .bind(&record.media_type)
        .bind(&record.media_content)
        .bind(&record.null_flavor)
        .bind(&record.original_text)
}

fn characteristic_from_row(row: SqliteRow) -> Characteristic {
    Characteristic {
        id: Some(row.get("id")),
        product_id: row.get("product_id"),
        packaging_level_id: row.get("packaging_level_id"),
        code: row.get("code"),
        code_system: row.get("code_system"),
        value_type: row.get("value_type"),
        quantity_value: row.get("quantity_value"),
        quantity_unit: row.get("quantity_unit"),
        high_value: row.get("high_value"),
        high_unit: row.get("high_unit"),
        integer_value: row.get("integer_value"),
        coded_code: row.get("coded_code"),
        coded_code_system: row.get("coded_code_system"),
        coded_display_name: row.get("coded_display_name"),
        string_value: row.get("string_value"),
        boolean_value: row.get("boolean_value"),
        media_type: row.get("media_type"),
        media_content: row.get("media_content"),
        null_flavor: row.get("null_flavor"),
        original_text: row.get("original_text"),
    }
}
