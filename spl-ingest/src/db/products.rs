//! Product and packaging-level store operations
//!
//! Products and packaging levels are created by the broader document
//! parser; this core inserts them only on that parser's behalf and reads
//! them back to resolve characteristic scopes.

use spl_common::db::models::{PackagingLevel, Product};
use spl_common::Result;
use sqlx::{Row, SqlitePool};

/// Insert a product, returning its store-assigned id
pub async fn insert_product(pool: &SqlitePool, product: &Product) -> Result<i64> {
    let result = sqlx::query("INSERT INTO products (document_id, name) VALUES (?, ?)")
        .bind(product.document_id)
        .bind(&product.name)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Insert a packaging level, returning its store-assigned id
pub async fn insert_packaging_level(pool: &SqlitePool, level: &PackagingLevel) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO packaging_levels (product_id, package_code, package_code_system) VALUES (?, ?, ?)",
    )
    .bind(level.product_id)
    .bind(&level.package_code)
    .bind(&level.package_code_system)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Match a package code against the persisted packaging levels of one
/// product
pub async fn find_packaging_level_by_code(
    pool: &SqlitePool,
    product_id: i64,
    package_code: &str,
) -> Result<Option<PackagingLevel>> {
    let row = sqlx::query(
        r#"
        SELECT id, product_id, package_code, package_code_system
        FROM packaging_levels
        WHERE product_id = ? AND package_code = ?
        LIMIT 1
        "#,
    )
    .bind(product_id)
    .bind(package_code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| PackagingLevel {
        id: Some(row.get("id")),
        product_id: row.get("product_id"),
        package_code: row.get("package_code"),
        package_code_system: row.get("package_code_system"),
    }))
}
