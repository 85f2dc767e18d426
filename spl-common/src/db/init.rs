//! Database initialization
//!
//! Opens (or creates) the SQLite store and applies the schema. Table
//! creation is idempotent and safe to run on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while one writer holds the store
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent, safe to call multiple times)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_documents_table(pool).await?;
    create_sections_table(pool).await?;
    create_section_hierarchy_table(pool).await?;
    create_products_table(pool).await?;
    create_packaging_levels_table(pool).await?;
    create_characteristics_table(pool).await?;
    Ok(())
}

pub async fn create_documents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY,
            guid TEXT NOT NULL UNIQUE,
            title TEXT,
            effective_time TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_sections_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sections (
            id INTEGER PRIMARY KEY,
            document_id INTEGER NOT NULL REFERENCES documents(id),
            natural_key TEXT NOT NULL,
            title TEXT,
            code TEXT,
            code_system TEXT,
            effective_time_low TEXT,
            effective_time_high TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (document_id, natural_key)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_section_hierarchy_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_hierarchy (
            id INTEGER PRIMARY KEY,
            parent_section_id INTEGER NOT NULL REFERENCES sections(id),
            child_section_id INTEGER NOT NULL REFERENCES sections(id),
            sequence_number INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (parent_section_id, child_section_id)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            document_id INTEGER NOT NULL REFERENCES documents(id),
            name TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_packaging_levels_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS packaging_levels (
            id INTEGER PRIMARY KEY,
            product_id INTEGER NOT NULL REFERENCES products(id),
            package_code TEXT,
            package_code_system TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_characteristics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_characteristics (
            id INTEGER PRIMARY KEY,
            product_id INTEGER NOT NULL REFERENCES products(id),
            packaging_level_id INTEGER REFERENCES packaging_levels(id),
            code TEXT,
            code_system TEXT,
            value_type TEXT,
            quantity_value REAL,
            quantity_unit TEXT,
            high_value REAL,
            high_unit TEXT,
            integer_value INTEGER,
            coded_code TEXT,
            coded_code_system TEXT,
            coded_display_name TEXT,
            string_value TEXT,
            boolean_value INTEGER,
            media_type TEXT,
            media_content TEXT,
            null_flavor TEXT,
            original_text TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
