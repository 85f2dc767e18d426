//! Document store operations

use spl_common::db::models::Document;
use spl_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Insert a document header, returning its store-assigned id
pub async fn insert_document(pool: &SqlitePool, document: &Document) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO documents (guid, title, effective_time) VALUES (?, ?, ?)",
    )
    .bind(document.guid.to_string())
    .bind(&document.title)
    .bind(document.effective_time.map(|d| d.to_string()))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Load a document by its globally unique identifier
pub async fn find_document_by_guid(pool: &SqlitePool, guid: &Uuid) -> Result<Option<Document>> {
    let row = sqlx::query(
        "SELECT id, guid, title, effective_time FROM documents WHERE guid = ?",
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");
            let guid = Uuid::parse_str(&guid_str)
                .map_err(|e| Error::Internal(format!("Invalid document guid in store: {}", e)))?;
            let effective_time: Option<String> = row.get("effective_time");

            Ok(Some(Document {
                id: Some(row.get("id")),
                guid,
                title: row.get("title"),
                effective_time: match effective_time {
                    Some(raw) => Some(raw.parse().map_err(|e| {
                        Error::Internal(format!("Invalid effective time in store: {}", e))
                    })?),
                    None => None,
                },
            }))
        }
        None => Ok(None),
    }
}
