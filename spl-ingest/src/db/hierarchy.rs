//! Section hierarchy edge operations
//!
//! Edges are exclusively written by the hierarchy resolver. The
//! (parent, child) pair is unique and an edge is never updated once
//! created; dedup happens before the insert, not through conflict
//! handling, so an unexpected duplicate still surfaces as an error.

use spl_common::db::models::SectionHierarchy;
use spl_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Load the edge for one (parent, child) pair, if present
pub async fn find_edge(
    pool: &SqlitePool,
    parent_section_id: i64,
    child_section_id: i64,
) -> Result<Option<SectionHierarchy>> {
    let row = sqlx::query(
        r#"
        SELECT id, parent_section_id, child_section_id, sequence_number
        FROM section_hierarchy
        WHERE parent_section_id = ? AND child_section_id = ?
        "#,
    )
    .bind(parent_section_id)
    .bind(child_section_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(edge_from_row))
}

/// Bulk lookup of existing edges from one parent to any of the given
/// children
pub async fn find_edges_for_parent(
    pool: &SqlitePool,
    parent_section_id: i64,
    child_section_ids: &[i64],
) -> Result<Vec<SectionHierarchy>> {
    if child_section_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; child_section_ids.len()].join(", ");
    let sql = format!(
        "SELECT id, parent_section_id, child_section_id, sequence_number \
         FROM section_hierarchy WHERE parent_section_id = ? AND child_section_id IN ({})",
        placeholders
    );

    let mut query = sqlx::query(&sql).bind(parent_section_id);
    for child_id in child_section_ids {
        query = query.bind(child_id);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(edge_from_row).collect())
}

/// Insert one edge, returning its store-assigned id
pub async fn insert_edge(pool: &SqlitePool, edge: &SectionHierarchy) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO section_hierarchy (parent_section_id, child_section_id, sequence_number) VALUES (?, ?, ?)",
    )
    .bind(edge.parent_section_id)
    .bind(edge.child_section_id)
    .bind(edge.sequence_number)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Bulk insert of edges, chunked to stay inside the SQLite bind budget
pub async fn insert_edges(pool: &SqlitePool, edges: &[SectionHierarchy]) -> Result<()> {
    for chunk in edges.chunks(100) {
        let values = vec!["(?, ?, ?)"; chunk.len()].join(", ");
        let sql = format!(
            "INSERT INTO section_hierarchy (parent_section_id, child_section_id, sequence_number) VALUES {}",
            values
        );

        let mut query = sqlx::query(&sql);
        for edge in chunk {
            query = query
                .bind(edge.parent_section_id)
                .bind(edge.child_section_id)
                .bind(edge.sequence_number);
        }
        query.execute(pool).await?;
    }
    Ok(())
}

fn edge_from_row(row: SqliteRow) -> SectionHierarchy {
    SectionHierarchy {
        id: Some(row.get("id")),
        parent_section_id: row.get("parent_section_id"),
        child_section_id: row.get("child_section_id"),
        sequence_number: row.get("sequence_number"),
    }
}
