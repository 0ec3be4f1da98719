//! graph_snapshots table queries.

use fathom_core::errors::StorageError;
use fathom_core::types::CallGraphData;
use rusqlite::{params, Connection};

/// Upsert a snapshot; a rebuild always clears the stale flag.
pub fn upsert_snapshot(
    conn: &Connection,
    repository_id: i64,
    graph_type: &str,
    root_id: i64,
    data: &CallGraphData,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(data)
        .map_err(|e| super::decode_err(format!("graph encode: {e}")))?;

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO graph_snapshots
             (repository_id, graph_type, root_id, graph_data, is_stale, computed_at)
             VALUES (?1, ?2, ?3, ?4, 0, unixepoch())
             ON CONFLICT (repository_id, graph_type, root_id) DO UPDATE SET
               graph_data = excluded.graph_data,
               is_stale = 0,
               computed_at = excluded.computed_at",
        )
        .map_err(super::sqlite_err)?;

    stmt.execute(params![repository_id, graph_type, root_id, json])
        .map_err(super::sqlite_err)?;
    Ok(())
}

/// Fetch a snapshot and its staleness flag.
pub fn get_snapshot(
    conn: &Connection,
    repository_id: i64,
    graph_type: &str,
    root_id: i64,
) -> Result<Option<(CallGraphData, bool)>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT graph_data, is_stale FROM graph_snapshots
             WHERE repository_id = ?1 AND graph_type = ?2 AND root_id = ?3",
        )
        .map_err(super::sqlite_err)?;

    let mut rows = stmt
        .query(params![repository_id, graph_type, root_id])
        .map_err(super::sqlite_err)?;
    match rows.next().map_err(super::sqlite_err)? {
        Some(row) => {
            let json: String = row.get(0).map_err(super::sqlite_err)?;
            let is_stale = row.get::<_, i64>(1).map_err(super::sqlite_err)? != 0;
            let data: CallGraphData = serde_json::from_str(&json)
                .map_err(|e| super::decode_err(format!("graph decode: {e}")))?;
            Ok(Some((data, is_stale)))
        }
        None => Ok(None),
    }
}

/// Mark every snapshot for a repository stale. Returns rows flagged.
pub fn mark_all_stale(conn: &Connection, repository_id: i64) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE graph_snapshots SET is_stale = 1
         WHERE repository_id = ?1 AND is_stale = 0",
        params![repository_id],
    )
    .map_err(super::sqlite_err)
}
