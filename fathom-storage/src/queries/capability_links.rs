//! capabilities and capability_links table queries.

use fathom_core::errors::StorageError;
use fathom_core::traits::LinkFilter;
use fathom_core::types::{Capability, LinkType, SymbolCapabilityLink};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Insert a capability (externally-owned identity; used by seeding and
/// tests).
pub fn insert_capability(conn: &Connection, capability: &Capability) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO capabilities (id, name) VALUES (?1, ?2)",
        params![capability.id, capability.name],
    )
    .map_err(super::sqlite_err)?;
    Ok(())
}

/// Fetch one capability by id.
pub fn get_capability(conn: &Connection, id: i64) -> Result<Option<Capability>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT id, name FROM capabilities WHERE id = ?1")
        .map_err(super::sqlite_err)?;

    let mut rows = stmt.query(params![id]).map_err(super::sqlite_err)?;
    match rows.next().map_err(super::sqlite_err)? {
        Some(row) => Ok(Some(Capability {
            id: row.get(0).map_err(super::sqlite_err)?,
            name: row.get(1).map_err(super::sqlite_err)?,
        })),
        None => Ok(None),
    }
}

/// List all capabilities, id order.
pub fn list_capabilities(conn: &Connection) -> Result<Vec<Capability>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT id, name FROM capabilities ORDER BY id")
        .map_err(super::sqlite_err)?;

    let mut rows = stmt.query([]).map_err(super::sqlite_err)?;
    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(super::sqlite_err)? {
        result.push(Capability {
            id: row.get(0).map_err(super::sqlite_err)?,
            name: row.get(1).map_err(super::sqlite_err)?,
        });
    }
    Ok(result)
}

/// Upsert a link by its `(symbol_id, capability_id)` pair — replaces the
/// prior link type, confidence, and evidence.
pub fn upsert_link(conn: &Connection, link: &SymbolCapabilityLink) -> Result<(), StorageError> {
    let evidence = encode_evidence(&link.evidence)?;
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO capability_links
             (symbol_id, capability_id, confidence, link_type, is_auto_linked,
              evidence, linked_by, linked_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (symbol_id, capability_id) DO UPDATE SET
               confidence = excluded.confidence,
               link_type = excluded.link_type,
               is_auto_linked = excluded.is_auto_linked,
               evidence = excluded.evidence,
               linked_by = excluded.linked_by,
               linked_at = excluded.linked_at",
        )
        .map_err(super::sqlite_err)?;

    stmt.execute(params![
        link.symbol_id,
        link.capability_id,
        link.confidence.clamp(0.0, 1.0),
        link.link_type.as_str(),
        link.is_auto_linked as i64,
        evidence,
        link.linked_by,
        link.linked_at,
    ])
    .map_err(super::sqlite_err)?;
    Ok(())
}

/// Insert only when the pair is not yet linked. Returns whether a row
/// was created.
pub fn insert_link_if_absent(
    conn: &Connection,
    link: &SymbolCapabilityLink,
) -> Result<bool, StorageError> {
    let evidence = encode_evidence(&link.evidence)?;
    let mut stmt = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO capability_links
             (symbol_id, capability_id, confidence, link_type, is_auto_linked,
              evidence, linked_by, linked_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(super::sqlite_err)?;

    let changed = stmt
        .execute(params![
            link.symbol_id,
            link.capability_id,
            link.confidence.clamp(0.0, 1.0),
            link.link_type.as_str(),
            link.is_auto_linked as i64,
            evidence,
            link.linked_by,
            link.linked_at,
        ])
        .map_err(super::sqlite_err)?;
    Ok(changed > 0)
}

/// Idempotent delete. Returns whether a row was removed.
pub fn delete_link(
    conn: &Connection,
    symbol_id: i64,
    capability_id: i64,
) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "DELETE FROM capability_links WHERE symbol_id = ?1 AND capability_id = ?2",
            params![symbol_id, capability_id],
        )
        .map_err(super::sqlite_err)?;
    Ok(changed > 0)
}

/// List links matching a filter.
pub fn list_links(
    conn: &Connection,
    filter: &LinkFilter,
) -> Result<Vec<SymbolCapabilityLink>, StorageError> {
    let mut sql = String::from(
        "SELECT symbol_id, capability_id, confidence, link_type, is_auto_linked,
                evidence, linked_by, linked_at
         FROM capability_links WHERE 1=1",
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(capability) = filter.capability_id {
        sql.push_str(&format!(" AND capability_id = ?{}", values.len() + 1));
        values.push(Value::Integer(capability));
    }
    if let Some(symbol) = filter.symbol_id {
        sql.push_str(&format!(" AND symbol_id = ?{}", values.len() + 1));
        values.push(Value::Integer(symbol));
    }
    if let Some(auto) = filter.auto_linked {
        sql.push_str(&format!(" AND is_auto_linked = ?{}", values.len() + 1));
        values.push(Value::Integer(auto as i64));
    }
    sql.push_str(" ORDER BY capability_id, symbol_id");

    let mut stmt = conn.prepare(&sql).map_err(super::sqlite_err)?;
    let mut rows = stmt
        .query(params_from_iter(values))
        .map_err(super::sqlite_err)?;

    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(super::sqlite_err)? {
        result.push(map_link_row(row)?);
    }
    Ok(result)
}

fn map_link_row(row: &Row<'_>) -> Result<SymbolCapabilityLink, StorageError> {
    let type_text: String = row.get(3).map_err(super::sqlite_err)?;
    let link_type = LinkType::parse(&type_text)
        .ok_or_else(|| super::decode_err(format!("unknown link type: {type_text}")))?;
    let evidence_json: String = row.get(5).map_err(super::sqlite_err)?;
    let evidence: Vec<String> = serde_json::from_str(&evidence_json)
        .map_err(|e| super::decode_err(format!("evidence decode: {e}")))?;

    Ok(SymbolCapabilityLink {
        symbol_id: row.get(0).map_err(super::sqlite_err)?,
        capability_id: row.get(1).map_err(super::sqlite_err)?,
        confidence: row.get(2).map_err(super::sqlite_err)?,
        link_type,
        is_auto_linked: row.get::<_, i64>(4).map_err(super::sqlite_err)? != 0,
        evidence,
        linked_by: row.get(6).map_err(super::sqlite_err)?,
        linked_at: row.get(7).map_err(super::sqlite_err)?,
    })
}

fn encode_evidence(evidence: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(evidence)
        .map_err(|e| super::decode_err(format!("evidence encode: {e}")))
}
