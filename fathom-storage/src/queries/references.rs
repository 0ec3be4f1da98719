//! symbol_references table queries.

use fathom_core::errors::StorageError;
use fathom_core::traits::ReferenceFilter;
use fathom_core::types::{ReferenceType, SymbolReference};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Insert one reference row. Returns the assigned id.
pub fn insert_reference(
    conn: &Connection,
    reference: &SymbolReference,
) -> Result<i64, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO symbol_references
             (repository_id, source_symbol_id, target_symbol_id, reference_type,
              is_external, external_package, target_name, line)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(super::sqlite_err)?;

    stmt.execute(params![
        reference.repository_id,
        reference.source_symbol_id,
        reference.target_symbol_id,
        reference.reference_type.as_str(),
        reference.is_external as i64,
        reference.external_package,
        reference.target_name,
        reference.line,
    ])
    .map_err(super::sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// List references matching a filter.
///
/// `source_file_id` constrains via the source symbol's file, so the
/// query joins code_symbols only when that field is set.
pub fn list_references(
    conn: &Connection,
    filter: &ReferenceFilter,
) -> Result<Vec<SymbolReference>, StorageError> {
    let mut sql = String::from(
        "SELECT r.id, r.repository_id, r.source_symbol_id, r.target_symbol_id,
                r.reference_type, r.is_external, r.external_package, r.target_name, r.line
         FROM symbol_references r",
    );
    if filter.source_file_id.is_some() {
        sql.push_str(" JOIN code_symbols s ON r.source_symbol_id = s.id");
    }
    sql.push_str(" WHERE 1=1");

    let mut values: Vec<Value> = Vec::new();
    if let Some(repo) = filter.repository_id {
        sql.push_str(&format!(" AND r.repository_id = ?{}", values.len() + 1));
        values.push(Value::Integer(repo));
    }
    if let Some(source) = filter.source_symbol_id {
        sql.push_str(&format!(" AND r.source_symbol_id = ?{}", values.len() + 1));
        values.push(Value::Integer(source));
    }
    if let Some(target) = filter.target_symbol_id {
        sql.push_str(&format!(" AND r.target_symbol_id = ?{}", values.len() + 1));
        values.push(Value::Integer(target));
    }
    if let Some(ty) = filter.reference_type {
        sql.push_str(&format!(" AND r.reference_type = ?{}", values.len() + 1));
        values.push(Value::Text(ty.as_str().to_string()));
    }
    if let Some(file) = filter.source_file_id {
        sql.push_str(&format!(" AND s.file_id = ?{}", values.len() + 1));
        values.push(Value::Integer(file));
    }
    if let Some(external) = filter.is_external {
        sql.push_str(&format!(" AND r.is_external = ?{}", values.len() + 1));
        values.push(Value::Integer(external as i64));
    }
    sql.push_str(" ORDER BY r.id");

    let mut stmt = conn.prepare(&sql).map_err(super::sqlite_err)?;
    let mut rows = stmt
        .query(params_from_iter(values))
        .map_err(super::sqlite_err)?;

    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(super::sqlite_err)? {
        result.push(map_reference_row(row)?);
    }
    Ok(result)
}

fn map_reference_row(row: &Row<'_>) -> Result<SymbolReference, StorageError> {
    let type_text: String = row.get(4).map_err(super::sqlite_err)?;
    let reference_type = ReferenceType::parse(&type_text)
        .ok_or_else(|| super::decode_err(format!("unknown reference type: {type_text}")))?;

    Ok(SymbolReference {
        id: row.get(0).map_err(super::sqlite_err)?,
        repository_id: row.get(1).map_err(super::sqlite_err)?,
        source_symbol_id: row.get(2).map_err(super::sqlite_err)?,
        target_symbol_id: row.get(3).map_err(super::sqlite_err)?,
        reference_type,
        is_external: row.get::<_, i64>(5).map_err(super::sqlite_err)? != 0,
        external_package: row.get(6).map_err(super::sqlite_err)?,
        target_name: row.get(7).map_err(super::sqlite_err)?,
        line: row.get(8).map_err(super::sqlite_err)?,
    })
}
