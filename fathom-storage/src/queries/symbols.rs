//! code_symbols table queries.

use fathom_core::errors::StorageError;
use fathom_core::traits::SymbolFilter;
use fathom_core::types::{CodeSymbol, SymbolKind};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Insert one symbol (extractor-assigned id). Replaces on id conflict.
pub fn insert_symbol(conn: &Connection, symbol: &CodeSymbol) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT OR REPLACE INTO code_symbols
             (id, repository_id, file_id, parent_symbol_id, name, kind, file_path,
              start_line, end_line, complexity, line_count, documentation,
              is_exported, deleted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .map_err(super::sqlite_err)?;

    stmt.execute(params![
        symbol.id,
        symbol.repository_id,
        symbol.file_id,
        symbol.parent_symbol_id,
        symbol.name,
        symbol.kind.as_str(),
        symbol.file_path,
        symbol.start_line,
        symbol.end_line,
        symbol.complexity,
        symbol.line_count,
        symbol.documentation,
        symbol.is_exported as i64,
        symbol.deleted_at,
    ])
    .map_err(super::sqlite_err)?;
    Ok(())
}

/// Fetch one symbol by id.
pub fn get_symbol(conn: &Connection, id: i64) -> Result<Option<CodeSymbol>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, repository_id, file_id, parent_symbol_id, name, kind, file_path,
                    start_line, end_line, complexity, line_count, documentation,
                    is_exported, deleted_at
             FROM code_symbols WHERE id = ?1",
        )
        .map_err(super::sqlite_err)?;

    let mut rows = stmt.query(params![id]).map_err(super::sqlite_err)?;
    match rows.next().map_err(super::sqlite_err)? {
        Some(row) => Ok(Some(map_symbol_row(row)?)),
        None => Ok(None),
    }
}

/// List symbols matching a filter.
pub fn list_symbols(
    conn: &Connection,
    filter: &SymbolFilter,
) -> Result<Vec<CodeSymbol>, StorageError> {
    let mut sql = String::from(
        "SELECT id, repository_id, file_id, parent_symbol_id, name, kind, file_path,
                start_line, end_line, complexity, line_count, documentation,
                is_exported, deleted_at
         FROM code_symbols WHERE 1=1",
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(repo) = filter.repository_id {
        sql.push_str(&format!(" AND repository_id = ?{}", values.len() + 1));
        values.push(Value::Integer(repo));
    }
    if let Some(file) = filter.file_id {
        sql.push_str(&format!(" AND file_id = ?{}", values.len() + 1));
        values.push(Value::Integer(file));
    }
    if let Some(ids) = &filter.symbol_ids {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: Vec<String> = ids
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", values.len() + 1 + i))
            .collect();
        sql.push_str(&format!(" AND id IN ({})", placeholders.join(", ")));
        values.extend(ids.iter().map(|&id| Value::Integer(id)));
    }
    if filter.top_level_only {
        sql.push_str(" AND parent_symbol_id IS NULL");
    }
    if !filter.include_deleted {
        sql.push_str(" AND deleted_at IS NULL");
    }
    sql.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&sql).map_err(super::sqlite_err)?;
    let mut rows = stmt
        .query(params_from_iter(values))
        .map_err(super::sqlite_err)?;

    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(super::sqlite_err)? {
        result.push(map_symbol_row(row)?);
    }
    Ok(result)
}

/// Soft-delete a symbol. Returns whether a live row was marked.
pub fn soft_delete_symbol(
    conn: &Connection,
    id: i64,
    deleted_at: i64,
) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "UPDATE code_symbols SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
            params![id, deleted_at],
        )
        .map_err(super::sqlite_err)?;
    Ok(changed > 0)
}

fn map_symbol_row(row: &Row<'_>) -> Result<CodeSymbol, StorageError> {
    let kind_text: String = row.get(5).map_err(super::sqlite_err)?;
    let kind = SymbolKind::parse(&kind_text)
        .ok_or_else(|| super::decode_err(format!("unknown symbol kind: {kind_text}")))?;

    Ok(CodeSymbol {
        id: row.get(0).map_err(super::sqlite_err)?,
        repository_id: row.get(1).map_err(super::sqlite_err)?,
        file_id: row.get(2).map_err(super::sqlite_err)?,
        parent_symbol_id: row.get(3).map_err(super::sqlite_err)?,
        name: row.get(4).map_err(super::sqlite_err)?,
        kind,
        file_path: row.get(6).map_err(super::sqlite_err)?,
        start_line: row.get(7).map_err(super::sqlite_err)?,
        end_line: row.get(8).map_err(super::sqlite_err)?,
        complexity: row.get(9).map_err(super::sqlite_err)?,
        line_count: row.get(10).map_err(super::sqlite_err)?,
        documentation: row.get(11).map_err(super::sqlite_err)?,
        is_exported: row.get::<_, i64>(12).map_err(super::sqlite_err)? != 0,
        deleted_at: row.get(13).map_err(super::sqlite_err)?,
    })
}
