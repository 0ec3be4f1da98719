//! capability_evolution table queries.

use fathom_core::errors::StorageError;
use fathom_core::traits::EvolutionFilter;
use fathom_core::types::{
    CapabilityEvolution, ChangeCategory, EvolutionEventType, Significance,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Append one event. Returns the assigned id.
pub fn insert_event(conn: &Connection, event: &CapabilityEvolution) -> Result<i64, StorageError> {
    let affected_symbols = encode_json(&event.affected_symbol_ids)?;
    let affected_files = encode_json(&event.affected_file_ids)?;
    let tags = encode_json(&event.tags)?;

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO capability_evolution
             (capability_id, repository_id, commit_sha, previous_commit_sha,
              event_type, affected_symbol_ids, affected_file_ids, complexity_delta,
              lines_delta, health_score_delta, breaking_change, change_category,
              significance, summary, description, tags, detected_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                     ?15, ?16, ?17)",
        )
        .map_err(super::sqlite_err)?;

    stmt.execute(params![
        event.capability_id,
        event.repository_id,
        event.commit_sha,
        event.previous_commit_sha,
        event.event_type.as_str(),
        affected_symbols,
        affected_files,
        event.complexity_delta,
        event.lines_delta,
        event.health_score_delta,
        event.breaking_change as i64,
        event.change_category.as_str(),
        event.significance.as_str(),
        event.summary,
        event.description,
        tags,
        event.detected_at,
    ])
    .map_err(super::sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// Events matching a filter, most recent first, honoring limit/offset.
pub fn list_events(
    conn: &Connection,
    filter: &EvolutionFilter,
) -> Result<Vec<CapabilityEvolution>, StorageError> {
    let mut sql = String::from(
        "SELECT id, capability_id, repository_id, commit_sha, previous_commit_sha,
                event_type, affected_symbol_ids, affected_file_ids, complexity_delta,
                lines_delta, health_score_delta, breaking_change, change_category,
                significance, summary, description, tags, detected_at
         FROM capability_evolution WHERE 1=1",
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(capability) = filter.capability_id {
        sql.push_str(&format!(" AND capability_id = ?{}", values.len() + 1));
        values.push(Value::Integer(capability));
    }
    if let Some(repo) = filter.repository_id {
        sql.push_str(&format!(" AND repository_id = ?{}", values.len() + 1));
        values.push(Value::Integer(repo));
    }
    if let Some(types) = &filter.event_types {
        if types.is_empty() {
            return Ok(Vec::new());
        }
        push_in_clause(&mut sql, &mut values, "event_type", types.iter().map(|t| t.as_str()));
    }
    if let Some(categories) = &filter.change_categories {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        push_in_clause(
            &mut sql,
            &mut values,
            "change_category",
            categories.iter().map(|c| c.as_str()),
        );
    }
    if let Some(min) = filter.min_significance {
        // Significance is stored as text; filter by the allowed set.
        let allowed = [
            Significance::Trivial,
            Significance::Minor,
            Significance::Moderate,
            Significance::Major,
            Significance::Critical,
        ]
        .into_iter()
        .filter(|s| *s >= min)
        .map(|s| s.as_str());
        push_in_clause(&mut sql, &mut values, "significance", allowed);
    }
    if let Some(since) = filter.since {
        sql.push_str(&format!(" AND detected_at >= ?{}", values.len() + 1));
        values.push(Value::Integer(since));
    }
    if let Some(until) = filter.until {
        sql.push_str(&format!(" AND detected_at <= ?{}", values.len() + 1));
        values.push(Value::Integer(until));
    }

    sql.push_str(" ORDER BY detected_at DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT ?{}", values.len() + 1));
        values.push(Value::Integer(limit as i64));
        sql.push_str(&format!(" OFFSET ?{}", values.len() + 1));
        values.push(Value::Integer(filter.offset as i64));
    } else if filter.offset > 0 {
        sql.push_str(&format!(" LIMIT -1 OFFSET ?{}", values.len() + 1));
        values.push(Value::Integer(filter.offset as i64));
    }

    let mut stmt = conn.prepare(&sql).map_err(super::sqlite_err)?;
    let mut rows = stmt
        .query(params_from_iter(values))
        .map_err(super::sqlite_err)?;

    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(super::sqlite_err)? {
        result.push(map_event_row(row)?);
    }
    Ok(result)
}

fn push_in_clause<'a>(
    sql: &mut String,
    values: &mut Vec<Value>,
    column: &str,
    items: impl Iterator<Item = &'a str>,
) {
    let mut placeholders = Vec::new();
    for item in items {
        placeholders.push(format!("?{}", values.len() + 1));
        values.push(Value::Text(item.to_string()));
    }
    sql.push_str(&format!(" AND {column} IN ({})", placeholders.join(", ")));
}

fn map_event_row(row: &Row<'_>) -> Result<CapabilityEvolution, StorageError> {
    let type_text: String = row.get(5).map_err(super::sqlite_err)?;
    let event_type = EvolutionEventType::parse(&type_text)
        .ok_or_else(|| super::decode_err(format!("unknown event type: {type_text}")))?;
    let category_text: String = row.get(12).map_err(super::sqlite_err)?;
    let change_category = ChangeCategory::parse(&category_text)
        .ok_or_else(|| super::decode_err(format!("unknown change category: {category_text}")))?;
    let significance_text: String = row.get(13).map_err(super::sqlite_err)?;
    let significance = Significance::parse(&significance_text)
        .ok_or_else(|| super::decode_err(format!("unknown significance: {significance_text}")))?;

    let affected_symbol_ids = decode_json(row, 6)?;
    let affected_file_ids = decode_json(row, 7)?;
    let tags: Vec<String> = decode_json(row, 16)?;

    Ok(CapabilityEvolution {
        id: row.get(0).map_err(super::sqlite_err)?,
        capability_id: row.get(1).map_err(super::sqlite_err)?,
        repository_id: row.get(2).map_err(super::sqlite_err)?,
        commit_sha: row.get(3).map_err(super::sqlite_err)?,
        previous_commit_sha: row.get(4).map_err(super::sqlite_err)?,
        event_type,
        affected_symbol_ids,
        affected_file_ids,
        complexity_delta: row.get(8).map_err(super::sqlite_err)?,
        lines_delta: row.get(9).map_err(super::sqlite_err)?,
        health_score_delta: row.get(10).map_err(super::sqlite_err)?,
        breaking_change: row.get::<_, i64>(11).map_err(super::sqlite_err)? != 0,
        change_category,
        significance,
        summary: row.get(14).map_err(super::sqlite_err)?,
        description: row.get(15).map_err(super::sqlite_err)?,
        tags,
        detected_at: row.get(17).map_err(super::sqlite_err)?,
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| super::decode_err(format!("json encode: {e}")))
}

fn decode_json<T: serde::de::DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> Result<T, StorageError> {
    let text: String = row.get(idx).map_err(super::sqlite_err)?;
    serde_json::from_str(&text).map_err(|e| super::decode_err(format!("json decode: {e}")))
}
