//! capability_health table queries.

use fathom_core::errors::StorageError;
use fathom_core::types::{CapabilityHealth, HealthStatus, HealthTrend};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const HEALTH_COLUMNS: &str = "capability_id, repository_id, date, symbol_count,
    total_complexity, avg_complexity, max_complexity, total_lines,
    documentation_ratio, test_coverage, recent_commit_count, last_commit_at,
    complexity_score, quality_score, stability_score, maintainability_score,
    overall_health_score, health_status, health_trend, trend_delta";

/// Upsert one snapshot by `(capability_id, repository_id, date)` —
/// re-running the same day overwrites rather than duplicates.
pub fn upsert_health(conn: &Connection, health: &CapabilityHealth) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT OR REPLACE INTO capability_health
             (capability_id, repository_id, date, symbol_count, total_complexity,
              avg_complexity, max_complexity, total_lines, documentation_ratio,
              test_coverage, recent_commit_count, last_commit_at, complexity_score,
              quality_score, stability_score, maintainability_score,
              overall_health_score, health_status, health_trend, trend_delta)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                     ?15, ?16, ?17, ?18, ?19, ?20)",
        )
        .map_err(super::sqlite_err)?;

    stmt.execute(params![
        health.capability_id,
        health.repository_id,
        health.date,
        health.symbol_count,
        health.total_complexity as i64,
        health.avg_complexity,
        health.max_complexity,
        health.total_lines as i64,
        health.documentation_ratio,
        health.test_coverage,
        health.recent_commit_count,
        health.last_commit_at,
        health.complexity_score,
        health.quality_score,
        health.stability_score,
        health.maintainability_score,
        health.overall_health_score,
        health.health_status.as_str(),
        health.health_trend.as_str(),
        health.trend_delta,
    ])
    .map_err(super::sqlite_err)?;
    Ok(())
}

/// Most recent snapshot strictly earlier than `date`.
pub fn latest_health_before(
    conn: &Connection,
    capability_id: i64,
    repository_id: i64,
    date: i64,
) -> Result<Option<CapabilityHealth>, StorageError> {
    let sql = format!(
        "SELECT {HEALTH_COLUMNS} FROM capability_health
         WHERE capability_id = ?1 AND repository_id = ?2 AND date < ?3
         ORDER BY date DESC LIMIT 1"
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(super::sqlite_err)?;

    let mut rows = stmt
        .query(params![capability_id, repository_id, date])
        .map_err(super::sqlite_err)?;
    match rows.next().map_err(super::sqlite_err)? {
        Some(row) => Ok(Some(map_health_row(row)?)),
        None => Ok(None),
    }
}

/// Snapshots in `[start, end]`, most recent first, at most `limit` rows.
pub fn list_health(
    conn: &Connection,
    capability_id: i64,
    repository_id: i64,
    start_date: Option<i64>,
    end_date: Option<i64>,
    limit: u32,
) -> Result<Vec<CapabilityHealth>, StorageError> {
    let mut sql = format!(
        "SELECT {HEALTH_COLUMNS} FROM capability_health
         WHERE capability_id = ?1 AND repository_id = ?2"
    );
    let mut values: Vec<Value> = vec![
        Value::Integer(capability_id),
        Value::Integer(repository_id),
    ];

    if let Some(start) = start_date {
        sql.push_str(&format!(" AND date >= ?{}", values.len() + 1));
        values.push(Value::Integer(start));
    }
    if let Some(end) = end_date {
        sql.push_str(&format!(" AND date <= ?{}", values.len() + 1));
        values.push(Value::Integer(end));
    }
    sql.push_str(&format!(" ORDER BY date DESC LIMIT ?{}", values.len() + 1));
    values.push(Value::Integer(limit as i64));

    let mut stmt = conn.prepare(&sql).map_err(super::sqlite_err)?;
    let mut rows = stmt
        .query(params_from_iter(values))
        .map_err(super::sqlite_err)?;

    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(super::sqlite_err)? {
        result.push(map_health_row(row)?);
    }
    Ok(result)
}

fn map_health_row(row: &Row<'_>) -> Result<CapabilityHealth, StorageError> {
    let status_text: String = row.get(17).map_err(super::sqlite_err)?;
    let health_status = HealthStatus::parse(&status_text)
        .ok_or_else(|| super::decode_err(format!("unknown health status: {status_text}")))?;
    let trend_text: String = row.get(18).map_err(super::sqlite_err)?;
    let health_trend = HealthTrend::parse(&trend_text)
        .ok_or_else(|| super::decode_err(format!("unknown health trend: {trend_text}")))?;

    Ok(CapabilityHealth {
        capability_id: row.get(0).map_err(super::sqlite_err)?,
        repository_id: row.get(1).map_err(super::sqlite_err)?,
        date: row.get(2).map_err(super::sqlite_err)?,
        symbol_count: row.get(3).map_err(super::sqlite_err)?,
        total_complexity: row.get::<_, i64>(4).map_err(super::sqlite_err)? as u64,
        avg_complexity: row.get(5).map_err(super::sqlite_err)?,
        max_complexity: row.get(6).map_err(super::sqlite_err)?,
        total_lines: row.get::<_, i64>(7).map_err(super::sqlite_err)? as u64,
        documentation_ratio: row.get(8).map_err(super::sqlite_err)?,
        test_coverage: row.get(9).map_err(super::sqlite_err)?,
        recent_commit_count: row.get(10).map_err(super::sqlite_err)?,
        last_commit_at: row.get(11).map_err(super::sqlite_err)?,
        complexity_score: row.get(12).map_err(super::sqlite_err)?,
        quality_score: row.get(13).map_err(super::sqlite_err)?,
        stability_score: row.get(14).map_err(super::sqlite_err)?,
        maintainability_score: row.get(15).map_err(super::sqlite_err)?,
        overall_health_score: row.get(16).map_err(super::sqlite_err)?,
        health_status,
        health_trend,
        trend_delta: row.get(19).map_err(super::sqlite_err)?,
    })
}
