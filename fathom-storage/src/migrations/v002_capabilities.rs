//! V002: capability tables (capabilities, capability_links,
//! capability_health, capability_evolution.

pub const MIGRATION_SQL: &str = r#"
-- Capability identity. Rows are created/owned externally.
CREATE TABLE IF NOT EXISTS capabilities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

-- Symbol-to-capability links. One row per (symbol, capability) pair.
CREATE TABLE IF NOT EXISTS capability_links (
    symbol_id INTEGER NOT NULL,
    capability_id INTEGER NOT NULL,
    confidence REAL NOT NULL,
    link_type TEXT NOT NULL,
    is_auto_linked INTEGER NOT NULL DEFAULT 0,
    evidence TEXT NOT NULL DEFAULT '[]',
    linked_by TEXT,
    linked_at INTEGER NOT NULL DEFAULT (unixepoch()),
    PRIMARY KEY (symbol_id, capability_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_links_capability
    ON capability_links(capability_id);

-- Daily health snapshots. One row per (capability, repository, day);
-- re-running the same day overwrites.
CREATE TABLE IF NOT EXISTS capability_health (
    capability_id INTEGER NOT NULL,
    repository_id INTEGER NOT NULL,
    date INTEGER NOT NULL,
    symbol_count INTEGER NOT NULL DEFAULT 0,
    total_complexity INTEGER NOT NULL DEFAULT 0,
    avg_complexity REAL NOT NULL DEFAULT 0,
    max_complexity INTEGER NOT NULL DEFAULT 0,
    total_lines INTEGER NOT NULL DEFAULT 0,
    documentation_ratio REAL NOT NULL DEFAULT 0,
    test_coverage REAL NOT NULL DEFAULT 0,
    recent_commit_count INTEGER NOT NULL DEFAULT 0,
    last_commit_at INTEGER,
    complexity_score REAL NOT NULL DEFAULT 0,
    quality_score REAL NOT NULL DEFAULT 0,
    stability_score REAL NOT NULL DEFAULT 0,
    maintainability_score REAL NOT NULL DEFAULT 0,
    overall_health_score REAL NOT NULL DEFAULT 0,
    health_status TEXT NOT NULL,
    health_trend TEXT NOT NULL,
    trend_delta REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (capability_id, repository_id, date)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_health_date
    ON capability_health(capability_id, repository_id, date DESC);

-- Evolution events. Append-only; significance derived at record time.
CREATE TABLE IF NOT EXISTS capability_evolution (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    capability_id INTEGER NOT NULL,
    repository_id INTEGER NOT NULL,
    commit_sha TEXT NOT NULL,
    previous_commit_sha TEXT,
    event_type TEXT NOT NULL,
    affected_symbol_ids TEXT NOT NULL DEFAULT '[]',
    affected_file_ids TEXT NOT NULL DEFAULT '[]',
    complexity_delta INTEGER NOT NULL DEFAULT 0,
    lines_delta INTEGER NOT NULL DEFAULT 0,
    health_score_delta REAL NOT NULL DEFAULT 0,
    breaking_change INTEGER NOT NULL DEFAULT 0,
    change_category TEXT NOT NULL,
    significance TEXT NOT NULL,
    summary TEXT NOT NULL,
    description TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    detected_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

CREATE INDEX IF NOT EXISTS idx_evolution_capability
    ON capability_evolution(capability_id, detected_at DESC);
CREATE INDEX IF NOT EXISTS idx_evolution_repo
    ON capability_evolution(repository_id, detected_at DESC);
"#;
