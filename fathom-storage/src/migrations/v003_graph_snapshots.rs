//! V003: graph_snapshots, persisted call graphs with a staleness flag.

pub const MIGRATION_SQL: &str = r#"
-- Persisted call graphs. Structural change marks rows stale rather than
-- recomputing eagerly.
CREATE TABLE IF NOT EXISTS graph_snapshots (
    repository_id INTEGER NOT NULL,
    graph_type TEXT NOT NULL,
    root_id INTEGER NOT NULL,
    graph_data TEXT NOT NULL,
    is_stale INTEGER NOT NULL DEFAULT 0,
    computed_at INTEGER NOT NULL DEFAULT (unixepoch()),
    PRIMARY KEY (repository_id, graph_type, root_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_snapshots_stale
    ON graph_snapshots(repository_id) WHERE is_stale = 1;
"#;
