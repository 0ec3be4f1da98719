//! V001: symbol tables, code_symbols and symbol_references.
//! Populated by the external extractor; read-only to the analysis engine
//! apart from soft-deletion.

pub const MIGRATION_SQL: &str = r#"
-- Extracted code symbols. Immutable once written except deleted_at.
CREATE TABLE IF NOT EXISTS code_symbols (
    id INTEGER PRIMARY KEY,
    repository_id INTEGER NOT NULL,
    file_id INTEGER NOT NULL,
    parent_symbol_id INTEGER,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    file_path TEXT NOT NULL,
    start_line INTEGER NOT NULL DEFAULT 0,
    end_line INTEGER NOT NULL DEFAULT 0,
    complexity INTEGER NOT NULL DEFAULT 1,
    line_count INTEGER NOT NULL DEFAULT 0,
    documentation TEXT,
    is_exported INTEGER NOT NULL DEFAULT 0,
    deleted_at INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_symbols_repo_file
    ON code_symbols(repository_id, file_id);
CREATE INDEX IF NOT EXISTS idx_symbols_repo_name
    ON code_symbols(repository_id, name);
CREATE INDEX IF NOT EXISTS idx_symbols_parent
    ON code_symbols(parent_symbol_id) WHERE parent_symbol_id IS NOT NULL;

-- Directed reference edges. One row per call/use site; multiplicity
-- between the same pair is the call count.
CREATE TABLE IF NOT EXISTS symbol_references (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    repository_id INTEGER NOT NULL,
    source_symbol_id INTEGER NOT NULL,
    target_symbol_id INTEGER,
    reference_type TEXT NOT NULL,
    is_external INTEGER NOT NULL DEFAULT 0,
    external_package TEXT,
    target_name TEXT,
    line INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE INDEX IF NOT EXISTS idx_refs_source
    ON symbol_references(source_symbol_id);
CREATE INDEX IF NOT EXISTS idx_refs_target
    ON symbol_references(target_symbol_id) WHERE target_symbol_id IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_refs_repo_type
    ON symbol_references(repository_id, reference_type);
"#;
