//! SymbolStore port: read-only provider of extracted symbols and
//! references, scoped by repository.

use crate::errors::StorageError;
use crate::types::{CodeSymbol, ReferenceType, SymbolReference};

/// Filter for symbol listings. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct SymbolFilter {
    pub repository_id: Option<i64>,
    pub file_id: Option<i64>,
    /// Restrict to these symbol ids.
    pub symbol_ids: Option<Vec<i64>>,
    /// Only symbols with no enclosing parent.
    pub top_level_only: bool,
    /// Soft-deleted symbols are excluded unless set.
    pub include_deleted: bool,
}

/// Filter for reference listings. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFilter {
    pub repository_id: Option<i64>,
    pub source_symbol_id: Option<i64>,
    pub target_symbol_id: Option<i64>,
    pub reference_type: Option<ReferenceType>,
    /// References whose source symbol lives in this file.
    pub source_file_id: Option<i64>,
    pub is_external: Option<bool>,
}

/// Read-only access to extracted symbol/reference records.
pub trait SymbolStore: Send + Sync {
    fn get_symbol(&self, id: i64) -> Result<Option<CodeSymbol>, StorageError>;

    fn list_symbols(&self, filter: &SymbolFilter) -> Result<Vec<CodeSymbol>, StorageError>;

    fn list_references(
        &self,
        filter: &ReferenceFilter,
    ) -> Result<Vec<SymbolReference>, StorageError>;
}
