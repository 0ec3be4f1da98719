//! Extracted symbols and references: the flat records every analysis
//! consumes. Produced by an external extractor; immutable here except
//! for soft-deletion.

use serde::{Deserialize, Serialize};

/// Kind of a code symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Interface,
    TypeAlias,
    Variable,
    Module,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::TypeAlias => "type_alias",
            SymbolKind::Variable => "variable",
            SymbolKind::Module => "module",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "function" => Some(SymbolKind::Function),
            "method" => Some(SymbolKind::Method),
            "class" => Some(SymbolKind::Class),
            "interface" => Some(SymbolKind::Interface),
            "type_alias" => Some(SymbolKind::TypeAlias),
            "variable" => Some(SymbolKind::Variable),
            "module" => Some(SymbolKind::Module),
            _ => None,
        }
    }
}

/// How one symbol refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Call,
    Import,
    Extends,
    Implements,
    TypeUse,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Call => "call",
            ReferenceType::Import => "import",
            ReferenceType::Extends => "extends",
            ReferenceType::Implements => "implements",
            ReferenceType::TypeUse => "type_use",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "call" => Some(ReferenceType::Call),
            "import" => Some(ReferenceType::Import),
            "extends" => Some(ReferenceType::Extends),
            "implements" => Some(ReferenceType::Implements),
            "type_use" => Some(ReferenceType::TypeUse),
            _ => None,
        }
    }
}

/// One extracted code symbol with location and complexity metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSymbol {
    pub id: i64,
    pub repository_id: i64,
    pub file_id: i64,
    /// Enclosing symbol, if any. `None` marks a top-level declaration.
    pub parent_symbol_id: Option<i64>,
    pub name: String,
    pub kind: SymbolKind,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub complexity: u32,
    pub line_count: u32,
    /// Leading doc comment text, if any.
    pub documentation: Option<String>,
    pub is_exported: bool,
    /// Soft-delete marker. Deleted symbols stay queryable for history.
    pub deleted_at: Option<i64>,
}

impl CodeSymbol {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_documented(&self) -> bool {
        self.documentation
            .as_deref()
            .is_some_and(|doc| !doc.trim().is_empty())
    }
}

/// One directed reference (call/use site) between symbols.
///
/// Multiple rows may exist between the same pair — multiplicity is the
/// call count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolReference {
    pub id: i64,
    pub repository_id: i64,
    pub source_symbol_id: i64,
    /// `None` for unresolved or external targets.
    pub target_symbol_id: Option<i64>,
    pub reference_type: ReferenceType,
    pub is_external: bool,
    pub external_package: Option<String>,
    pub target_name: Option<String>,
    pub line: u32,
}
