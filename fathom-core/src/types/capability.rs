//! Capabilities (business-meaningful groupings of symbols) and the
//! links tying symbols to them.

use serde::{Deserialize, Serialize};

/// A named capability. Created and owned externally; this core only
/// reads its identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capability {
    pub id: i64,
    pub name: String,
}

/// Why a symbol is linked to a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Implements,
    Tests,
    Configures,
    Documents,
    Related,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Implements => "implements",
            LinkType::Tests => "tests",
            LinkType::Configures => "configures",
            LinkType::Documents => "documents",
            LinkType::Related => "related",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "implements" => Some(LinkType::Implements),
            "tests" => Some(LinkType::Tests),
            "configures" => Some(LinkType::Configures),
            "documents" => Some(LinkType::Documents),
            "related" => Some(LinkType::Related),
            _ => None,
        }
    }
}

/// A symbol-to-capability association.
///
/// Unique per `(symbol_id, capability_id)` — upserts replace the prior
/// link type, confidence, and evidence for the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolCapabilityLink {
    pub symbol_id: i64,
    pub capability_id: i64,
    /// Clamped to [0, 1] on construction and on persistence.
    pub confidence: f64,
    pub link_type: LinkType,
    pub is_auto_linked: bool,
    pub evidence: Vec<String>,
    pub linked_by: Option<String>,
    pub linked_at: i64,
}

impl SymbolCapabilityLink {
    /// Clamp confidence into its documented range.
    pub fn clamped(mut self) -> Self {
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self
    }
}
