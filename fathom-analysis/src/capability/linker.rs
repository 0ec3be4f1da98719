//! Symbol-to-capability linking: explicit links and name/documentation
//! inference.

use std::sync::Arc;

use fathom_core::errors::CapabilityError;
use fathom_core::traits::{CapabilityStore, LinkFilter, SymbolFilter, SymbolStore};
use fathom_core::types::collections::FxHashSet;
use fathom_core::types::{unix_now, Capability, CodeSymbol, LinkType, SymbolCapabilityLink};

/// Confidence assigned when every capability-name token appears in the
/// symbol name.
const FULL_NAME_MATCH_CONFIDENCE: f64 = 0.8;
/// Confidence for a partial symbol-name token match.
const PARTIAL_NAME_MATCH_CONFIDENCE: f64 = 0.6;
/// Confidence for a documentation-only match.
const DOC_MATCH_CONFIDENCE: f64 = 0.55;

/// Tokens shorter than this never count as partial matches — "to",
/// "of", and the like match everything.
const MIN_TOKEN_LEN: usize = 3;

/// An explicit link request.
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub symbol_id: i64,
    pub capability_id: i64,
    pub link_type: LinkType,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub linked_by: Option<String>,
}

/// Creates, removes, and infers symbol-capability links.
pub struct CapabilityLinker {
    symbols: Arc<dyn SymbolStore>,
    capabilities: Arc<dyn CapabilityStore>,
}

impl CapabilityLinker {
    pub fn new(symbols: Arc<dyn SymbolStore>, capabilities: Arc<dyn CapabilityStore>) -> Self {
        Self {
            symbols,
            capabilities,
        }
    }

    /// Create or replace a manual link. The capability must exist;
    /// confidence is clamped to [0, 1].
    pub fn link_symbol(&self, request: LinkRequest) -> Result<SymbolCapabilityLink, CapabilityError> {
        self.require_capability(request.capability_id)?;

        let link = SymbolCapabilityLink {
            symbol_id: request.symbol_id,
            capability_id: request.capability_id,
            confidence: request.confidence,
            link_type: request.link_type,
            is_auto_linked: false,
            evidence: request.evidence,
            linked_by: request.linked_by,
            linked_at: unix_now(),
        }
        .clamped();

        self.capabilities.upsert_link(&link)?;
        tracing::debug!(
            symbol_id = link.symbol_id,
            capability_id = link.capability_id,
            "symbol linked"
        );
        Ok(link)
    }

    /// Remove a link. Idempotent; returns whether a link existed.
    pub fn unlink_symbol(&self, symbol_id: i64, capability_id: i64) -> Result<bool, CapabilityError> {
        Ok(self.capabilities.delete_link(symbol_id, capability_id)?)
    }

    /// Propose auto-links for unlinked symbols whose name or
    /// documentation matches a capability name, at or above `threshold`
    /// confidence. Returns proposals only; nothing is persisted.
    ///
    /// `capability_id` narrows inference to one capability (which must
    /// exist); `None` runs against every capability.
    pub fn infer_links(
        &self,
        repository_id: i64,
        capability_id: Option<i64>,
        threshold: f64,
        max_links: usize,
    ) -> Result<Vec<SymbolCapabilityLink>, CapabilityError> {
        let capabilities = match capability_id {
            Some(id) => vec![self.require_capability(id)?],
            None => self.capabilities.list_capabilities()?,
        };

        let symbols = self.symbols.list_symbols(&SymbolFilter {
            repository_id: Some(repository_id),
            ..Default::default()
        })?;

        let now = unix_now();
        let mut proposals = Vec::new();
        for capability in &capabilities {
            let tokens = tokenize(&capability.name);
            if tokens.is_empty() {
                continue;
            }

            let linked: FxHashSet<i64> = self
                .capabilities
                .list_links(&LinkFilter {
                    capability_id: Some(capability.id),
                    ..Default::default()
                })?
                .into_iter()
                .map(|l| l.symbol_id)
                .collect();

            for symbol in &symbols {
                if linked.contains(&symbol.id) {
                    continue;
                }
                let Some((confidence, evidence)) = score_match(symbol, capability, &tokens) else {
                    continue;
                };
                if confidence < threshold {
                    continue;
                }
                proposals.push(SymbolCapabilityLink {
                    symbol_id: symbol.id,
                    capability_id: capability.id,
                    confidence,
                    link_type: LinkType::Implements,
                    is_auto_linked: true,
                    evidence: vec![evidence],
                    linked_by: None,
                    linked_at: now,
                });
            }
        }

        proposals.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.capability_id, a.symbol_id).cmp(&(b.capability_id, b.symbol_id)))
        });
        proposals.truncate(max_links);
        Ok(proposals)
    }

    /// Persist inferred links, skipping pairs already linked — inference
    /// never overwrites a manual link. Returns the number created.
    pub fn apply_inferred(&self, links: &[SymbolCapabilityLink]) -> Result<usize, CapabilityError> {
        let mut created = 0;
        for link in links {
            if self.capabilities.insert_link_if_absent(link)? {
                created += 1;
            }
        }
        tracing::debug!(proposed = links.len(), created, "inferred links applied");
        Ok(created)
    }

    fn require_capability(&self, capability_id: i64) -> Result<Capability, CapabilityError> {
        self.capabilities
            .get_capability(capability_id)?
            .ok_or(CapabilityError::CapabilityNotFound { capability_id })
    }
}

fn tokenize(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score one symbol against one capability. Returns the confidence and
/// a human-readable evidence line, or `None` for no match.
fn score_match(
    symbol: &CodeSymbol,
    capability: &Capability,
    tokens: &[String],
) -> Option<(f64, String)> {
    let name = symbol.name.to_lowercase();

    if tokens
        .iter()
        .all(|t| t.len() >= MIN_TOKEN_LEN && name.contains(t.as_str()))
    {
        return Some((
            FULL_NAME_MATCH_CONFIDENCE,
            format!("symbol name matches capability \"{}\"", capability.name),
        ));
    }

    if let Some(token) = tokens
        .iter()
        .find(|t| t.len() >= MIN_TOKEN_LEN && name.contains(t.as_str()))
    {
        return Some((
            PARTIAL_NAME_MATCH_CONFIDENCE,
            format!("symbol name contains \"{token}\""),
        ));
    }

    if let Some(doc) = symbol.documentation.as_deref() {
        let doc = doc.to_lowercase();
        if let Some(token) = tokens
            .iter()
            .find(|t| t.len() >= MIN_TOKEN_LEN && doc.contains(t.as_str()))
        {
            return Some((
                DOC_MATCH_CONFIDENCE,
                format!("documentation mentions \"{token}\""),
            ));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use fathom_core::types::SymbolKind;

    fn symbol(name: &str, doc: Option<&str>) -> CodeSymbol {
        CodeSymbol {
            id: 1,
            repository_id: 1,
            file_id: 1,
            parent_symbol_id: None,
            name: name.to_string(),
            kind: SymbolKind::Function,
            file_path: "src/a.ts".to_string(),
            start_line: 1,
            end_line: 10,
            complexity: 1,
            line_count: 10,
            documentation: doc.map(str::to_string),
            is_exported: true,
            deleted_at: None,
        }
    }

    fn capability(name: &str) -> Capability {
        Capability {
            id: 9,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_full_name_match_scores_highest() {
        let cap = capability("user auth");
        let tokens = tokenize(&cap.name);
        let (confidence, _) = score_match(&symbol("userAuthHandler", None), &cap, &tokens).unwrap();
        assert_eq!(confidence, FULL_NAME_MATCH_CONFIDENCE);
    }

    #[test]
    fn test_partial_name_match() {
        let cap = capability("auth session");
        let tokens = tokenize(&cap.name);
        let (confidence, _) = score_match(&symbol("authenticate", None), &cap, &tokens).unwrap();
        assert_eq!(confidence, PARTIAL_NAME_MATCH_CONFIDENCE);
    }

    #[test]
    fn test_documentation_match() {
        let cap = capability("billing");
        let tokens = tokenize(&cap.name);
        let (confidence, _) = score_match(
            &symbol("processInvoice", Some("Handles billing cycles.")),
            &cap,
            &tokens,
        )
        .unwrap();
        assert_eq!(confidence, DOC_MATCH_CONFIDENCE);
    }

    #[test]
    fn test_short_tokens_do_not_match() {
        let cap = capability("io");
        let tokens = tokenize(&cap.name);
        assert!(score_match(&symbol("audioDecoder", None), &cap, &tokens).is_none());
    }

    #[test]
    fn test_no_match() {
        let cap = capability("payments");
        let tokens = tokenize(&cap.name);
        assert!(score_match(&symbol("renderChart", None), &cap, &tokens).is_none());
    }
}
