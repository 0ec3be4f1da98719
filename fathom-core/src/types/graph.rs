//! Call graph wire types. The JSON shape is consumed by external
//! tooling, so field names are camelCase and stable.

use serde::{Deserialize, Serialize};

use super::symbol::SymbolKind;

/// One node in a built call-graph tree.
///
/// This is a tree, not a graph: cycles in the underlying reference data
/// are broken during the build by refusing to re-expand a symbol already
/// on the current root-to-node path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallGraphNode {
    pub symbol_id: i64,
    pub name: String,
    pub kind: SymbolKind,
    pub file_path: String,
    pub file_id: i64,
    /// Distance from the root. Never exceeds the requested max depth.
    pub depth: u32,
    pub complexity: u32,
    /// Number of outgoing reference rows from this symbol — counts every
    /// call site, not distinct targets.
    pub call_count: u32,
    pub children: Vec<CallGraphNode>,
}

/// An external (package) call recorded during a build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCallInfo {
    pub package: String,
    pub symbol: String,
}

/// Fan-in/fan-out metrics over the repository reference table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub avg_fan_out: f64,
    pub avg_fan_in: f64,
    pub max_fan_out: u32,
    pub max_fan_in: u32,
    /// 0-100 aggregate interconnectedness measure.
    pub coupling_score: f64,
}

impl Default for GraphMetrics {
    fn default() -> Self {
        Self {
            avg_fan_out: 0.0,
            avg_fan_in: 0.0,
            max_fan_out: 0,
            max_fan_in: 0,
            coupling_score: 0.0,
        }
    }
}

/// A complete built call graph rooted at one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallGraphData {
    pub root: CallGraphNode,
    /// Distinct symbols in the tree — a symbol reachable via multiple
    /// paths is counted once.
    pub total_nodes: u32,
    /// Deepest depth actually reached (≤ the requested max depth).
    pub max_depth: u32,
    pub external_calls: Vec<ExternalCallInfo>,
    pub metrics: GraphMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_graph_json_shape_is_camel_case() {
        let data = CallGraphData {
            root: CallGraphNode {
                symbol_id: 1,
                name: "main".to_string(),
                kind: SymbolKind::Function,
                file_path: "src/main.ts".to_string(),
                file_id: 10,
                depth: 0,
                complexity: 3,
                call_count: 2,
                children: vec![],
            },
            total_nodes: 1,
            max_depth: 0,
            external_calls: vec![ExternalCallInfo {
                package: "lodash".to_string(),
                symbol: "merge".to_string(),
            }],
            metrics: GraphMetrics::default(),
        };

        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("totalNodes").is_some());
        assert!(json.get("maxDepth").is_some());
        assert!(json.get("externalCalls").is_some());
        assert!(json["root"].get("symbolId").is_some());
        assert!(json["root"].get("callCount").is_some());
        assert!(json["root"].get("filePath").is_some());
        assert!(json["metrics"].get("avgFanOut").is_some());
        assert!(json["metrics"].get("couplingScore").is_some());
    }

    #[test]
    fn test_call_graph_json_round_trip() {
        let node = CallGraphNode {
            symbol_id: 7,
            name: "helper".to_string(),
            kind: SymbolKind::Function,
            file_path: "src/util.ts".to_string(),
            file_id: 11,
            depth: 1,
            complexity: 1,
            call_count: 0,
            children: vec![],
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: CallGraphNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
