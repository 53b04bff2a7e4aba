//! Citation graph representation
//!
//! Deduplicated node and edge sets produced by one seed expansion

use citescope_common::models::Record;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// How a node entered the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Exploration start
    Seed,
    /// Cited by an expanded node
    Backward,
    /// Cites an expanded node
    Forward,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Seed => "seed",
            NodeRole::Backward => "backward",
            NodeRole::Forward => "forward",
        }
    }
}

/// Node in the citation graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,

    /// Display label (record title)
    pub label: String,

    pub role: NodeRole,

    /// Hops from the seed at first discovery
    pub level: usize,

    /// Originating record, for detail display
    #[serde(skip)]
    pub record: Arc<Record>,
}

/// Edge in the citation graph, oriented citer -> cited
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CitationEdge {
    /// Citing paper ID
    #[serde(rename = "source")]
    pub citing_id: String,

    /// Cited paper ID
    #[serde(rename = "target")]
    pub cited_id: String,
}

/// Counters collected while building
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub backward_nodes: usize,
    pub forward_nodes: usize,

    /// Citation ids with no local or remote match
    pub skipped_unresolved: usize,

    /// Remote calls that failed; their branches were dropped
    pub failed_fetches: usize,

    pub remote_calls: usize,

    pub duration_ms: u64,
}

/// Result of one seed expansion
#[derive(Debug, Clone, Serialize)]
pub struct CitationGraph {
    seed: String,

    depth: usize,

    /// Nodes in discovery order
    nodes: Vec<GraphNode>,

    /// Edges in discovery order
    edges: Vec<CitationEdge>,

    pub stats: BuildStats,

    #[serde(skip)]
    node_index: HashMap<String, usize>,

    #[serde(skip)]
    edge_set: HashSet<(String, String)>,
}

impl CitationGraph {
    /// Graph holding only the seed node
    pub fn new(seed: Arc<Record>, depth: usize) -> Self {
        let mut graph = Self {
            seed: seed.id.clone(),
            depth,
            nodes: Vec::new(),
            edges: Vec::new(),
            stats: BuildStats::default(),
            node_index: HashMap::new(),
            edge_set: HashSet::new(),
        };
        graph.add_node(seed, NodeRole::Seed, 0);
        graph
    }

    /// Add a node unless its id is already present; the first role sticks
    pub fn add_node(&mut self, record: Arc<Record>, role: NodeRole, level: usize) -> bool {
        if self.node_index.contains_key(&record.id) {
            return false;
        }

        match role {
            NodeRole::Backward => self.stats.backward_nodes += 1,
            NodeRole::Forward => self.stats.forward_nodes += 1,
            NodeRole::Seed => {}
        }

        self.node_index.insert(record.id.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            id: record.id.clone(),
            label: record.title.clone(),
            role,
            level,
            record,
        });
        true
    }

    /// Add an edge unless the ordered pair is already present
    pub fn add_edge(&mut self, citing: &str, cited: &str) -> bool {
        let key = (citing.to_string(), cited.to_string());
        if !self.edge_set.insert(key) {
            return false;
        }

        self.edges.push(CitationEdge {
            citing_id: citing.to_string(),
            cited_id: cited.to_string(),
        });
        true
    }

    pub fn seed_id(&self) -> &str {
        &self.seed
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub(crate) fn node_position(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_edge(&self, citing: &str, cited: &str) -> bool {
        self.edge_set
            .contains(&(citing.to_string(), cited.to_string()))
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CitationEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
