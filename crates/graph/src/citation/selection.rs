//! Currently selected node of a built graph, with change notifications

use super::graph::{CitationGraph, GraphNode};
use citescope_common::errors::{AppError, Result};

/// Called with the newly activated node
pub type SelectionListener = Box<dyn Fn(&GraphNode) + Send + Sync>;

/// A built graph together with the node the user is looking at
pub struct GraphView {
    graph: CitationGraph,

    /// Position of the selected node in `graph.nodes()`
    selected: usize,

    listeners: Vec<SelectionListener>,
}

impl GraphView {
    /// Wrap a graph; the seed starts out selected
    pub fn new(graph: CitationGraph) -> Self {
        // the seed is always the first node
        Self {
            graph,
            selected: 0,
            listeners: Vec::new(),
        }
    }

    pub fn graph(&self) -> &CitationGraph {
        &self.graph
    }

    pub fn selected(&self) -> &GraphNode {
        &self.graph.nodes()[self.selected]
    }

    /// Register a callback fired on every `select`
    pub fn on_selection_changed<F>(&mut self, listener: F)
    where
        F: Fn(&GraphNode) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Activate a node and notify listeners, even if it was already selected
    pub fn select(&mut self, id: &str) -> Result<&GraphNode> {
        let position = self
            .graph
            .node_position(id)
            .ok_or_else(|| AppError::NodeNotFound { id: id.to_string() })?;

        self.selected = position;
        let node = &self.graph.nodes()[position];
        for listener in &self.listeners {
            listener(node);
        }

        Ok(node)
    }
}

impl std::fmt::Debug for GraphView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphView")
            .field("seed", &self.graph.seed_id())
            .field("selected", &self.selected().id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::NodeRole;
    use citescope_common::errors::ErrorCode;
    use citescope_common::models::Record;
    use std::sync::{Arc, Mutex};

    fn view() -> GraphView {
        let record = |id: &str| {
            Arc::new(Record {
                id: id.into(),
                ..Default::default()
            })
        };
        let mut graph = CitationGraph::new(record("A"), 1);
        graph.add_node(record("B"), NodeRole::Backward, 1);
        graph.add_edge("A", "B");
        GraphView::new(graph)
    }

    #[test]
    fn test_seed_selected_initially() {
        let view = view();
        assert_eq!(view.selected().id, "A");
        assert_eq!(view.selected().role, NodeRole::Seed);
    }

    #[test]
    fn test_select_notifies_every_time() {
        let mut view = view();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        view.on_selection_changed(move |node| sink.lock().unwrap().push(node.id.clone()));

        view.select("B").unwrap();
        view.select("B").unwrap();
        view.select("A").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["B", "B", "A"]);
        assert_eq!(view.selected().id, "A");
    }

    #[test]
    fn test_select_unknown_node() {
        let mut view = view();
        let err = view.select("Z").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NodeNotFound);
        assert_eq!(view.selected().id, "A");
    }
}
