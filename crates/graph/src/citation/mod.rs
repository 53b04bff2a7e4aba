//! Citation network expansion
//!
//! Builds a deduplicated node/edge set around a seed record by following
//! backward (cites) and forward (cited-by) links up to a hop bound.

mod builder;
mod depth;
mod graph;
mod selection;

pub use builder::{GraphBuilder, RemoteLookup};
pub use depth::Depth;
pub use graph::{BuildStats, CitationEdge, CitationGraph, GraphNode, NodeRole};
pub use selection::{GraphView, SelectionListener};
