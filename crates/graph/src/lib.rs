//! citescope Graph Library
//!
//! - Citation network expansion from a seed record (local or OpenAlex-backed)
//! - Selection tracking over a built graph
//! - CSV export of graph nodes

pub mod citation;
pub mod export;

pub use citation::{CitationGraph, Depth, GraphBuilder, GraphView, NodeRole, RemoteLookup};
pub use export::export_nodes_csv;
