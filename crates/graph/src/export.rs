//! CSV export of graph nodes

use crate::citation::{CitationGraph, GraphNode};
use citescope_common::errors::{AppError, Result};
use serde::Serialize;

/// One exported node; field order is the column order
#[derive(Serialize)]
struct NodeRow<'a> {
    id: &'a str,
    title: &'a str,
    role: &'static str,
    level: usize,
    url: &'a str,
    backward_count: u64,
    forward_count: u64,
}

impl<'a> From<&'a GraphNode> for NodeRow<'a> {
    fn from(node: &'a GraphNode) -> Self {
        let record = &node.record;
        Self {
            id: &node.id,
            title: &node.label,
            role: node.role.as_str(),
            level: node.level,
            url: record.url.as_deref().unwrap_or_default(),
            backward_count: record.citation_counts.backward,
            forward_count: record.citation_counts.forward,
        }
    }
}

fn csv_error(e: impl std::fmt::Display) -> AppError {
    AppError::Internal {
        message: format!("CSV export failed: {}", e),
    }
}

/// Header plus one line per node in discovery order, every field quoted
pub fn export_nodes_csv(graph: &CitationGraph) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for node in graph.nodes() {
        writer.serialize(NodeRow::from(node)).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::NodeRole;
    use citescope_common::models::{CitationCounts, Record};
    use std::sync::Arc;

    #[test]
    fn test_export_quotes_and_escapes() {
        let seed = Arc::new(Record {
            id: "https://openalex.org/W1".into(),
            title: "The \"reef\" paradox, revisited".into(),
            url: Some("https://doi.org/10.1/reef".into()),
            citation_counts: CitationCounts { forward: 12, backward: 3 },
            ..Default::default()
        });
        let cited = Arc::new(Record {
            id: "https://openalex.org/W2".into(),
            title: "Line one\nline two".into(),
            ..Default::default()
        });

        let mut graph = CitationGraph::new(seed, 1);
        graph.add_node(cited, NodeRole::Backward, 1);

        let csv = export_nodes_csv(&graph).unwrap();
        let mut lines = csv.split_terminator('\n');

        assert_eq!(
            lines.next().unwrap(),
            r#""id","title","role","level","url","backward_count","forward_count""#
        );
        assert_eq!(
            lines.next().unwrap(),
            r#""https://openalex.org/W1","The ""reef"" paradox, revisited","seed","0","https://doi.org/10.1/reef","3","12""#
        );
        // embedded newline stays inside the quoted field
        assert!(csv.contains("\"Line one\nline two\",\"backward\",\"1\",\"\",\"0\",\"0\"\n"));
    }

    #[test]
    fn test_export_parses_back_with_a_csv_reader() {
        let seed = Arc::new(Record {
            id: "W1".into(),
            title: "Comma, \"quote\" and\nnewline".into(),
            ..Default::default()
        });
        let graph = CitationGraph::new(seed, 1);

        let csv = export_nodes_csv(&graph).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["id", "title", "role", "level", "url", "backward_count", "forward_count"]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "Comma, \"quote\" and\nnewline");
        assert_eq!(&rows[0][2], "seed");
    }
}
