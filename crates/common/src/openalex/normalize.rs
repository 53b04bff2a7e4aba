//! OpenAlex work schema and its reduction to a traversal-ready [`Record`]

use crate::models::{CitationCounts, Record};
use serde::Deserialize;

/// Prefix stripped from record ids to form the API path suffix
pub const OPENALEX_ID_PREFIX: &str = "https://openalex.org/";

/// Subset of an OpenAlex work; other fields are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Work {
    pub id: Option<String>,

    pub display_name: Option<String>,

    pub title: Option<String>,

    #[serde(default)]
    pub referenced_works: Vec<String>,

    pub referenced_works_count: Option<u64>,

    pub cited_by_count: Option<u64>,

    pub cited_by_api_url: Option<String>,
}

/// One page of a cited-by listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkPage {
    #[serde(default)]
    pub results: Vec<Work>,
}

/// Turn a record id into the suffix appended to the work endpoint
pub fn api_suffix(id: &str) -> &str {
    id.strip_prefix(OPENALEX_ID_PREFIX)
        .or_else(|| id.strip_prefix("http://openalex.org/"))
        .unwrap_or(id)
}

/// Keep only the fields traversal needs.
///
/// `fallback_id` is used when the payload carries no id of its own.
/// `referenced_works` is cut to `reference_limit` entries.
pub fn normalize_work(work: Work, fallback_id: &str, reference_limit: usize) -> Record {
    let backward_total = work
        .referenced_works_count
        .unwrap_or(work.referenced_works.len() as u64);

    let mut backward_citations = work.referenced_works;
    backward_citations.truncate(reference_limit);

    Record {
        id: work.id.unwrap_or_else(|| fallback_id.to_string()),
        title: work.display_name.or(work.title).unwrap_or_default(),
        citation_counts: CitationCounts {
            forward: work.cited_by_count.unwrap_or(0),
            backward: backward_total,
        },
        backward_citations,
        cited_by_api_url: work.cited_by_api_url,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_suffix() {
        assert_eq!(api_suffix("https://openalex.org/W2741809807"), "W2741809807");
        assert_eq!(api_suffix("W42"), "W42");
        assert_eq!(api_suffix("doi:10.1/x"), "doi:10.1/x");
    }

    #[test]
    fn test_normalize_truncates_references() {
        let work: Work = serde_json::from_value(json!({
            "id": "https://openalex.org/W1",
            "display_name": "Ocean acidification",
            "referenced_works": ["https://openalex.org/W2", "https://openalex.org/W3", "https://openalex.org/W4"],
            "referenced_works_count": 3,
            "cited_by_count": 88,
            "cited_by_api_url": "https://api.openalex.org/works?filter=cites:W1",
            "topics": [{"display_name": "Oceanography"}],
            "authorships": []
        }))
        .unwrap();

        let record = normalize_work(work, "W1", 2);

        assert_eq!(record.id, "https://openalex.org/W1");
        assert_eq!(record.title, "Ocean acidification");
        assert_eq!(record.backward_citations.len(), 2);
        assert_eq!(record.citation_counts.backward, 3);
        assert_eq!(record.citation_counts.forward, 88);
        assert!(record.needs_remote_citers());
        // Non-traversal fields are not carried over
        assert!(record.topics.is_empty());
    }

    #[test]
    fn test_normalize_sparse_work() {
        let record = normalize_work(Work::default(), "W5", 50);
        assert_eq!(record.id, "W5");
        assert!(record.title.is_empty());
        assert_eq!(record.citation_counts, CitationCounts::default());
    }
}
