//! Record listing: filter, sort and paginate

use super::RecordStore;
use crate::models::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use validator::Validate;

/// Listing filters as received from the query string
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecordQuery {
    /// Case-insensitive title substring
    #[validate(length(max = 500))]
    pub q: Option<String>,

    /// Minimum forward citation count, inclusive
    pub min_citations: Option<u64>,

    pub year_from: Option<i32>,

    pub year_to: Option<i32>,

    pub open_access: Option<bool>,

    /// Case-insensitive substring of any topic name
    #[validate(length(max = 200))]
    pub topic: Option<String>,

    /// Case-insensitive journal substring
    #[validate(length(max = 200))]
    pub journal: Option<String>,

    #[serde(default)]
    pub sort: SortOrder,

    /// 1-based
    #[validate(range(min = 1))]
    pub page: Option<usize>,

    #[validate(range(min = 1))]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Source order
    #[default]
    Relevance,
    YearDesc,
    YearAsc,
    CitationsDesc,
    Title,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::YearDesc => "year_desc",
            SortOrder::YearAsc => "year_asc",
            SortOrder::CitationsDesc => "citations_desc",
            SortOrder::Title => "title",
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

impl RecordQuery {
    /// Whether a record passes every filter
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(q) = needle(&self.q) {
            if !record.title.to_lowercase().contains(&q) {
                return false;
            }
        }

        if let Some(min) = self.min_citations {
            if record.citation_counts.forward < min {
                return false;
            }
        }

        if self.year_from.is_some() || self.year_to.is_some() {
            let Some(year) = record.year() else {
                return false;
            };
            if self.year_from.is_some_and(|from| year < from) {
                return false;
            }
            if self.year_to.is_some_and(|to| year > to) {
                return false;
            }
        }

        if let Some(open_access) = self.open_access {
            if record.open_access != open_access {
                return false;
            }
        }

        if let Some(topic) = needle(&self.topic) {
            if !record
                .topics
                .iter()
                .any(|t| t.name.to_lowercase().contains(&topic))
            {
                return false;
            }
        }

        if let Some(journal) = needle(&self.journal) {
            let found = record
                .journal
                .as_deref()
                .is_some_and(|j| j.to_lowercase().contains(&journal));
            if !found {
                return false;
            }
        }

        true
    }

    /// Run the query against the store
    pub fn run(
        &self,
        store: &RecordStore,
        default_page_size: usize,
        max_page_size: usize,
    ) -> Page<Arc<Record>> {
        let mut hits: Vec<&Arc<Record>> = store
            .records()
            .iter()
            .filter(|r| self.matches(r))
            .collect();

        sort_records(&mut hits, self.sort);

        let page_size = self
            .page_size
            .unwrap_or(default_page_size)
            .clamp(1, max_page_size.max(1));
        let page = self.page.unwrap_or(1).max(1);
        let total = hits.len();
        let total_pages = total.div_ceil(page_size);

        let items = hits
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

fn sort_records(records: &mut [&Arc<Record>], order: SortOrder) {
    // Records without a year sort last in both directions
    fn by_year(a: Option<i32>, b: Option<i32>, descending: bool) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) if descending => b.cmp(&a),
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    match order {
        SortOrder::Relevance => {}
        SortOrder::YearDesc => records.sort_by(|a, b| by_year(a.year(), b.year(), true)),
        SortOrder::YearAsc => records.sort_by(|a, b| by_year(a.year(), b.year(), false)),
        SortOrder::CitationsDesc => records.sort_by(|a, b| {
            b.citation_counts.forward.cmp(&a.citation_counts.forward)
        }),
        SortOrder::Title => {
            records.sort_by_cached_key(|r| r.title.to_lowercase());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CitationCounts, Topic};

    fn record(id: &str, title: &str, year: i32, forward: u64) -> Record {
        Record {
            id: id.into(),
            title: title.into(),
            publication_year: Some(year),
            citation_counts: CitationCounts { forward, backward: 0 },
            ..Default::default()
        }
    }

    fn store() -> RecordStore {
        let mut oa = record("C", "Coral bleaching thresholds", 2015, 40);
        oa.open_access = true;
        oa.journal = Some("Nature Climate Change".into());
        oa.topics = vec![Topic {
            name: "Marine heatwaves".into(),
            ..Default::default()
        }];

        RecordStore::new(vec![
            record("A", "Reef fish recovery", 2010, 5),
            record("B", "Seagrass carbon", 2020, 10),
            oa,
            record("D", "Reef restoration economics", 2018, 10),
        ])
    }

    fn ids(page: &Page<Arc<Record>>) -> Vec<&str> {
        page.items.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_min_citations_boundary_is_inclusive() {
        let query = RecordQuery {
            min_citations: Some(10),
            ..Default::default()
        };
        let page = query.run(&store(), 25, 100);
        assert_eq!(ids(&page), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_title_search_is_case_insensitive() {
        let query = RecordQuery {
            q: Some("  REEF ".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.run(&store(), 25, 100)), vec!["A", "D"]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let query = RecordQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.run(&store(), 25, 100).total, 4);
    }

    #[test]
    fn test_year_range_and_facets() {
        let query = RecordQuery {
            year_from: Some(2012),
            year_to: Some(2018),
            ..Default::default()
        };
        assert_eq!(ids(&query.run(&store(), 25, 100)), vec!["C", "D"]);

        let query = RecordQuery {
            open_access: Some(true),
            topic: Some("heatwave".into()),
            journal: Some("nature".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.run(&store(), 25, 100)), vec!["C"]);
    }

    #[test]
    fn test_sorting() {
        let mut query = RecordQuery {
            sort: SortOrder::CitationsDesc,
            ..Default::default()
        };
        // stable sort keeps B before D on equal counts
        assert_eq!(ids(&query.run(&store(), 25, 100)), vec!["C", "B", "D", "A"]);

        query.sort = SortOrder::YearAsc;
        assert_eq!(ids(&query.run(&store(), 25, 100)), vec!["A", "C", "D", "B"]);

        query.sort = SortOrder::Title;
        assert_eq!(ids(&query.run(&store(), 25, 100)), vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn test_pagination() {
        let query = RecordQuery {
            page: Some(2),
            page_size: Some(3),
            ..Default::default()
        };
        let page = query.run(&store(), 25, 100);
        assert_eq!(ids(&page), vec!["D"]);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);

        let past_end = RecordQuery {
            page: Some(9),
            ..query
        };
        assert!(past_end.run(&store(), 25, 100).items.is_empty());
    }

    #[test]
    fn test_page_size_is_capped() {
        let query = RecordQuery {
            page_size: Some(10_000),
            ..Default::default()
        };
        assert_eq!(query.run(&store(), 25, 2).page_size, 2);
    }

    #[test]
    fn test_empty_store_gives_empty_page() {
        let page = RecordQuery::default().run(&RecordStore::empty(), 25, 100);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_validation_rejects_zero_page() {
        let query = RecordQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
