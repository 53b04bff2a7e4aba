//! In-memory record store
//!
//! Provides:
//! - One-shot loading from a file path or http(s) URL
//! - O(1) identifier lookup for graph traversal
//! - Filter / sort / paginate queries for listings
//! - A session cache for records normalized from the OpenAlex API

mod loader;
mod query;
mod remote_cache;

pub use loader::{load, parse_corpus};
pub use query::{Page, RecordQuery, SortOrder};
pub use remote_cache::RemoteCache;

use crate::models::Record;
use std::collections::HashMap;
use std::sync::Arc;

/// Authoritative local records, immutable after construction
#[derive(Debug, Default)]
pub struct RecordStore {
    /// Records in source order
    records: Vec<Arc<Record>>,

    /// id -> position in `records`
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// Build the store, keeping the first record seen for a repeated id
    pub fn new(records: Vec<Record>) -> Self {
        let mut store = Self {
            records: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
        };

        for record in records {
            if store.index.contains_key(&record.id) {
                tracing::warn!(id = %record.id, "Duplicate record id, keeping first occurrence");
                continue;
            }
            store.index.insert(record.id.clone(), store.records.len());
            store.records.push(Arc::new(record));
        }

        store
    }

    /// Store with no records
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a record by identifier
    pub fn lookup(&self, id: &str) -> Option<&Arc<Record>> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All records in source order
    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
