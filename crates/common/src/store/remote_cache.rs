//! Session cache for records normalized from the OpenAlex API
//!
//! Kept apart from [`RecordStore`](super::RecordStore) so remote data never
//! shadows authoritative local records.

use crate::metrics;
use crate::models::Record;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct RemoteCache {
    entries: RwLock<HashMap<String, Arc<Record>>>,

    /// cited_by_api_url -> ids of the citing works on the fetched page
    citers: RwLock<HashMap<String, Vec<String>>>,
}

impl RemoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached record
    pub async fn get(&self, id: &str) -> Option<Arc<Record>> {
        let hit = self.entries.read().await.get(id).cloned();
        metrics::record_cache(hit.is_some(), "remote_records");
        hit
    }

    /// Cache a record under the id it was requested by and under its own id
    pub async fn insert(&self, requested_id: &str, record: Record) -> Arc<Record> {
        let record = Arc::new(record);
        let mut entries = self.entries.write().await;

        if record.id != requested_id {
            debug!(requested = requested_id, canonical = %record.id, "Remote record id differs");
            entries.insert(record.id.clone(), record.clone());
        }
        entries.insert(requested_id.to_string(), record.clone());

        record
    }

    /// Citing works previously fetched for a cited-by handle
    pub async fn get_citers(&self, cited_by_api_url: &str) -> Option<Vec<Arc<Record>>> {
        let ids = self.citers.read().await.get(cited_by_api_url).cloned();
        metrics::record_cache(ids.is_some(), "remote_citers");

        let ids = ids?;
        let entries = self.entries.read().await;
        Some(ids.iter().filter_map(|id| entries.get(id).cloned()).collect())
    }

    /// Cache a fetched cited-by page and its works
    pub async fn insert_citers(&self, cited_by_api_url: &str, works: Vec<Record>) -> Vec<Arc<Record>> {
        let mut cached = Vec::with_capacity(works.len());
        for work in works {
            let id = work.id.clone();
            cached.push(self.insert(&id, work).await);
        }

        let ids = cached.iter().map(|r| r.id.clone()).collect();
        self.citers
            .write()
            .await
            .insert(cited_by_api_url.to_string(), ids);

        cached
    }

    /// Number of cached record keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_indexes_both_ids() {
        let cache = RemoteCache::new();
        let record = Record {
            id: "https://openalex.org/W7".into(),
            ..Default::default()
        };

        cache.insert("W7", record).await;

        assert!(cache.get("W7").await.is_some());
        assert!(cache.get("https://openalex.org/W7").await.is_some());
        assert_eq!(cache.len().await, 2);
        assert!(!cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_citers_round_trip_through_records() {
        let cache = RemoteCache::new();
        let url = "https://api.openalex.org/works?filter=cites:W1";
        assert!(cache.get_citers(url).await.is_none());

        let works = vec![
            Record { id: "W2".into(), ..Default::default() },
            Record { id: "W3".into(), ..Default::default() },
        ];
        cache.insert_citers(url, works).await;

        let citers = cache.get_citers(url).await.unwrap();
        let ids: Vec<_> = citers.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["W2", "W3"]);
        assert!(cache.get("W3").await.is_some());
    }

    #[test]
    fn test_miss_without_runtime() {
        let cache = RemoteCache::new();
        assert!(tokio_test::block_on(cache.get("nope")).is_none());
    }
}
