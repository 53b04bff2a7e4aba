//! Seed expansion over backward and forward citation links
//!
//! Breadth-first worklist of `(record, level)` pairs. A node is expanded only
//! while its level is below the depth bound, every node is enqueued at most
//! once, and within one node backward links are followed before forward
//! links, so identical inputs always give identical graphs.

use super::graph::{CitationGraph, NodeRole};
use super::Depth;
use citescope_common::errors::{AppError, Result};
use citescope_common::metrics;
use citescope_common::models::Record;
use citescope_common::openalex::WorkSource;
use citescope_common::store::{RecordStore, RemoteCache};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Remote fallback used when the local store cannot resolve an id
#[derive(Clone, Copy)]
pub struct RemoteLookup<'a> {
    pub source: &'a dyn WorkSource,
    pub cache: &'a RemoteCache,

    /// Cap on citing works fetched per node
    pub per_page: usize,
}

/// Builds citation graphs from explicitly passed data; holds no state of its own
pub struct GraphBuilder<'a> {
    store: &'a RecordStore,
    remote: Option<RemoteLookup<'a>>,
}

impl<'a> GraphBuilder<'a> {
    /// Builder that only follows links present in the local store
    pub fn local(store: &'a RecordStore) -> Self {
        Self { store, remote: None }
    }

    /// Allow unresolved ids and cited-by handles to go to the remote source
    pub fn with_remote(mut self, remote: RemoteLookup<'a>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Expand `seed_id` up to `depth` hops in both citation directions
    #[instrument(skip(self), fields(remote = self.remote.is_some()))]
    pub async fn build(&self, seed_id: &str, depth: Depth) -> Result<CitationGraph> {
        let start = Instant::now();
        let seed = self
            .store
            .lookup(seed_id)
            .cloned()
            .ok_or_else(|| AppError::RecordNotFound {
                id: seed_id.to_string(),
            })?;

        let max_level = depth.get();
        let mut graph = CitationGraph::new(seed.clone(), max_level);
        let mut queue = VecDeque::from([(seed, 0usize)]);

        while let Some((current, level)) = queue.pop_front() {
            if level >= max_level {
                continue;
            }

            for reference_id in &current.backward_citations {
                let Some(cited) = self.resolve(reference_id, &mut graph).await else {
                    continue;
                };
                if cited.id == current.id {
                    continue;
                }

                graph.add_edge(&current.id, &cited.id);
                if graph.add_node(cited.clone(), NodeRole::Backward, level + 1) {
                    queue.push_back((cited, level + 1));
                }
            }

            for citing in self.citers(&current, &mut graph).await {
                if citing.id == current.id {
                    continue;
                }

                graph.add_edge(&citing.id, &current.id);
                if graph.add_node(citing.clone(), NodeRole::Forward, level + 1) {
                    queue.push_back((citing, level + 1));
                }
            }
        }

        graph.stats.duration_ms = start.elapsed().as_millis() as u64;
        metrics::record_graph_build(
            start.elapsed().as_secs_f64(),
            graph.node_count(),
            graph.edge_count(),
            self.is_remote(),
        );
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            skipped = graph.stats.skipped_unresolved,
            failed = graph.stats.failed_fetches,
            remote_calls = graph.stats.remote_calls,
            "Citation graph built"
        );

        Ok(graph)
    }

    /// Resolve a citation id: graph, local store, remote cache, then remote fetch
    async fn resolve(&self, id: &str, graph: &mut CitationGraph) -> Option<Arc<Record>> {
        if let Some(node) = graph.node(id) {
            return Some(node.record.clone());
        }
        if let Some(record) = self.store.lookup(id) {
            return Some(record.clone());
        }

        let Some(remote) = self.remote else {
            graph.stats.skipped_unresolved += 1;
            return None;
        };

        if let Some(record) = remote.cache.get(id).await {
            return Some(record);
        }

        graph.stats.remote_calls += 1;
        match remote.source.fetch_work(id).await {
            Ok(record) => Some(remote.cache.insert(id, record).await),
            // unknown upstream as well: unresolvable, not a failed fetch
            Err(AppError::RemoteFetch {
                status: Some(404), ..
            }) => {
                graph.stats.skipped_unresolved += 1;
                debug!(id, "Reference unknown to the remote source");
                None
            }
            Err(e) => {
                graph.stats.failed_fetches += 1;
                warn!(id, error = %e, "Dropping branch after failed remote lookup");
                None
            }
        }
    }

    /// Works citing `record`: the materialized list if any, else one remote page
    async fn citers(&self, record: &Record, graph: &mut CitationGraph) -> Vec<Arc<Record>> {
        if !record.needs_remote_citers() {
            let mut citers = Vec::with_capacity(record.forward_citations.len());
            for id in &record.forward_citations {
                if let Some(citing) = self.resolve(id, graph).await {
                    citers.push(citing);
                }
            }
            return citers;
        }

        let (Some(remote), Some(url)) = (self.remote, record.cited_by_api_url.as_deref()) else {
            return Vec::new();
        };

        let page = match remote.cache.get_citers(url).await {
            Some(cached) => cached,
            None => {
                graph.stats.remote_calls += 1;
                match remote.source.fetch_citing_works(url, remote.per_page).await {
                    Ok(works) => remote.cache.insert_citers(url, works).await,
                    Err(e) => {
                        graph.stats.failed_fetches += 1;
                        warn!(id = %record.id, error = %e, "Dropping cited-by branch after failed remote lookup");
                        return Vec::new();
                    }
                }
            }
        };

        debug!(id = %record.id, citers = page.len(), "Resolved cited-by page");

        // Authoritative local copies win over remote normalizations
        page.into_iter()
            .map(|citing| {
                graph
                    .node(&citing.id)
                    .map(|n| n.record.clone())
                    .or_else(|| self.store.lookup(&citing.id).cloned())
                    .unwrap_or(citing)
            })
            .collect()
    }
}
