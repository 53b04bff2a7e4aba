//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming conventions.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram,
    gauge, histogram, Unit,
};

/// Metrics prefix for all citescope metrics
pub const METRICS_PREFIX: &str = "citescope";

/// Buckets for graph build latency in seconds (remote builds are slow)
pub const GRAPH_BUILD_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.025,  // 25ms
    0.100,  // 100ms
    0.500,  // 500ms
    1.000,  // 1s
    5.000,  // 5s
    15.00,  // 15s
    60.00,  // 1m
    300.0,  // 5m
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_gauge!(
        format!("{}_records_loaded", METRICS_PREFIX),
        Unit::Count,
        "Records held by the local store"
    );

    describe_counter!(
        format!("{}_listing_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total record listing queries"
    );

    describe_counter!(
        format!("{}_graph_builds_total", METRICS_PREFIX),
        Unit::Count,
        "Total citation graph builds"
    );

    describe_histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Citation graph build latency in seconds"
    );

    describe_gauge!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Nodes in the most recently built graph"
    );

    describe_gauge!(
        format!("{}_graph_edges", METRICS_PREFIX),
        Unit::Count,
        "Edges in the most recently built graph"
    );

    describe_counter!(
        format!("{}_remote_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total OpenAlex requests"
    );

    describe_counter!(
        format!("{}_cache_hits_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache hits"
    );

    describe_counter!(
        format!("{}_cache_misses_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache misses"
    );

    describe_counter!(
        format!("{}_node_selections_total", METRICS_PREFIX),
        Unit::Count,
        "Total graph node selections"
    );

    tracing::info!("Metrics registered");
}

/// Record the size of a freshly loaded store
pub fn record_store_loaded(records: usize) {
    gauge!(format!("{}_records_loaded", METRICS_PREFIX)).set(records as f64);
}

/// Helper to record listing metrics
pub fn record_listing(sort: &str, total: usize) {
    counter!(
        format!("{}_listing_queries_total", METRICS_PREFIX),
        "sort" => sort.to_string(),
        "empty" => (total == 0).to_string()
    )
    .increment(1);
}

/// Helper to record graph build metrics
pub fn record_graph_build(duration_secs: f64, nodes: usize, edges: usize, remote: bool) {
    let mode = if remote { "remote" } else { "local" };

    counter!(
        format!("{}_graph_builds_total", METRICS_PREFIX),
        "mode" => mode
    )
    .increment(1);

    histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        "mode" => mode
    )
    .record(duration_secs);

    gauge!(format!("{}_graph_nodes", METRICS_PREFIX)).set(nodes as f64);
    gauge!(format!("{}_graph_edges", METRICS_PREFIX)).set(edges as f64);
}

/// Helper to record a single OpenAlex call
pub fn record_remote_call(kind: &str, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_remote_requests_total", METRICS_PREFIX),
        "kind" => kind.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Helper to record cache metrics
pub fn record_cache(hit: bool, cache_name: &str) {
    if hit {
        counter!(
            format!("{}_cache_hits_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    } else {
        counter!(
            format!("{}_cache_misses_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    }
}

/// Helper to record a node selection
pub fn record_selection(role: &str) {
    counter!(
        format!("{}_node_selections_total", METRICS_PREFIX),
        "role" => role.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in GRAPH_BUILD_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_helpers_without_recorder() {
        // No recorder installed: every helper must be a no-op
        record_store_loaded(3);
        record_graph_build(0.01, 3, 2, false);
        record_remote_call("work", true);
        record_cache(false, "remote_records");
        record_selection("seed");
    }
}
