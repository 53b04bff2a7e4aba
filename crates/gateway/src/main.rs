//! citescope API Gateway
//!
//! HTTP surface over the record store and the citation graph builder.
//! Handles:
//! - Record listing (search, filters, sorting, pagination) and lookup
//! - Citation graph builds, node selection and CSV export
//! - Observability (logging, metrics, tracing)

mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use citescope_common::{
    config::{AppConfig, ObservabilityConfig},
    metrics::{self, GRAPH_BUILD_BUCKETS, METRICS_PREFIX},
    store::{self, RecordStore, RemoteCache},
    OpenAlexClient, WorkSource,
};
use citescope_graph::GraphView;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// The graph currently on screen
pub struct ActiveGraph {
    pub build_id: Uuid,
    pub view: GraphView,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<RecordStore>,

    /// Present only when remote lookups are enabled
    pub remote: Option<Arc<dyn WorkSource>>,
    pub remote_cache: Arc<RemoteCache>,

    /// Replaced wholesale on every build
    pub current_graph: Arc<RwLock<Option<ActiveGraph>>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: RecordStore, remote: Option<Arc<dyn WorkSource>>) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            remote,
            remote_cache: Arc::new(RemoteCache::new()),
            current_graph: Arc::new(RwLock::new(None)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration; APP_CONFIG_FILE replaces the config/ directory lookup
    let config = match std::env::var("APP_CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => AppConfig::load()?,
    };

    init_tracing(&config.observability);
    info!(
        service = %config.observability.service_name,
        "Starting citescope API Gateway v{}",
        citescope_common::VERSION
    );

    init_metrics(&config.observability)?;

    let http = reqwest_client(&config)?;

    // A failed load leaves an empty store; listings render their empty state
    let store = match store::load(&config.data.source, &http).await {
        Ok(store) => store,
        Err(e) => {
            error!(source = %config.data.source, error = %e, "Failed to load records, starting with an empty store");
            RecordStore::empty()
        }
    };
    if store.is_empty() {
        warn!("Record store is empty");
    }

    let remote: Option<Arc<dyn WorkSource>> = if config.remote.enabled {
        info!(
            base_url = %config.remote.base_url,
            throttle_ms = config.remote.throttle_ms,
            per_page = config.remote.per_page,
            "OpenAlex lookups enabled"
        );
        Some(Arc::new(OpenAlexClient::new(&config.remote)?))
    } else {
        None
    };

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    // Create app state
    let state = AppState::new(config, store, remote);

    // Build the router
    let app = create_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn init_metrics(config: &ObservabilityConfig) -> anyhow::Result<()> {
    if config.metrics_port == 0 {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    PrometheusBuilder::new()
        .with_http_listener(SocketAddr::from(([0, 0, 0, 0], config.metrics_port)))
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_graph_build_duration_seconds", METRICS_PREFIX)),
            GRAPH_BUILD_BUCKETS,
        )?
        .install()?;

    metrics::register_metrics();
    info!(port = config.metrics_port, "Prometheus exporter listening");
    Ok(())
}

/// Client used to fetch an http(s) data source
fn reqwest_client(config: &AppConfig) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?)
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let timeout = TimeoutLayer::new(state.config.request_timeout());

    // API routes
    let api_routes = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Record endpoints
        .route("/records", get(handlers::records::list_records))
        .route("/records/lookup", get(handlers::records::lookup_record))

        // Citation graph endpoints
        .route("/graph", post(handlers::graph::build_graph).get(handlers::graph::current_graph))
        .route("/graph/select", post(handlers::graph::select_node))
        .route("/graph/export.csv", get(handlers::graph::export_csv));

    // Compose the app
    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
