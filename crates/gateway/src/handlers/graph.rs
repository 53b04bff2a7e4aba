//! Citation graph handlers: build, inspect, select, export

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{ActiveGraph, AppState};
use citescope_common::{
    errors::{AppError, Result},
    metrics,
    models::Record,
};
use citescope_graph::{
    citation::GraphNode, export_nodes_csv, CitationGraph, Depth, GraphBuilder, GraphView,
    RemoteLookup,
};

/// Build request
#[derive(Debug, Deserialize, Validate)]
pub struct BuildGraphRequest {
    /// Seed record ID; must exist in the local store
    #[validate(length(min = 1, max = 2048))]
    pub seed: String,

    /// Hops to expand; numbers or numeric strings, anything else means 1
    #[serde(default)]
    pub depth: Option<Value>,

    /// Override the configured remote mode for this build
    #[serde(default)]
    pub remote: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SelectRequest {
    #[validate(length(min = 1, max = 2048))]
    pub id: String,
}

#[derive(Serialize)]
pub struct GraphResponse {
    pub build_id: Uuid,

    /// ID of the selected node
    pub selected: String,

    #[serde(flatten)]
    pub graph: CitationGraph,
}

impl From<&ActiveGraph> for GraphResponse {
    fn from(active: &ActiveGraph) -> Self {
        Self {
            build_id: active.build_id,
            selected: active.view.selected().id.clone(),
            graph: active.view.graph().clone(),
        }
    }
}

#[derive(Serialize)]
pub struct SelectionResponse {
    pub build_id: Uuid,
    pub node: GraphNode,
    pub record: Record,
}

/// Build a graph around a seed and make it the current one
pub async fn build_graph(
    State(state): State<AppState>,
    Json(request): Json<BuildGraphRequest>,
) -> Result<Json<GraphResponse>> {
    request.validate()?;

    let config = &state.config;
    let depth = request
        .depth
        .as_ref()
        .map(Depth::from_value)
        .unwrap_or_else(|| Depth::new(config.graph.default_depth))
        .clamp_to(config.graph.max_depth);

    let mut builder = GraphBuilder::local(&state.store);
    match (request.remote, state.remote.as_deref()) {
        (Some(true), None) => {
            return Err(AppError::Validation {
                message: "Remote lookups are disabled".to_string(),
                field: Some("remote".to_string()),
            });
        }
        (Some(false), _) | (None, None) => {}
        (_, Some(source)) => {
            builder = builder.with_remote(RemoteLookup {
                source,
                cache: &state.remote_cache,
                per_page: config.remote.per_page,
            });
        }
    }

    // No lock is held while building; the result replaces the previous graph
    let graph = builder.build(&request.seed, depth).await?;

    let build_id = Uuid::new_v4();
    let mut view = GraphView::new(graph);
    view.on_selection_changed(move |node| {
        info!(
            %build_id,
            id = %node.id,
            role = node.role.as_str(),
            level = node.level,
            "Node selected"
        );
        metrics::record_selection(node.role.as_str());
    });

    let active = ActiveGraph { build_id, view };
    let response = GraphResponse::from(&active);
    *state.current_graph.write().await = Some(active);

    Ok(Json(response))
}

/// The graph from the most recent build
pub async fn current_graph(State(state): State<AppState>) -> Result<Json<GraphResponse>> {
    let current = state.current_graph.read().await;
    let active = current.as_ref().ok_or(AppError::NoActiveGraph)?;

    Ok(Json(GraphResponse::from(active)))
}

/// Activate a node of the current graph
pub async fn select_node(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectionResponse>> {
    request.validate()?;

    let mut current = state.current_graph.write().await;
    let active = current.as_mut().ok_or(AppError::NoActiveGraph)?;
    let build_id = active.build_id;
    let node = active.view.select(&request.id)?;

    Ok(Json(SelectionResponse {
        build_id,
        record: node.record.as_ref().clone(),
        node: node.clone(),
    }))
}

/// Download the current graph's nodes as CSV
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let current = state.current_graph.read().await;
    let active = current.as_ref().ok_or(AppError::NoActiveGraph)?;
    let csv = export_nodes_csv(active.view.graph())?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"citation-graph.csv\"",
            ),
        ],
        csv,
    ))
}
