//! Record listing and lookup handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use citescope_common::{
    errors::{AppError, Result},
    metrics,
    models::Record,
    store::RecordQuery,
};

/// One row of the listing table
#[derive(Serialize)]
pub struct RecordSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub authors: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    pub open_access: bool,
    pub forward_citations: u64,
    pub backward_citations: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Record> for RecordSummary {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            year: record.year(),
            authors: record.author_names(),
            journal: record.journal.clone(),
            open_access: record.open_access,
            forward_citations: record.citation_counts.forward,
            backward_citations: record.citation_counts.backward,
            url: record.url.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ListRecordsResponse {
    pub items: Vec<RecordSummary>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LookupParams {
    #[validate(length(min = 1, max = 2048))]
    pub id: String,
}

/// Where a looked-up record came from
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    Local,
    Remote,
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub origin: RecordOrigin,
    pub record: Record,
}

/// Filter, sort and paginate the local store
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<ListRecordsResponse>> {
    query.validate()?;

    let listing = &state.config.listing;
    let page = query.run(&state.store, listing.default_page_size, listing.max_page_size);

    metrics::record_listing(query.sort.as_str(), page.total);
    tracing::debug!(total = page.total, page = page.page, "Listing query");

    Ok(Json(ListRecordsResponse {
        items: page.items.iter().map(|r| RecordSummary::from(r.as_ref())).collect(),
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
    }))
}

/// Get a single record, falling back to remote records cached this session
pub async fn lookup_record(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<RecordResponse>> {
    params.validate()?;

    if let Some(record) = state.store.lookup(&params.id) {
        return Ok(Json(RecordResponse {
            origin: RecordOrigin::Local,
            record: record.as_ref().clone(),
        }));
    }

    let cached = state
        .remote_cache
        .get(&params.id)
        .await
        .ok_or_else(|| AppError::RecordNotFound { id: params.id.clone() })?;

    Ok(Json(RecordResponse {
        origin: RecordOrigin::Remote,
        record: cached.as_ref().clone(),
    }))
}
