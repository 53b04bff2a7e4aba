//! OpenAlex lookups
//!
//! Provides a unified interface for resolving works that are missing from
//! the local export:
//! - Single work lookup by id
//! - One capped page of citing works through `cited_by_api_url`
//! - A fixed minimum delay between consecutive calls

mod client;
mod normalize;
mod throttle;

pub use client::OpenAlexClient;
pub use normalize::{api_suffix, normalize_work, Work, WorkPage, OPENALEX_ID_PREFIX};
pub use throttle::Throttle;

use crate::errors::Result;
use crate::models::Record;
use async_trait::async_trait;

/// Source of remotely resolved records
#[async_trait]
pub trait WorkSource: Send + Sync {
    /// Resolve one work into a traversal-ready record
    async fn fetch_work(&self, id: &str) -> Result<Record>;

    /// Fetch at most `per_page` works citing the record behind `cited_by_api_url`
    async fn fetch_citing_works(&self, cited_by_api_url: &str, per_page: usize) -> Result<Vec<Record>>;
}
