//! HTTP client for the OpenAlex works API

use super::normalize::{api_suffix, normalize_work, Work, WorkPage};
use super::throttle::Throttle;
use super::WorkSource;
use crate::config::RemoteConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::models::Record;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

pub struct OpenAlexClient {
    client: reqwest::Client,
    base_url: String,
    reference_limit: usize,
    mailto: Option<String>,
    throttle: Throttle,
}

impl OpenAlexClient {
    /// Create a client from remote settings
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("citescope/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: reqwest::Client, config: &RemoteConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            reference_limit: config.reference_limit,
            mailto: config.mailto.clone(),
            throttle: Throttle::new(config.throttle()),
        }
    }

    /// URL of a single work
    pub fn work_url(&self, id: &str) -> String {
        format!("{}{}", self.base_url, api_suffix(id))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        kind: &str,
    ) -> Result<T> {
        self.throttle.wait().await;

        let mut request = self.client.get(url).query(query);
        if let Some(mailto) = &self.mailto {
            request = request.query(&[("mailto", mailto)]);
        }

        let result = async {
            let response = request.send().await.map_err(|e| AppError::RemoteFetch {
                url: url.to_string(),
                status: None,
                message: format!("Request failed: {}", e),
            })?;

            if !response.status().is_success() {
                return Err(AppError::remote_status(url, response.status().as_u16()));
            }

            response.json::<T>().await.map_err(|e| AppError::RemoteFetch {
                url: url.to_string(),
                status: None,
                message: format!("Failed to parse response: {}", e),
            })
        }
        .await;

        metrics::record_remote_call(kind, result.is_ok());
        if let Err(e) = &result {
            warn!(url, kind, error = %e, "OpenAlex request failed");
        }

        result
    }
}

#[async_trait]
impl WorkSource for OpenAlexClient {
    #[instrument(skip(self))]
    async fn fetch_work(&self, id: &str) -> Result<Record> {
        let url = self.work_url(id);
        let work: Work = self.get_json(&url, &[], "work").await?;

        debug!(id, references = work.referenced_works.len(), "Fetched work");
        Ok(normalize_work(work, id, self.reference_limit))
    }

    #[instrument(skip(self))]
    async fn fetch_citing_works(&self, cited_by_api_url: &str, per_page: usize) -> Result<Vec<Record>> {
        let query = [("per_page", per_page.to_string())];
        let page: WorkPage = self.get_json(cited_by_api_url, &query, "cited_by").await?;

        debug!(results = page.results.len(), "Fetched cited-by page");
        Ok(page
            .results
            .into_iter()
            .filter(|w| w.id.is_some())
            .take(per_page)
            .map(|w| normalize_work(w, "", self.reference_limit))
            .collect())
    }
}
