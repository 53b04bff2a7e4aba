//! Corpus loading from disk or HTTP

use super::RecordStore;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::models::Record;
use serde::Deserialize;
use tracing::{info, instrument};

/// Top-level shape of the export; a missing or null `records` is an empty corpus
#[derive(Deserialize)]
struct Corpus {
    #[serde(default)]
    records: Option<Vec<Record>>,
}

/// Load the record store from a filesystem path or an http(s) URL
#[instrument(skip(http))]
pub async fn load(source: &str, http: &reqwest::Client) -> Result<RecordStore> {
    let bytes = if is_http(source) {
        fetch(source, http).await?
    } else {
        let path = source.strip_prefix("file://").unwrap_or(source);
        tokio::fs::read(path).await.map_err(|e| AppError::Load {
            source_path: source.to_string(),
            message: e.to_string(),
        })?
    };

    let records = parse_corpus(&bytes, source)?;
    let store = RecordStore::new(records);

    metrics::record_store_loaded(store.len());
    info!(records = store.len(), "Record store loaded");

    Ok(store)
}

/// Parse the export document into records
pub fn parse_corpus(bytes: &[u8], source: &str) -> Result<Vec<Record>> {
    let corpus: Corpus = serde_json::from_slice(bytes).map_err(|e| AppError::Load {
        source_path: source.to_string(),
        message: format!("Invalid JSON: {}", e),
    })?;

    Ok(corpus.records.unwrap_or_default())
}

fn is_http(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch(url: &str, http: &reqwest::Client) -> Result<Vec<u8>> {
    let load_error = |message: String| AppError::Load {
        source_path: url.to_string(),
        message,
    };

    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| load_error(format!("Request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(load_error(format!("HTTP {}", response.status())));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| load_error(format!("Failed to read body: {}", e)))?;

    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_missing_records_is_empty() {
        assert!(parse_corpus(br#"{"generated": "2024-01-01"}"#, "mem").unwrap().is_empty());
        assert!(parse_corpus(br#"{"records": null}"#, "mem").unwrap().is_empty());
    }

    #[test]
    fn test_null_fields_do_not_reject_the_corpus() {
        let records = parse_corpus(
            br#"{"records": [
                {"id": "A", "title": "ok"},
                {"id": "B", "title": null, "forward_citations": null, "citation_counts": null}
            ]}"#,
            "mem",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "B");
        assert!(records[1].title.is_empty());
        assert!(records[1].forward_citations.is_empty());
    }

    #[test]
    fn test_invalid_json_is_load_error() {
        let err = parse_corpus(b"{not json", "mem").unwrap_err();
        assert_eq!(err.code(), ErrorCode::LoadError);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("citescope-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &path,
            br#"{"records": [{"id": "A", "title": "Alpha"}, {"id": "B"}]}"#,
        )
        .await
        .unwrap();

        let store = load(path.to_str().unwrap(), &reqwest::Client::new()).await.unwrap();
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("A").unwrap().title, "Alpha");
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let err = load("/definitely/not/here.json", &reqwest::Client::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::LoadError);
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/corpus.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"records": [{"id": "A"}]}"#)
            .create_async()
            .await;
        let missing = server
            .mock("GET", "/gone.json")
            .with_status(404)
            .create_async()
            .await;

        let http = reqwest::Client::new();
        let store = load(&format!("{}/corpus.json", server.url()), &http).await.unwrap();
        assert!(store.contains("A"));

        let err = load(&format!("{}/gone.json", server.url()), &http).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::LoadError);
        assert!(err.to_string().contains("404"));

        ok.assert_async().await;
        missing.assert_async().await;
    }
}
