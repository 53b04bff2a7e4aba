//! citescope Common Library
//!
//! Shared code for the citescope crates including:
//! - Bibliographic record model
//! - Record store, listing queries and the remote session cache
//! - OpenAlex client with throttling
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod openalex;
pub mod store;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use config::AppConfig;
pub use models::Record;
pub use openalex::{OpenAlexClient, WorkSource};
pub use store::{RecordStore, RemoteCache};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
