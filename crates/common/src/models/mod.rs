//! Record data model

pub mod record;

pub use record::{Author, CitationCounts, Record, Topic};
