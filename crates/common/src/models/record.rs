//! Bibliographic record from the enhanced OpenAlex export

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One bibliographic work
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Globally unique, usually `https://openalex.org/W...`
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// `YYYY-MM-DD`; kept as text so a malformed date never rejects the corpus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<Author>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<Topic>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub open_access: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub citation_counts: CitationCounts,

    /// Works this record cites
    #[serde(default, deserialize_with = "null_as_default")]
    pub backward_citations: Vec<String>,

    /// Works citing this record, when materialized
    #[serde(default, deserialize_with = "null_as_default")]
    pub forward_citations: Vec<String>,

    /// Remote handle for the cited-by listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_by_api_url: Option<String>,

    /// Free-form screening / state notes
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub annotations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default, alias = "display_name", deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// `forward`: works citing this one. `backward`: works this one cites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationCounts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub forward: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub backward: u64,
}

/// Exports carry `null` where a value is unknown; read it like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Record {
    /// Publication date, falling back to January 1st of the publication year
    pub fn published_on(&self) -> Option<NaiveDate> {
        self.publication_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
            .or_else(|| {
                self.publication_year
                    .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            })
    }

    /// Year from `publication_year` or the date string
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;

        self.publication_year
            .or_else(|| self.published_on().map(|d| d.year()))
    }

    /// Comma separated author names
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether forward links have to come from the remote cited-by listing
    pub fn needs_remote_citers(&self) -> bool {
        self.forward_citations.is_empty() && self.cited_by_api_url.is_some()
    }
}
