use async_trait::async_trait;
use cn_core::{DateRange, Result};
use serde_json::Value;

pub mod newsapi;

pub use newsapi::{NewsApiSource, QueryMode};

/// Sort orders understood by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Relevancy,
    Popularity,
    PublishedAt,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Relevancy => "relevancy",
            SortOrder::Popularity => "popularity",
            SortOrder::PublishedAt => "publishedAt",
        }
    }
}

/// One page of raw search results for a company within a date range.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Total matches the source claims to hold, which may exceed the
    /// number of records returned on this page.
    pub total_results: u64,
    pub records: Vec<Value>,
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Returns the name of the backing source
    fn name(&self) -> &str;

    /// Runs one paginated search for `company` scoped to `range`.
    /// Transport faults, non-ok statuses and undecodable bodies all
    /// surface as a fetch error, never as a panic.
    async fn search(
        &self,
        company: &str,
        range: &DateRange,
        page_size: u32,
        sort: SortOrder,
    ) -> Result<SearchPage>;
}
