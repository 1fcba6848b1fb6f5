use std::time::Duration;

use async_trait::async_trait;
use cn_core::{DateRange, Error, Result};
use serde::Deserialize;
use tracing::debug;

use super::{NewsSource, SearchPage, SortOrder};

const BASE_URL: &str = "https://newsapi.org/v2/everything";
const API_KEY_ENV: &str = "NEWS_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Known satire and low-quality outlets, excluded from every query.
const EXCLUDED_DOMAINS: &[&str] = &[
    "theonion.com",
    "babylonbee.com",
    "clickhole.com",
    "thedailymash.co.uk",
    "reductress.com",
    "thegatewaypundit.com",
    "globalresearch.ca",
    "libertywritersnews.com",
    "realtruenews.com",
    "70news.com",
    "huzlers.com",
    "nytimesofficial.com",
    "cnnworldtoday.com",
    "bbcnewstoday.com",
    "news-pravda.com",
];

const FINANCIAL_TERMS: &str = "earnings OR revenue OR stock OR financial OR merger \
OR acquisition OR IPO OR funding OR VC OR investment OR investment round";

/// How the search query is built from the company name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Bare exact-phrase match.
    ExactPhrase,
    /// Exact-phrase match plus a disjunction of financial-relevance terms.
    #[default]
    FinancialContext,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(rename = "totalResults")]
    total_results: Option<u64>,
    articles: Option<Vec<serde_json::Value>>,
    message: Option<String>,
}

pub struct NewsApiSource {
    client: reqwest::Client,
    api_key: String,
    query_mode: QueryMode,
}

impl NewsApiSource {
    /// The credential comes from the argument or the `NEWS_API_KEY`
    /// environment variable; construction fails before any network
    /// activity when neither is set.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "NewsAPI key is required. Set the {} environment variable or pass --api-key.",
                    API_KEY_ENV
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key,
            query_mode: QueryMode::default(),
        })
    }

    pub fn with_query_mode(mut self, mode: QueryMode) -> Self {
        self.query_mode = mode;
        self
    }

    fn build_query(&self, company: &str) -> String {
        match self.query_mode {
            QueryMode::ExactPhrase => format!("\"{}\"", company),
            QueryMode::FinancialContext => {
                format!("+\"{}\" AND ({})", company, FINANCIAL_TERMS)
            }
        }
    }

    /// The key value must never leak through error text, including via
    /// transport errors that echo the full request URL.
    fn redact(&self, message: String) -> String {
        message.replace(&self.api_key, "***HIDDEN***")
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn search(
        &self,
        company: &str,
        range: &DateRange,
        page_size: u32,
        sort: SortOrder,
    ) -> Result<SearchPage> {
        let params: Vec<(&str, String)> = vec![
            ("q", self.build_query(company)),
            ("from", range.from.to_string()),
            ("to", range.to.to_string()),
            ("sortBy", sort.as_param().to_string()),
            ("pageSize", page_size.to_string()),
            ("language", "en".to_string()),
            ("excludeDomains", EXCLUDED_DOMAINS.join(",")),
            ("apiKey", self.api_key.clone()),
        ];

        debug!(company, from = %range.from, to = %range.to, page_size, "querying NewsAPI");

        let response = self
            .client
            .get(BASE_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Fetch(self.redact(e.to_string())))?;

        let http_status = response.status();
        let body: SearchResponse = response.json().await.map_err(|e| {
            Error::Fetch(self.redact(format!(
                "invalid response body (HTTP {}): {}",
                http_status, e
            )))
        })?;

        if body.status != "ok" {
            let message = body
                .message
                .unwrap_or_else(|| format!("request failed with HTTP {}", http_status));
            return Err(Error::Fetch(self.redact(message)));
        }

        Ok(SearchPage {
            total_results: body.total_results.unwrap_or(0),
            records: body.articles.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with_key(key: &str) -> NewsApiSource {
        NewsApiSource::new(Some(key.to_string())).unwrap()
    }

    #[test]
    fn test_missing_key_is_a_config_error() {
        let result = NewsApiSource::new(Some(String::new()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_exact_phrase_query() {
        let source = source_with_key("k").with_query_mode(QueryMode::ExactPhrase);
        assert_eq!(source.build_query("Apple Inc"), "\"Apple Inc\"");
    }

    #[test]
    fn test_financial_query_keeps_exact_phrase_and_terms() {
        let source = source_with_key("k");
        let query = source.build_query("Tesla");
        assert!(query.starts_with("+\"Tesla\" AND ("));
        assert!(query.contains("earnings OR revenue"));
        assert!(query.contains("investment round"));
    }

    #[test]
    fn test_redact_elides_embedded_key() {
        let source = source_with_key("47475ac280c24cdf");
        let message = format!(
            "error sending request for url (https://newsapi.org/v2/everything?q=x&apiKey={})",
            "47475ac280c24cdf"
        );
        let redacted = source.redact(message);
        assert!(!redacted.contains("47475ac280c24cdf"));
        assert!(redacted.contains("***HIDDEN***"));
    }

    #[test]
    fn test_denylist_has_no_empty_entries() {
        let joined = EXCLUDED_DOMAINS.join(",");
        assert!(joined.contains("theonion.com"));
        assert!(!joined.contains(",,"));
    }

    #[test]
    fn test_ok_response_parses() {
        let json = r#"{
            "status": "ok",
            "totalResults": 241,
            "articles": [
                {"title": "Acme beats estimates", "url": "https://example.com/a"}
            ]
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.total_results, Some(241));
        assert_eq!(body.articles.unwrap().len(), 1);
    }

    #[test]
    fn test_error_response_parses_without_articles() {
        let json = r#"{
            "status": "error",
            "code": "rateLimited",
            "message": "You have made too many requests recently."
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "error");
        assert!(body.articles.is_none());
        assert_eq!(
            body.message.as_deref(),
            Some("You have made too many requests recently.")
        );
    }
}
