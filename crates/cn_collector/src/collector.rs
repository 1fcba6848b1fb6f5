use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cn_core::{CollectionResult, PeriodResult, TimeWindow};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::normalize::normalize;
use crate::source::{NewsSource, SortOrder};
use crate::windows::{compute_range, default_windows};

/// Hard page-size cap imposed by the search endpoint.
const MAX_PAGE_SIZE: u32 = 100;

const DEFAULT_MAX_PER_WINDOW: u32 = 50;
const DEFAULT_INTER_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Runs the fetch-normalize loop across all configured windows for one
/// company, one window at a time, in configuration order.
pub struct NewsCollector {
    source: Arc<dyn NewsSource>,
    windows: Vec<TimeWindow>,
    max_per_window: u32,
    sort: SortOrder,
    inter_request_delay: Duration,
}

impl NewsCollector {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self {
            source,
            windows: default_windows(),
            max_per_window: DEFAULT_MAX_PER_WINDOW,
            sort: SortOrder::Relevancy,
            inter_request_delay: DEFAULT_INTER_REQUEST_DELAY,
        }
    }

    pub fn with_windows(mut self, windows: Vec<TimeWindow>) -> Self {
        self.windows = windows;
        self
    }

    pub fn with_max_articles(mut self, max_per_window: u32) -> Self {
        self.max_per_window = max_per_window;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Courtesy pause between consecutive requests. Zero disables it.
    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    /// Collects one page per configured window. A failing window is
    /// recorded as its own error entry and never aborts the remaining
    /// windows; the result always carries one entry per window.
    pub async fn collect(&self, company: &str) -> CollectionResult {
        let collected_at = Utc::now();
        let page_size = self.max_per_window.min(MAX_PAGE_SIZE);
        let mut periods = Vec::with_capacity(self.windows.len());

        info!(
            "📰 Collecting news for '{}' across {} windows via {}",
            company,
            self.windows.len(),
            self.source.name()
        );

        for (i, window) in self.windows.iter().enumerate() {
            if i > 0 && !self.inter_request_delay.is_zero() {
                sleep(self.inter_request_delay).await;
            }

            let range = compute_range(window, collected_at);
            let period = match self
                .source
                .search(company, &range, page_size, self.sort)
                .await
            {
                Ok(page) => {
                    let articles = normalize(&page.records);
                    info!(
                        "  {}: {} articles (total available: {})",
                        window.name,
                        articles.len(),
                        page.total_results
                    );
                    PeriodResult::Collected {
                        date_range: range,
                        total_results: page.total_results,
                        articles_collected: articles.len(),
                        articles,
                    }
                }
                Err(e) => {
                    warn!("  {}: {}", window.name, e);
                    PeriodResult::Failed {
                        error: e.to_string(),
                        date_range: range,
                    }
                }
            };

            periods.push((window.name.clone(), period));
        }

        CollectionResult {
            company_name: company.to_string(),
            collected_at,
            periods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cn_core::{DateRange, Error, Result};
    use crate::source::SearchPage;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted source: fails on the call indices listed in `fail_on`
    /// and records the page size of every call it sees.
    struct ScriptedSource {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
        seen_page_sizes: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on,
                seen_page_sizes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NewsSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(
            &self,
            _company: &str,
            _range: &DateRange,
            page_size: u32,
            _sort: SortOrder,
        ) -> Result<SearchPage> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_page_sizes.lock().unwrap().push(page_size);

            if self.fail_on.contains(&call) {
                return Err(Error::Fetch("connection reset by peer".to_string()));
            }

            Ok(SearchPage {
                total_results: 240,
                records: vec![
                    json!({"title": format!("Story {}", call), "url": format!("https://example.com/{}", call)}),
                    json!({"title": "", "url": "https://example.com/dropped"}),
                ],
            })
        }
    }

    fn collector(source: ScriptedSource) -> NewsCollector {
        NewsCollector::new(Arc::new(source)).with_inter_request_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_one_failed_window_does_not_abort_the_rest() {
        let result = collector(ScriptedSource::new(vec![1]))
            .collect("Acme")
            .await;

        assert_eq!(result.periods.len(), 4);
        let failed: Vec<_> = result
            .periods
            .iter()
            .filter(|(_, p)| p.is_failed())
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(failed, vec!["2weeks_to_1month"]);

        match result.period("2weeks_to_1month").unwrap() {
            PeriodResult::Failed { error, .. } => {
                assert!(error.contains("connection reset"));
            }
            other => panic!("expected failed period, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_periods_follow_window_configuration_order() {
        let result = collector(ScriptedSource::new(vec![])).collect("Acme").await;

        let names: Vec<_> = result.periods.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "present_to_2weeks",
                "2weeks_to_1month",
                "1month_to_1quarter",
                "1quarter_to_1year"
            ]
        );
    }

    #[tokio::test]
    async fn test_page_size_clamped_to_source_cap() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let collector = NewsCollector::new(source.clone() as Arc<dyn NewsSource>)
            .with_max_articles(250)
            .with_windows(vec![
                TimeWindow::new("recent", 0, 7),
                TimeWindow::new("older", 7, 30),
            ])
            .with_inter_request_delay(Duration::ZERO);
        collector.collect("Acme").await;

        let seen = source.seen_page_sizes.lock().unwrap();
        assert_eq!(*seen, vec![100, 100]);
    }

    #[tokio::test]
    async fn test_page_size_below_cap_passes_through() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let collector = NewsCollector::new(source.clone() as Arc<dyn NewsSource>)
            .with_max_articles(30)
            .with_windows(vec![TimeWindow::new("recent", 0, 7)])
            .with_inter_request_delay(Duration::ZERO);
        collector.collect("Acme").await;

        let seen = source.seen_page_sizes.lock().unwrap();
        assert_eq!(*seen, vec![30]);
    }

    #[tokio::test]
    async fn test_total_results_kept_even_when_truncated() {
        let result = collector(ScriptedSource::new(vec![]))
            .with_max_articles(1)
            .collect("Acme")
            .await;

        match result.period("present_to_2weeks").unwrap() {
            PeriodResult::Collected {
                total_results,
                articles_collected,
                ..
            } => {
                assert_eq!(*total_results, 240);
                assert!(*articles_collected < 240);
            }
            other => panic!("expected collected period, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_normalizer_filters_inside_collection() {
        let result = collector(ScriptedSource::new(vec![])).collect("Acme").await;

        // Each window's page contains one valid and one invalid record.
        for (_, period) in &result.periods {
            assert_eq!(period.articles().len(), 1);
        }
    }
}
