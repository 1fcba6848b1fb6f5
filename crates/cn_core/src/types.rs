use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The outlet a normalized article came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

/// One normalized news record. All optional upstream fields default to
/// the empty string; an article without a title or URL is never retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub source: SourceRef,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub content: String,
}

/// A named lookback bucket. Both offsets count backwards from the moment
/// of collection; `start_offset_days` is the edge closer to now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub name: String,
    pub start_offset_days: i64,
    pub end_offset_days: i64,
}

impl TimeWindow {
    /// Panics if `start_offset_days` is not strictly smaller than
    /// `end_offset_days`.
    pub fn new(name: impl Into<String>, start_offset_days: i64, end_offset_days: i64) -> Self {
        assert!(
            start_offset_days < end_offset_days,
            "window start offset must be smaller than its end offset"
        );
        Self {
            name: name.into(),
            start_offset_days,
            end_offset_days,
        }
    }
}

/// Calendar-date range, no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Outcome of collecting one window. A failed window only ever affects
/// itself; sibling windows carry their own results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodResult {
    Collected {
        date_range: DateRange,
        total_results: u64,
        articles_collected: usize,
        articles: Vec<Article>,
    },
    Failed {
        error: String,
        date_range: DateRange,
    },
}

impl PeriodResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, PeriodResult::Failed { .. })
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            PeriodResult::Collected { articles, .. } => articles,
            PeriodResult::Failed { .. } => &[],
        }
    }
}

/// Root aggregate of one collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult {
    pub company_name: String,
    pub collected_at: DateTime<Utc>,
    #[serde(with = "period_map")]
    pub periods: Vec<(String, PeriodResult)>,
}

impl CollectionResult {
    pub fn period(&self, name: &str) -> Option<&PeriodResult> {
        self.periods
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }
}

/// `periods` is a JSON object keyed by window name; entry order carries
/// over into report rendering, so the Rust side keeps an ordered pair
/// list rather than a hash map.
mod period_map {
    use super::PeriodResult;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(
        periods: &[(String, PeriodResult)],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(periods.len()))?;
        for (name, period) in periods {
            map.serialize_entry(name, period)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, PeriodResult)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PeriodMapVisitor;

        impl<'de> Visitor<'de> for PeriodMapVisitor {
            type Value = Vec<(String, PeriodResult)>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of window name to period result")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(PeriodMapVisitor)
    }
}
