use cn_core::{Article, SourceRef};
use serde_json::Value;

/// Maps raw search records into the fixed article shape. Records missing
/// a title or URL are dropped; everything else defaults to the empty
/// string. Input order is preserved and duplicate URLs are kept, so the
/// same article may appear once per overlapping window.
pub fn normalize(records: &[Value]) -> Vec<Article> {
    records.iter().filter_map(normalize_record).collect()
}

fn normalize_record(record: &Value) -> Option<Article> {
    let article = Article {
        title: text(record, "title"),
        description: text(record, "description"),
        url: text(record, "url"),
        published_at: text(record, "publishedAt"),
        source: record
            .get("source")
            .map(|source| SourceRef {
                name: text(source, "name"),
                id: text(source, "id"),
            })
            .unwrap_or_default(),
        author: text(record, "author"),
        image_url: text(record, "urlToImage"),
        content: text(record, "content"),
    };

    (!article.title.is_empty() && !article.url.is_empty()).then_some(article)
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
