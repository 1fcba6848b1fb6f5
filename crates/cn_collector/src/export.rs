use std::fs;
use std::path::Path;

use cn_core::{CollectionResult, Error, PeriodResult, Result};
use serde::Serialize;

/// Outcome of a CSV export: either a file with this many article rows
/// was written, or there was nothing to write and no file was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvExport {
    Written(usize),
    Empty,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    period: &'a str,
    title: &'a str,
    description: &'a str,
    url: &'a str,
    published_at: &'a str,
    source_name: &'a str,
    author: &'a str,
    image_url: &'a str,
}

/// Writes the full collection result as pretty-printed JSON, overwriting
/// any existing file. Non-ASCII text is written as-is, not escaped.
pub fn save_json(result: &CollectionResult, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Reads a collection result back from a JSON export.
pub fn load_json(path: impl AsRef<Path>) -> Result<CollectionResult> {
    let json = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}

/// Flattens every article of every collected period into one CSV row,
/// tagged with its window name. Failed periods contribute nothing; with
/// zero rows no file is written at all.
pub fn export_csv(result: &CollectionResult, path: impl AsRef<Path>) -> Result<CsvExport> {
    let rows: Vec<CsvRow<'_>> = result
        .periods
        .iter()
        .filter_map(|(name, period)| match period {
            PeriodResult::Collected { articles, .. } => Some((name, articles)),
            PeriodResult::Failed { .. } => None,
        })
        .flat_map(|(name, articles)| {
            articles.iter().map(move |article| CsvRow {
                period: name,
                title: &article.title,
                description: &article.description,
                url: &article.url,
                published_at: &article.published_at,
                source_name: &article.source.name,
                author: &article.author,
                image_url: &article.image_url,
            })
        })
        .collect();

    if rows.is_empty() {
        return Ok(CsvExport::Empty);
    }

    let mut writer =
        csv::Writer::from_path(path.as_ref()).map_err(|e| Error::Export(e.to_string()))?;
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    writer.flush()?;

    Ok(CsvExport::Written(rows.len()))
}
