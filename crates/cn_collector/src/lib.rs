pub mod collector;
pub mod export;
pub mod normalize;
pub mod report;
pub mod source;
pub mod windows;

pub use collector::NewsCollector;
pub use export::{export_csv, load_json, save_json, CsvExport};
pub use report::render_report;
pub use source::{NewsApiSource, NewsSource, QueryMode, SearchPage, SortOrder};

pub mod prelude {
    pub use crate::collector::NewsCollector;
    pub use crate::source::{NewsApiSource, NewsSource, QueryMode, SortOrder};
    pub use cn_core::{Article, CollectionResult, Error, PeriodResult, Result, TimeWindow};
}
