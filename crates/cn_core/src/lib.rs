pub mod error;
pub mod types;

pub use error::Error;
pub use types::{Article, CollectionResult, DateRange, PeriodResult, SourceRef, TimeWindow};

pub type Result<T> = std::result::Result<T, Error>;
