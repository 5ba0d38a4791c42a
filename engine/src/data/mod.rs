// Loading, snapshotting and writing regional datasets
pub mod csv_parser;
pub mod dataset;
pub mod growth_cache;
pub mod report_writer;

pub use csv_parser::{LoadOptions, RegionCsvParser};
pub use dataset::{Dataset, DatasetView};
pub use growth_cache::{GrowthCache, GrowthKey, GrowthSeries};
