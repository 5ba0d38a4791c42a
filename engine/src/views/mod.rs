//! Tables derived from a dataset snapshot for the presentation layer.
pub mod growth;
pub mod pivot;
pub mod region_detail;
pub mod seasonal;

pub use growth::{augment_records, filter_augmented, growth_pivot, AugmentedRecord, RegionGrowth};
pub use pivot::build_pivot;
pub use region_detail::{region_detail, RegionDetail, RegionDetailRow};
pub use seasonal::seasonal_averages;
