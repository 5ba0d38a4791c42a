//! Quarter index: label parsing, per-region ordering and period selection.
pub mod fiscal_period;
pub mod ordering;
pub mod selection;

pub use fiscal_period::{parse_period_key, FiscalPeriod, FiscalYear};
pub use ordering::{metric_values, order_periods, PeriodRecord, RegionSeries};
pub use selection::{
    distinct_periods, fiscal_years, select_periods_by_year, select_recent_periods, PeriodSelection,
};
