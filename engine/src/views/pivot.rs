// Region-by-period tables over a filtered view.
use crate::data::DatasetView;
use crate::periods::FiscalPeriod;
use shared::models::{Metric, PivotTable, Region};

pub fn period_columns(periods: &[FiscalPeriod]) -> Vec<String> {
    periods.iter().map(|p| p.label()).collect()
}

/// Sums `metric` per (region, period). Rows follow `regions`; columns follow the view's
/// periods. A cell without any value is `None`.
pub fn build_pivot(view: &DatasetView<'_>, metric: Metric, regions: &[Region], title: &str) -> PivotTable {
    let mut table = PivotTable::new(title, metric, period_columns(view.periods()));
    for &region in regions {
        let values = view
            .periods()
            .iter()
            .map(|&period| view.value(region, period, metric))
            .collect();
        table.push_row(region.name(), values);
    }
    table
}
