// Handler for quarter-of-year averages
use crate::data::Dataset;
use crate::views;
use shared::models::{Metric, PivotTable};

pub fn handle_seasonal_averages(dataset: &Dataset, metric: Metric) -> PivotTable {
    let title = format!("Average {} by quarter", metric);
    views::seasonal_averages(dataset, metric, &title)
}
