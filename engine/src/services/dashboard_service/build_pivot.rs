// Handler for the per-metric region/period pivot
use crate::config::DashboardSettings;
use crate::data::Dataset;
use crate::error::Result;
use crate::services::DashboardContext;
use crate::views;
use shared::models::{Metric, PivotTable};

pub fn handle_build_pivot(
    dataset: &Dataset,
    settings: &DashboardSettings,
    context: &DashboardContext,
    metric: Metric,
) -> Result<PivotTable> {
    let periods = context.resolve_periods(settings, dataset)?;
    let view = dataset.filter_periods(&periods);
    let title = format!("{} by region", metric);
    Ok(views::build_pivot(&view, metric, &dataset.regions(), &title))
}
