// Handler for the single-region drill-down
use super::calculate_growth::region_growth_series;
use crate::config::DashboardSettings;
use crate::data::{Dataset, GrowthCache};
use crate::error::{EngineError, Result};
use crate::services::DashboardContext;
use crate::views::{self, RegionDetail};
use shared::models::Metric;

pub fn handle_region_detail(
    dataset: &Dataset,
    cache: &GrowthCache,
    settings: &DashboardSettings,
    context: &DashboardContext,
) -> Result<RegionDetail> {
    let region = context
        .region
        .ok_or_else(|| EngineError::RangeError("no region selected for detail view".to_string()))?;
    let periods = context.resolve_periods(settings, dataset)?;
    let growth = region_growth_series(dataset, cache, region, Metric::Revenue);
    Ok(views::region_detail(dataset, region, &growth, &periods))
}
