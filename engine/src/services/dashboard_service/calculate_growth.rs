// Handler for year-over-year growth tables
use crate::config::DashboardSettings;
use crate::data::{Dataset, GrowthCache, GrowthKey, GrowthSeries};
use crate::error::Result;
use crate::indicators::{IndicatorCalculator, TrailingGrowth};
use crate::periods::metric_values;
use crate::services::{DashboardContext, GrowthResponse};
use crate::views::{self, RegionGrowth};
use shared::models::{Metric, Region};

/// Full-history YoY series of one region, memoized per dataset fingerprint.
pub fn region_growth_series(dataset: &Dataset, cache: &GrowthCache, region: Region, metric: Metric) -> GrowthSeries {
    let key = GrowthKey {
        fingerprint: dataset.fingerprint(),
        region,
        metric,
    };
    cache.get_or_compute(key, || {
        let calculator = TrailingGrowth::yoy();
        tracing::debug!(%region, %metric, indicator = calculator.name(), "Computing growth series");
        calculator.calculate(&metric_values(dataset.region_series(region), metric))
    })
}

pub fn region_growth(dataset: &Dataset, cache: &GrowthCache, metric: Metric) -> RegionGrowth {
    dataset
        .regions()
        .into_iter()
        .map(|region| (region, region_growth_series(dataset, cache, region, metric)))
        .collect()
}

pub fn handle_calculate_growth(
    dataset: &Dataset,
    cache: &GrowthCache,
    settings: &DashboardSettings,
    context: &DashboardContext,
    metric: Metric,
) -> Result<GrowthResponse> {
    let periods = context.resolve_periods(settings, dataset)?;
    let growth = region_growth(dataset, cache, metric);
    let calculator = TrailingGrowth::yoy();
    let title = format!("{} YoY (%)", metric);

    Ok(GrowthResponse {
        indicator_name: calculator.name().to_string(),
        parameters: calculator.parameters(),
        table: views::growth_pivot(dataset, &growth, &periods, metric, &title),
    })
}
