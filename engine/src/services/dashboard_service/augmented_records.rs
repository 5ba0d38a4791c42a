// Handler exposing the dataset rows with their growth columns appended
use super::calculate_growth::region_growth;
use crate::config::DashboardSettings;
use crate::data::{Dataset, GrowthCache};
use crate::error::Result;
use crate::services::DashboardContext;
use crate::views::{self, AugmentedRecord};
use shared::models::Metric;
use std::collections::BTreeMap;

/// Every row with a YoY column per metric in `metrics`. With a context, rows are cut to
/// its selected periods after the growth values are computed.
pub fn handle_augmented_records(
    dataset: &Dataset,
    cache: &GrowthCache,
    settings: &DashboardSettings,
    context: Option<&DashboardContext>,
    metrics: &[Metric],
) -> Result<Vec<AugmentedRecord>> {
    let growth_by_metric: BTreeMap<_, _> = metrics
        .iter()
        .map(|&metric| (metric, region_growth(dataset, cache, metric)))
        .collect();
    let records = views::augment_records(dataset, &growth_by_metric);

    match context {
        Some(ctx) => {
            let periods = ctx.resolve_periods(settings, dataset)?;
            Ok(views::filter_augmented(records, &periods))
        }
        None => Ok(records),
    }
}
