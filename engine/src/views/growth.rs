// Year-over-year views: computed on each region's full history, then cut to the selection.
use crate::data::growth_cache::GrowthSeries;
use crate::data::Dataset;
use crate::periods::{FiscalPeriod, PeriodRecord};
use crate::views::pivot::period_columns;
use serde::Serialize;
use shared::models::{Metric, PivotTable, Region};
use std::collections::{BTreeMap, BTreeSet};

/// Full-history growth series per region, aligned with `Dataset::region_series`.
pub type RegionGrowth = BTreeMap<Region, GrowthSeries>;

/// Growth of `metric` per region for the selected periods. Prior-year values outside
/// the selection still feed the computation.
pub fn growth_pivot(
    dataset: &Dataset,
    growth: &RegionGrowth,
    periods: &[FiscalPeriod],
    metric: Metric,
    title: &str,
) -> PivotTable {
    let mut table = PivotTable::new(title, metric, period_columns(periods));
    for (region, values) in growth {
        let by_period: BTreeMap<FiscalPeriod, Option<f64>> = dataset
            .region_series(*region)
            .iter()
            .map(|r| r.period)
            .zip(values.iter().copied())
            .collect();
        let row = periods.iter().map(|p| by_period.get(p).copied().flatten()).collect();
        table.push_row(region.name(), row);
    }
    table
}

/// A dataset row with its period key and requested growth columns appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedRecord {
    #[serde(flatten)]
    pub row: PeriodRecord,
    pub period_key: u32,
    pub growth: BTreeMap<Metric, Option<f64>>,
}

/// Copies every row of `dataset` (region by region, chronological) and appends the
/// growth value of each metric in `growth_by_metric`.
pub fn augment_records(dataset: &Dataset, growth_by_metric: &BTreeMap<Metric, RegionGrowth>) -> Vec<AugmentedRecord> {
    let mut out = Vec::with_capacity(dataset.len());
    for (region, rows) in dataset.series() {
        for (idx, row) in rows.iter().enumerate() {
            let growth = growth_by_metric
                .iter()
                .map(|(metric, by_region)| {
                    let value = by_region.get(region).and_then(|s| s.get(idx).copied().flatten());
                    (*metric, value)
                })
                .collect();
            out.push(AugmentedRecord {
                row: row.clone(),
                period_key: row.period_key(),
                growth,
            });
        }
    }
    out
}

/// Restricts augmented rows to a period selection, keeping their order.
pub fn filter_augmented(records: Vec<AugmentedRecord>, periods: &[FiscalPeriod]) -> Vec<AugmentedRecord> {
    let wanted: BTreeSet<FiscalPeriod> = periods.iter().copied().collect();
    records.into_iter().filter(|r| wanted.contains(&r.row.period)).collect()
}
