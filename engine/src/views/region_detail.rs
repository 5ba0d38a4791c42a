// Single-region drill-down over the selected periods.
use crate::data::growth_cache::GrowthSeries;
use crate::data::Dataset;
use crate::periods::FiscalPeriod;
use serde::Serialize;
use shared::models::{Metric, Region};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionDetailRow {
    pub period: FiscalPeriod,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub revenue_yoy: Option<f64>,
    pub margin: Option<f64>,
    pub revenue_share: Option<f64>,
    pub profit_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionDetail {
    pub region: Region,
    pub rows: Vec<RegionDetailRow>,
}

impl RegionDetail {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Quarters in the selection where the region reported an operating loss.
    pub fn loss_periods(&self) -> Vec<FiscalPeriod> {
        self.rows
            .iter()
            .filter(|r| r.profit.is_some_and(|p| p < 0.0))
            .map(|r| r.period)
            .collect()
    }
}

/// Builds the detail rows of `region` for `periods`. `revenue_growth` must be the
/// region's full-history revenue YoY series.
pub fn region_detail(
    dataset: &Dataset,
    region: Region,
    revenue_growth: &GrowthSeries,
    periods: &[FiscalPeriod],
) -> RegionDetail {
    let wanted: BTreeSet<FiscalPeriod> = periods.iter().copied().collect();
    let rows = dataset
        .region_series(region)
        .iter()
        .zip(revenue_growth.iter())
        .filter(|(row, _)| wanted.contains(&row.period))
        .map(|(row, yoy)| RegionDetailRow {
            period: row.period,
            revenue: row.value(Metric::Revenue),
            profit: row.value(Metric::Profit),
            revenue_yoy: *yoy,
            margin: row.value(Metric::Margin),
            revenue_share: row.value(Metric::RevenueShare),
            profit_share: row.value(Metric::ProfitShare),
        })
        .collect();
    RegionDetail { region, rows }
}
