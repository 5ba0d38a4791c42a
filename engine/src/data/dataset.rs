// Immutable snapshot of one loaded dataset, plus filtered views over it
use crate::error::Result;
use crate::periods::{distinct_periods, fiscal_years, order_periods, FiscalPeriod, FiscalYear, PeriodRecord, RegionSeries};
use shared::models::{FinancialRecord, Metric, Region};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct Dataset {
    series: RegionSeries,
    periods: Vec<FiscalPeriod>,
    fingerprint: u64,
}

impl Dataset {
    /// Parses every period label, orders each region's rows and indexes the distinct periods.
    pub fn from_records(records: Vec<FinancialRecord>) -> Result<Self> {
        let fingerprint = fingerprint(&records);
        let series = order_periods(&records)?;
        let periods = distinct_periods(series.values().flatten().map(|r| &r.period));

        tracing::debug!(
            rows = records.len(),
            regions = series.len(),
            periods = periods.len(),
            fingerprint,
            "Built dataset snapshot"
        );
        Ok(Self {
            series,
            periods,
            fingerprint,
        })
    }

    /// Content hash of the input rows; equal datasets share cached derived series.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every distinct period across regions, ascending.
    pub fn periods(&self) -> &[FiscalPeriod] {
        &self.periods
    }

    pub fn fiscal_years(&self) -> Vec<FiscalYear> {
        fiscal_years(&self.periods)
    }

    /// Regions with at least one row, in display order.
    pub fn regions(&self) -> Vec<Region> {
        self.series.keys().copied().collect()
    }

    pub fn contains_region(&self, region: Region) -> bool {
        self.series.contains_key(&region)
    }

    /// One region's rows in chronological order; empty when the region has no rows.
    pub fn region_series(&self, region: Region) -> &[PeriodRecord] {
        self.series.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn series(&self) -> &RegionSeries {
        &self.series
    }

    /// All rows, region by region, each region chronological.
    pub fn records(&self) -> impl Iterator<Item = &PeriodRecord> {
        self.series.values().flatten()
    }

    /// Rows whose period is one of `periods`. The snapshot itself is untouched.
    pub fn filter_periods(&self, periods: &[FiscalPeriod]) -> DatasetView<'_> {
        let wanted: BTreeSet<FiscalPeriod> = periods.iter().copied().collect();
        DatasetView {
            rows: self.records().filter(|r| wanted.contains(&r.period)).collect(),
            periods: periods.to_vec(),
        }
    }
}

/// A read-only selection of dataset rows and the periods it was selected for.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    rows: Vec<&'a PeriodRecord>,
    periods: Vec<FiscalPeriod>,
}

impl<'a> DatasetView<'a> {
    pub fn rows(&self) -> &[&'a PeriodRecord] {
        &self.rows
    }

    pub fn periods(&self) -> &[FiscalPeriod] {
        &self.periods
    }

    pub fn region_rows(&self, region: Region) -> impl Iterator<Item = &'a PeriodRecord> + '_ {
        self.rows.iter().copied().filter(move |r| r.region() == region)
    }

    pub fn value(&self, region: Region, period: FiscalPeriod, metric: Metric) -> Option<f64> {
        self.rows
            .iter()
            .filter(|r| r.region() == region && r.period == period)
            .filter_map(|r| r.value(metric))
            .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
    }
}

fn fingerprint(records: &[FinancialRecord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.len().hash(&mut hasher);
    for record in records {
        record.region.hash(&mut hasher);
        record.period_label.hash(&mut hasher);
        for metric in Metric::ALL {
            record.value(metric).map(f64::to_bits).hash(&mut hasher);
        }
    }
    hasher.finish()
}
