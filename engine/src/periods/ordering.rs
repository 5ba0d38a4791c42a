// Per-region chronological ordering of records.
use crate::error::{EngineError, Result};
use crate::periods::fiscal_period::FiscalPeriod;
use serde::Serialize;
use shared::models::{FinancialRecord, Metric, Region};
use std::collections::BTreeMap;

/// A record with its parsed period attached. The record itself is an untouched copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRecord {
    pub period: FiscalPeriod,
    pub record: FinancialRecord,
}

impl PeriodRecord {
    pub fn from_record(record: FinancialRecord) -> Result<Self> {
        let period = FiscalPeriod::parse(&record.period_label)?;
        Ok(Self { period, record })
    }

    pub fn region(&self) -> Region {
        self.record.region
    }

    pub fn period_key(&self) -> u32 {
        self.period.key()
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.record.value(metric)
    }
}

/// Records grouped by region (display order), each group sorted by period.
pub type RegionSeries = BTreeMap<Region, Vec<PeriodRecord>>;

/// Groups `records` by region and sorts each group chronologically.
///
/// The sort is stable. A region holding the same period twice is rejected with
/// [`EngineError::DataQualityError`] instead of being deduplicated.
pub fn order_periods(records: &[FinancialRecord]) -> Result<RegionSeries> {
    let mut series = RegionSeries::new();
    for record in records {
        let keyed = PeriodRecord::from_record(record.clone())?;
        series.entry(keyed.region()).or_default().push(keyed);
    }

    for (region, rows) in series.iter_mut() {
        rows.sort_by_key(|r| r.period_key());
        if let Some(dup) = rows.windows(2).find(|w| w[0].period == w[1].period) {
            return Err(EngineError::DataQualityError(format!(
                "region {} has more than one row for period {}",
                region, dup[0].period
            )));
        }
    }

    Ok(series)
}

/// Extracts one metric from a chronologically ordered series.
pub fn metric_values(rows: &[PeriodRecord], metric: Metric) -> Vec<Option<f64>> {
    rows.iter().map(|r| r.value(metric)).collect()
}
