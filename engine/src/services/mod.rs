// Dashboard service: request/response types, per-session context and the service facade
use crate::config::DashboardSettings;
use crate::data::Dataset;
use crate::error::{EngineError, Result};
use crate::periods::{FiscalPeriod, PeriodSelection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{PivotTable, Region};
use std::path::PathBuf;

pub mod dashboard_service;

pub use dashboard_service::DashboardService;

/// Session state passed explicitly into every call: the period selection and the
/// region picked for drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardContext {
    pub selection: PeriodSelection,
    #[serde(default)]
    pub region: Option<Region>,
}

impl DashboardContext {
    pub fn new(selection: PeriodSelection) -> Self {
        Self {
            selection,
            region: None,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Checks the context against the dataset. A recent-quarters selection must cover at
    /// least `min_recent_periods` (or every period when the dataset has fewer), and a
    /// drill-down region must have rows.
    pub fn validate(&self, settings: &DashboardSettings, dataset: &Dataset) -> Result<()> {
        if let PeriodSelection::Recent { count } = self.selection {
            let floor = settings.min_recent_periods.min(dataset.periods().len());
            if count < floor {
                return Err(EngineError::RangeError(format!(
                    "at least {} recent periods must be selected, got {}",
                    floor, count
                )));
            }
        }
        if let Some(region) = self.region {
            if !dataset.contains_region(region) {
                return Err(EngineError::RangeError(format!("region '{}' has no rows in the dataset", region)));
            }
        }
        Ok(())
    }

    /// Validates, then resolves the selection to concrete periods in chronological order.
    pub fn resolve_periods(&self, settings: &DashboardSettings, dataset: &Dataset) -> Result<Vec<FiscalPeriod>> {
        self.validate(settings, dataset)?;
        self.selection.resolve(dataset.periods())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDatasetRequest {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadDatasetResponse {
    pub message: String,
    pub rows_loaded: usize,
    pub regions: Vec<Region>,
    pub periods: Vec<FiscalPeriod>,
    pub fingerprint: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectPeriodsResponse {
    pub periods: Vec<FiscalPeriod>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthResponse {
    pub indicator_name: String,
    pub parameters: Value,
    pub table: PivotTable,
}
