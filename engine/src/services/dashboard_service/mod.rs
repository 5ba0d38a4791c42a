// engine/src/services/dashboard_service/mod.rs
// Holds the DashboardService facade; each operation is dispatched to a handler submodule.

use super::{DashboardContext, GrowthResponse, LoadDatasetRequest, LoadDatasetResponse, SelectPeriodsResponse};
use crate::config::DashboardSettings;
use crate::data::{Dataset, GrowthCache, LoadOptions};
use crate::error::Result;
use crate::views::{AugmentedRecord, RegionDetail};
use shared::models::{Metric, PivotTable};
use std::sync::Arc;

pub mod augmented_records;
pub mod build_pivot;
pub mod calculate_growth;
pub mod load_dataset;
pub mod region_detail;
pub mod seasonal;
pub mod select_periods;

pub struct DashboardService {
    settings: DashboardSettings,
    dataset: Arc<Dataset>,
    cache: GrowthCache,
}

impl DashboardService {
    pub fn new(settings: DashboardSettings, dataset: Arc<Dataset>) -> Self {
        DashboardService {
            settings,
            dataset,
            cache: GrowthCache::new(),
        }
    }

    /// Loads the dataset named by `settings.data_path`.
    pub fn open(settings: DashboardSettings) -> Result<Self> {
        let request = LoadDatasetRequest {
            path: settings.data_path.clone(),
        };
        let (dataset, _) = load_dataset::handle_load_dataset(&request, &LoadOptions::from(&settings))?;
        Ok(Self::new(settings, Arc::new(dataset)))
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn cache(&self) -> &GrowthCache {
        &self.cache
    }

    /// Context a new session starts with: the most recent quarters, no drill-down region.
    pub fn initial_context(&self) -> Result<DashboardContext> {
        let selection = self.settings.default_selection(self.dataset.periods())?;
        Ok(DashboardContext::new(selection))
    }

    /// Replaces the snapshot. Cached growth series of the previous dataset are dropped.
    pub fn load_dataset(&mut self, request: LoadDatasetRequest) -> Result<LoadDatasetResponse> {
        tracing::info!(path = %request.path.display(), "Received LoadDatasetRequest, dispatching to handler.");
        let (dataset, response) = load_dataset::handle_load_dataset(&request, &LoadOptions::from(&self.settings))?;
        self.cache.retain_fingerprint(dataset.fingerprint());
        self.dataset = Arc::new(dataset);
        Ok(response)
    }

    pub fn select_periods(&self, context: &DashboardContext) -> Result<SelectPeriodsResponse> {
        tracing::info!(selection = ?context.selection, "Received SelectPeriodsRequest, dispatching to handler.");
        select_periods::handle_select_periods(&self.dataset, &self.settings, context)
    }

    pub fn build_pivot(&self, context: &DashboardContext, metric: Metric) -> Result<PivotTable> {
        tracing::info!(selection = ?context.selection, %metric, "Received BuildPivotRequest, dispatching to handler.");
        build_pivot::handle_build_pivot(&self.dataset, &self.settings, context, metric)
    }

    pub fn calculate_growth(&self, context: &DashboardContext, metric: Metric) -> Result<GrowthResponse> {
        tracing::info!(selection = ?context.selection, %metric, "Received CalculateGrowthRequest, dispatching to handler.");
        calculate_growth::handle_calculate_growth(&self.dataset, &self.cache, &self.settings, context, metric)
    }

    pub fn seasonal_averages(&self, metric: Metric) -> PivotTable {
        tracing::info!(%metric, "Received SeasonalAveragesRequest, dispatching to handler.");
        seasonal::handle_seasonal_averages(&self.dataset, metric)
    }

    pub fn region_detail(&self, context: &DashboardContext) -> Result<RegionDetail> {
        tracing::info!(selection = ?context.selection, region = ?context.region, "Received RegionDetailRequest, dispatching to handler.");
        region_detail::handle_region_detail(&self.dataset, &self.cache, &self.settings, context)
    }

    pub fn augmented_records(
        &self,
        context: Option<&DashboardContext>,
        metrics: &[Metric],
    ) -> Result<Vec<AugmentedRecord>> {
        tracing::info!(filtered = context.is_some(), metrics = ?metrics, "Received AugmentedRecordsRequest, dispatching to handler.");
        augmented_records::handle_augmented_records(&self.dataset, &self.cache, &self.settings, context, metrics)
    }
}
