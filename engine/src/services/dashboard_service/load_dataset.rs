// Handler for loading a dataset file into a fresh snapshot
use crate::data::{Dataset, LoadOptions, RegionCsvParser};
use crate::error::Result;
use crate::services::{LoadDatasetRequest, LoadDatasetResponse};

pub fn handle_load_dataset(request: &LoadDatasetRequest, options: &LoadOptions) -> Result<(Dataset, LoadDatasetResponse)> {
    let records = RegionCsvParser::load_records_from_csv(&request.path, options)?;
    let rows_loaded = records.len();
    let dataset = Dataset::from_records(records)?;

    let response = LoadDatasetResponse {
        message: format!(
            "Loaded {} rows for {} regions from {}",
            rows_loaded,
            dataset.regions().len(),
            request.path.display()
        ),
        rows_loaded,
        regions: dataset.regions(),
        periods: dataset.periods().to_vec(),
        fingerprint: dataset.fingerprint(),
    };
    Ok((dataset, response))
}
