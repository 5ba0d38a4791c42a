// Handler resolving the context's selection to period columns
use crate::config::DashboardSettings;
use crate::data::Dataset;
use crate::error::Result;
use crate::services::{DashboardContext, SelectPeriodsResponse};
use crate::views::pivot::period_columns;

pub fn handle_select_periods(
    dataset: &Dataset,
    settings: &DashboardSettings,
    context: &DashboardContext,
) -> Result<SelectPeriodsResponse> {
    let periods = context.resolve_periods(settings, dataset)?;
    tracing::debug!(selected = periods.len(), available = dataset.periods().len(), "Resolved period selection");
    Ok(SelectPeriodsResponse {
        columns: period_columns(&periods),
        periods,
    })
}
