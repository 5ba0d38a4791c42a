// Domain models and formatting helpers shared across the workspace.
pub mod models;
pub mod utils;

pub use models::{FinancialRecord, Metric, PivotRow, PivotTable, Region};
