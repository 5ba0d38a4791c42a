// Derived series over a chronologically ordered metric
pub mod yoy;

pub use yoy::{compute_trailing_yoy, round_half_away, trailing_growth, TrailingGrowth, YOY_LAG};

use serde_json::Value;

// Common trait for all series indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, series: &[Option<f64>]) -> Vec<Option<f64>>; // None where the value cannot be computed
}
