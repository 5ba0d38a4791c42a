// Trailing growth rate (year-over-year for quarterly series)
use super::IndicatorCalculator;
use serde_json::Value;

/// Quarters between a period and the same quarter of the prior fiscal year.
pub const YOY_LAG: usize = 4;
/// Decimal places of a published growth rate.
pub const YOY_DECIMALS: u32 = 1;

/// Rounds half away from zero to `decimals` places.
pub fn round_half_away(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Percentage change of each value against the value `lag` positions earlier.
///
/// A position is `None` when it has less than `lag` predecessors, when either value is
/// missing or non-finite, or when the earlier value is zero.
pub fn trailing_growth(series: &[Option<f64>], lag: usize, decimals: u32) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| {
            if lag == 0 || i < lag {
                return None;
            }
            let current = series[i].filter(|v| v.is_finite())?;
            let prior = series[i - lag].filter(|v| v.is_finite() && *v != 0.0)?;
            let growth = round_half_away((current / prior - 1.0) * 100.0, decimals);
            growth.is_finite().then_some(growth)
        })
        .collect()
}

/// Trailing-4 year-over-year growth in percent, rounded to one decimal.
pub fn compute_trailing_yoy(series: &[Option<f64>]) -> Vec<Option<f64>> {
    trailing_growth(series, YOY_LAG, YOY_DECIMALS)
}

pub struct TrailingGrowth {
    name: String,
    lag: usize,
    decimals: u32,
}

impl TrailingGrowth {
    pub fn new(lag: usize, decimals: u32) -> Self {
        if lag == 0 {
            panic!("Growth lag must be greater than 0");
        }
        Self {
            name: format!("GROWTH({})", lag),
            lag,
            decimals,
        }
    }

    /// Same quarter of the prior fiscal year.
    pub fn yoy() -> Self {
        Self {
            name: "YOY".to_string(),
            ..Self::new(YOY_LAG, YOY_DECIMALS)
        }
    }

    pub fn lag(&self) -> usize {
        self.lag
    }
}

impl IndicatorCalculator for TrailingGrowth {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "lag": self.lag, "decimals": self.decimals })
    }

    fn calculate(&self, series: &[Option<f64>]) -> Vec<Option<f64>> {
        trailing_growth(series, self.lag, self.decimals)
    }
}
