use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reporting region. Variant order is the fixed display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Japan,
    China,
    Asean,
    Other,
}

impl Region {
    pub const DISPLAY_ORDER: [Region; 4] = [Region::Japan, Region::China, Region::Asean, Region::Other];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Japan => "Japan",
            Region::China => "China",
            Region::Asean => "Asean",
            Region::Other => "Other",
        }
    }

    /// Name used by the source workbooks.
    pub fn local_name(&self) -> &'static str {
        match self {
            Region::Japan => "日本",
            Region::China => "中国",
            Region::Asean => "アセアン",
            Region::Other => "その他",
        }
    }

    /// Accepts the English name (any case) or the local name.
    pub fn from_label(label: &str) -> Option<Region> {
        let label = label.trim();
        Self::DISPLAY_ORDER
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(label) || r.local_name() == label)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Region::from_label(s).ok_or_else(|| anyhow!("Unknown region '{}'", s))
    }
}

/// A numeric column of the dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    Profit,
    RevenueShare,
    ProfitShare,
    Margin,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Revenue,
        Metric::Profit,
        Metric::RevenueShare,
        Metric::ProfitShare,
        Metric::Margin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Profit => "profit",
            Metric::RevenueShare => "revenue_share",
            Metric::ProfitShare => "profit_share",
            Metric::Margin => "margin",
        }
    }

    /// Monetary amounts, as opposed to percentages.
    pub fn is_amount(&self) -> bool {
        matches!(self, Metric::Revenue | Metric::Profit)
    }

    /// Decimal places used when the metric is displayed.
    pub fn display_decimals(&self) -> usize {
        if self.is_amount() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| anyhow!("Unknown metric '{}'", s))
    }
}

/// One row of the dataset: a region's figures for one fiscal period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub region: Region,
    pub period_label: String,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub revenue_share: Option<f64>,
    pub profit_share: Option<f64>,
    pub margin: Option<f64>,
}

impl FinancialRecord {
    pub fn new(region: Region, period_label: impl Into<String>, revenue: Option<f64>, profit: Option<f64>) -> Self {
        Self {
            region,
            period_label: period_label.into(),
            revenue,
            profit,
            revenue_share: None,
            profit_share: None,
            margin: None,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::Profit => self.profit,
            Metric::RevenueShare => self.revenue_share,
            Metric::ProfitShare => self.profit_share,
            Metric::Margin => self.margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// A region-by-column table of one metric. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub title: String,
    pub metric: Metric,
    pub columns: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn new(title: impl Into<String>, metric: Metric, columns: Vec<String>) -> Self {
        Self {
            title: title.into(),
            metric,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: impl Into<String>, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(PivotRow {
            label: label.into(),
            values,
        });
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let col_idx = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.label == row)
            .and_then(|r| r.values.get(col_idx).copied().flatten())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}
