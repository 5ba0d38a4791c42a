// Engine settings, loaded from an optional JSON file and overridden from the command line
use crate::error::{EngineError, Result};
use crate::periods::{fiscal_years, FiscalPeriod, PeriodSelection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What the loader does with a row whose period label does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidLabelPolicy {
    Reject,
    SkipWithWarning,
}

/// What the loader does with a numeric cell that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPolicy {
    /// Keep the row, mark the value as missing.
    Missing,
    /// Keep the row, read the value as zero.
    Zero,
    /// Fail the load.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub csv_delimiter: char,
    pub default_recent_periods: usize,
    pub min_recent_periods: usize,
    pub default_year_count: usize,
    pub invalid_label_policy: InvalidLabelPolicy,
    pub unparsable_number_policy: NumberPolicy,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            data_path: PathBuf::from("data/region_data.csv"),
            output_dir: PathBuf::from("output"),
            csv_delimiter: ',',
            default_recent_periods: 12,
            min_recent_periods: 4,
            default_year_count: 2,
            invalid_label_policy: InvalidLabelPolicy::Reject,
            unparsable_number_policy: NumberPolicy::Missing,
        }
    }
}

impl DashboardSettings {
    /// Reads settings from a JSON file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read settings file '{}': {}", path.display(), e))
        })?;
        let settings: DashboardSettings = serde_json::from_str(&raw)?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), ?settings, "Loaded dashboard settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.csv_delimiter.is_ascii() {
            return Err(EngineError::ConfigError(format!(
                "csv_delimiter must be a single ASCII character, got '{}'",
                self.csv_delimiter
            )));
        }
        if self.min_recent_periods == 0 {
            return Err(EngineError::ConfigError("min_recent_periods must be at least 1".to_string()));
        }
        if self.default_recent_periods < self.min_recent_periods {
            return Err(EngineError::ConfigError(format!(
                "default_recent_periods ({}) is below min_recent_periods ({})",
                self.default_recent_periods, self.min_recent_periods
            )));
        }
        if self.default_year_count == 0 {
            return Err(EngineError::ConfigError("default_year_count must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.csv_delimiter as u8
    }

    /// Initial selection for a dataset: the most recent quarters, capped at what exists.
    pub fn default_selection(&self, all_periods_sorted: &[FiscalPeriod]) -> Result<PeriodSelection> {
        if all_periods_sorted.is_empty() {
            return Err(EngineError::RangeError("dataset contains no periods".to_string()));
        }
        let count = self.default_recent_periods.min(all_periods_sorted.len());
        Ok(PeriodSelection::Recent { count })
    }

    /// The last `default_year_count` fiscal years of the dataset.
    pub fn default_year_selection(&self, all_periods_sorted: &[FiscalPeriod]) -> PeriodSelection {
        let years = fiscal_years(all_periods_sorted);
        let skip = years.len().saturating_sub(self.default_year_count);
        PeriodSelection::Years {
            years: years[skip..].to_vec(),
        }
    }
}
