//! Fiscal period labels of the form `FY<year>-<quarter>Q` and their integer sort key.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const LABEL_PREFIX: &str = "FY";
pub const LABEL_SUFFIX: char = 'Q';
pub const QUARTERS_PER_YEAR: u8 = 4;

// Must exceed QUARTERS_PER_YEAR so keys never collide across years.
const KEY_MULTIPLIER: u32 = 10;

/// A fiscal year and quarter. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalPeriod {
    year: u32,
    quarter: u8,
}

impl FiscalPeriod {
    pub fn new(year: u32, quarter: u8) -> Result<Self> {
        if year == 0 {
            return Err(EngineError::FormatError(format!(
                "fiscal year must be a positive integer, got {}",
                year
            )));
        }
        if !(1..=QUARTERS_PER_YEAR).contains(&quarter) {
            return Err(EngineError::FormatError(format!(
                "quarter must be in 1..={}, got {}",
                QUARTERS_PER_YEAR, quarter
            )));
        }
        year.checked_mul(KEY_MULTIPLIER)
            .and_then(|k| k.checked_add(u32::from(quarter)))
            .ok_or_else(|| EngineError::FormatError(format!("fiscal year {} is out of range", year)))?;
        Ok(Self { year, quarter })
    }

    /// Parses a label such as `FY2023-1Q`. Surrounding whitespace is not accepted.
    pub fn parse(label: &str) -> Result<Self> {
        let fail = |reason: &str| EngineError::FormatError(format!("invalid period label '{}': {}", label, reason));

        let rest = label
            .strip_prefix(LABEL_PREFIX)
            .ok_or_else(|| fail("missing 'FY' prefix"))?;
        let rest = rest
            .strip_suffix(LABEL_SUFFIX)
            .ok_or_else(|| fail("missing trailing 'Q'"))?;
        let (year_str, quarter_str) = rest.split_once('-').ok_or_else(|| fail("missing '-' separator"))?;

        if year_str.is_empty() || !year_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("year is not numeric"));
        }
        let year: u32 = year_str.parse().map_err(|_| fail("year is out of range"))?;

        let quarter = match quarter_str.as_bytes() {
            [d @ b'1'..=b'4'] => *d - b'0',
            _ => return Err(fail("quarter must be a single digit between 1 and 4")),
        };

        Self::new(year, quarter).map_err(|e| match e {
            EngineError::FormatError(msg) => fail(&msg),
            other => other,
        })
    }

    /// Inverse of [`FiscalPeriod::key`].
    pub fn from_key(key: u32) -> Result<Self> {
        let quarter = (key % KEY_MULTIPLIER) as u8;
        Self::new(key / KEY_MULTIPLIER, quarter)
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// `year * 10 + quarter`; strictly monotonic with chronological order.
    pub fn key(&self) -> u32 {
        self.year * KEY_MULTIPLIER + u32::from(self.quarter)
    }

    pub fn fiscal_year(&self) -> FiscalYear {
        FiscalYear(self.year)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Short quarter name used by seasonal views (`Q1`..`Q4`).
    pub fn quarter_name(&self) -> String {
        format!("Q{}", self.quarter)
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}{}", LABEL_PREFIX, self.year, self.quarter, LABEL_SUFFIX)
    }
}

impl FromStr for FiscalPeriod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FiscalPeriod {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FiscalPeriod> for String {
    fn from(value: FiscalPeriod) -> Self {
        value.to_string()
    }
}

/// Returns the integer sort key of a period label.
pub fn parse_period_key(label: &str) -> Result<u32> {
    FiscalPeriod::parse(label).map(|p| p.key())
}

/// A fiscal year label, `FY<year>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalYear(u32);

impl FiscalYear {
    pub fn new(year: u32) -> Result<Self> {
        if year == 0 {
            return Err(EngineError::FormatError("fiscal year must be a positive integer".to_string()));
        }
        Ok(Self(year))
    }

    /// Parses `FY2023`. A bare `2023` is accepted too, for command-line convenience.
    pub fn parse(label: &str) -> Result<Self> {
        let digits = label.strip_prefix(LABEL_PREFIX).unwrap_or(label);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::FormatError(format!("invalid fiscal year '{}'", label)));
        }
        let year: u32 = digits
            .parse()
            .map_err(|_| EngineError::FormatError(format!("fiscal year '{}' is out of range", label)))?;
        Self::new(year)
    }

    pub fn year(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", LABEL_PREFIX, self.0)
    }
}

impl FromStr for FiscalYear {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FiscalYear {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FiscalYear> for String {
    fn from(value: FiscalYear) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_format_error(label: &str) {
        match parse_period_key(label) {
            Err(EngineError::FormatError(_)) => {}
            other => panic!("expected FormatError for '{}', got {:?}", label, other),
        }
    }

    #[test]
    fn test_parse_period_key_valid() {
        assert_eq!(parse_period_key("FY2023-1Q").unwrap(), 20231);
        assert_eq!(parse_period_key("FY2022-4Q").unwrap(), 20224);
        assert_eq!(parse_period_key("FY7-3Q").unwrap(), 73);
    }

    #[test]
    fn test_parse_period_key_missing_prefix() {
        assert_format_error("2023-1Q");
    }

    #[test]
    fn test_parse_period_key_malformed() {
        assert_format_error("FY20231Q");
        assert_format_error("FY2023-1");
        assert_format_error("FYabcd-1Q");
        assert_format_error("FY-1Q");
        assert_format_error("FY2023-5Q");
        assert_format_error("FY2023-0Q");
        assert_format_error("FY2023-12Q");
        assert_format_error("FY0-1Q");
        assert_format_error("FY+2023-1Q");
        assert_format_error(" FY2023-1Q");
        assert_format_error("FY99999999999-1Q");
        assert_format_error("");
    }

    #[test]
    fn test_key_is_monotonic_with_chronology() {
        let mut periods = Vec::new();
        for year in [1999u32, 2000, 2022, 2023] {
            for quarter in 1..=4u8 {
                periods.push((year, quarter));
            }
        }
        let keys: Vec<u32> = periods
            .iter()
            .map(|(y, q)| parse_period_key(&format!("FY{}-{}Q", y, q)).unwrap())
            .collect();

        for i in 0..periods.len() {
            for j in 0..periods.len() {
                assert_eq!(periods[i] < periods[j], keys[i] < keys[j]);
                assert_eq!(periods[i] == periods[j], keys[i] == keys[j]);
            }
        }
    }

    #[test]
    fn test_display_and_key_round_trip() {
        let period = FiscalPeriod::parse("FY2024-3Q").unwrap();
        assert_eq!(period.label(), "FY2024-3Q");
        assert_eq!(period.fiscal_year().to_string(), "FY2024");
        assert_eq!(period.quarter_name(), "Q3");
        assert_eq!(FiscalPeriod::from_key(period.key()).unwrap(), period);
        assert!(FiscalPeriod::from_key(20235).is_err());
    }

    #[test]
    fn test_fiscal_year_parse() {
        assert_eq!(FiscalYear::parse("FY2023").unwrap().year(), 2023);
        assert_eq!(FiscalYear::parse("2023").unwrap().year(), 2023);
        assert!(FiscalYear::parse("FY").is_err());
        assert!(FiscalYear::parse("FY20x3").is_err());
        assert!(FiscalYear::parse("FY0").is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let period = FiscalPeriod::parse("FY2023-2Q").unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"FY2023-2Q\"");
        let back: FiscalPeriod = serde_json::from_str("\"FY2023-2Q\"").unwrap();
        assert_eq!(back, period);
        assert!(serde_json::from_str::<FiscalPeriod>("\"2023-2Q\"").is_err());
    }
}
