// Period selectors backing the "last N quarters" and "fiscal years" display modes.
use crate::error::{EngineError, Result};
use crate::periods::fiscal_period::{FiscalPeriod, FiscalYear};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sorted, deduplicated list of every period in `periods`.
pub fn distinct_periods<'a, I>(periods: I) -> Vec<FiscalPeriod>
where
    I: IntoIterator<Item = &'a FiscalPeriod>,
{
    periods.into_iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Fiscal years present in a sorted period list, ascending.
pub fn fiscal_years(all_periods_sorted: &[FiscalPeriod]) -> Vec<FiscalYear> {
    let mut years: Vec<FiscalYear> = all_periods_sorted.iter().map(|p| p.fiscal_year()).collect();
    years.dedup();
    years
}

fn ensure_sorted(all_periods_sorted: &[FiscalPeriod]) -> Result<()> {
    if let Some(w) = all_periods_sorted.windows(2).find(|w| w[0] >= w[1]) {
        return Err(EngineError::DataQualityError(format!(
            "period list must be strictly ascending, found {} before {}",
            w[0], w[1]
        )));
    }
    Ok(())
}

/// The last `n` periods of a globally sorted period list.
///
/// Asking for zero periods, or for more than exist, is a [`EngineError::RangeError`].
/// Callers that want clamping must clamp before calling.
pub fn select_recent_periods(all_periods_sorted: &[FiscalPeriod], n: usize) -> Result<Vec<FiscalPeriod>> {
    ensure_sorted(all_periods_sorted)?;
    if n == 0 || n > all_periods_sorted.len() {
        return Err(EngineError::RangeError(format!(
            "requested {} recent periods, but {} are available",
            n,
            all_periods_sorted.len()
        )));
    }
    Ok(all_periods_sorted[all_periods_sorted.len() - n..].to_vec())
}

/// Every period whose fiscal year is in `years`, in chronological order.
///
/// An empty `years` yields an empty list. A year with no periods in the list is a
/// [`EngineError::RangeError`].
pub fn select_periods_by_year(all_periods_sorted: &[FiscalPeriod], years: &[FiscalYear]) -> Result<Vec<FiscalPeriod>> {
    ensure_sorted(all_periods_sorted)?;
    let wanted: BTreeSet<FiscalYear> = years.iter().copied().collect();

    let available: BTreeSet<FiscalYear> = all_periods_sorted.iter().map(|p| p.fiscal_year()).collect();
    if let Some(missing) = wanted.difference(&available).next() {
        return Err(EngineError::RangeError(format!(
            "fiscal year {} is not present in the dataset",
            missing
        )));
    }

    Ok(all_periods_sorted
        .iter()
        .filter(|p| wanted.contains(&p.fiscal_year()))
        .copied()
        .collect())
}

/// How the caller wants the displayed periods chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PeriodSelection {
    Recent { count: usize },
    Years { years: Vec<FiscalYear> },
}

impl PeriodSelection {
    pub fn resolve(&self, all_periods_sorted: &[FiscalPeriod]) -> Result<Vec<FiscalPeriod>> {
        match self {
            PeriodSelection::Recent { count } => select_recent_periods(all_periods_sorted, *count),
            PeriodSelection::Years { years } => select_periods_by_year(all_periods_sorted, years),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods(labels: &[&str]) -> Vec<FiscalPeriod> {
        labels.iter().map(|l| FiscalPeriod::parse(l).unwrap()).collect()
    }

    fn labels(periods: &[FiscalPeriod]) -> Vec<String> {
        periods.iter().map(|p| p.label()).collect()
    }

    fn five_periods() -> Vec<FiscalPeriod> {
        periods(&["FY2022-1Q", "FY2022-2Q", "FY2022-3Q", "FY2022-4Q", "FY2023-1Q"])
    }

    #[test]
    fn test_select_recent_periods() {
        let result = select_recent_periods(&five_periods(), 3).unwrap();
        assert_eq!(labels(&result), vec!["FY2022-3Q", "FY2022-4Q", "FY2023-1Q"]);
    }

    #[test]
    fn test_select_recent_periods_all() {
        let all = five_periods();
        assert_eq!(select_recent_periods(&all, 5).unwrap(), all);
    }

    #[test]
    fn test_select_recent_periods_out_of_range() {
        let all = five_periods();
        assert!(matches!(select_recent_periods(&all, 6), Err(EngineError::RangeError(_))));
        assert!(matches!(select_recent_periods(&all, 0), Err(EngineError::RangeError(_))));
        assert!(matches!(select_recent_periods(&[], 1), Err(EngineError::RangeError(_))));
    }

    #[test]
    fn test_selectors_reject_unsorted_input() {
        let unsorted = periods(&["FY2023-1Q", "FY2022-4Q"]);
        assert!(matches!(select_recent_periods(&unsorted, 1), Err(EngineError::DataQualityError(_))));
        let duplicated = periods(&["FY2023-1Q", "FY2023-1Q"]);
        assert!(matches!(
            select_periods_by_year(&duplicated, &[]),
            Err(EngineError::DataQualityError(_))
        ));
    }

    #[test]
    fn test_select_periods_by_year() {
        let all = periods(&[
            "FY2022-3Q", "FY2022-4Q", "FY2023-1Q", "FY2023-2Q", "FY2023-3Q", "FY2023-4Q", "FY2024-1Q",
        ]);
        let fy2023 = FiscalYear::parse("FY2023").unwrap();
        let result = select_periods_by_year(&all, &[fy2023]).unwrap();
        assert_eq!(labels(&result), vec!["FY2023-1Q", "FY2023-2Q", "FY2023-3Q", "FY2023-4Q"]);

        let fy2022 = FiscalYear::parse("FY2022").unwrap();
        let fy2024 = FiscalYear::parse("FY2024").unwrap();
        let result = select_periods_by_year(&all, &[fy2024, fy2022]).unwrap();
        assert_eq!(labels(&result), vec!["FY2022-3Q", "FY2022-4Q", "FY2024-1Q"]);
    }

    #[test]
    fn test_select_periods_by_year_empty_and_unknown() {
        let all = five_periods();
        assert!(select_periods_by_year(&all, &[]).unwrap().is_empty());
        let fy2030 = FiscalYear::parse("FY2030").unwrap();
        assert!(matches!(select_periods_by_year(&all, &[fy2030]), Err(EngineError::RangeError(_))));
    }

    #[test]
    fn test_select_periods_by_year_matches_whole_year() {
        // FY202 must not match FY2022 by prefix
        let all = periods(&["FY202-4Q", "FY2022-1Q"]);
        let fy202 = FiscalYear::parse("FY202").unwrap();
        assert_eq!(labels(&select_periods_by_year(&all, &[fy202]).unwrap()), vec!["FY202-4Q"]);
    }

    #[test]
    fn test_distinct_periods_and_years() {
        let raw = periods(&["FY2023-1Q", "FY2022-4Q", "FY2023-1Q", "FY2022-4Q"]);
        let distinct = distinct_periods(&raw);
        assert_eq!(labels(&distinct), vec!["FY2022-4Q", "FY2023-1Q"]);
        let years: Vec<String> = fiscal_years(&distinct).iter().map(|y| y.to_string()).collect();
        assert_eq!(years, vec!["FY2022", "FY2023"]);
    }

    #[test]
    fn test_period_selection_resolve_and_serde() {
        let all = five_periods();
        let recent = PeriodSelection::Recent { count: 2 };
        assert_eq!(labels(&recent.resolve(&all).unwrap()), vec!["FY2022-4Q", "FY2023-1Q"]);

        let json = r#"{"mode":"years","years":["FY2023"]}"#;
        let by_year: PeriodSelection = serde_json::from_str(json).unwrap();
        assert_eq!(labels(&by_year.resolve(&all).unwrap()), vec!["FY2023-1Q"]);
    }
}
