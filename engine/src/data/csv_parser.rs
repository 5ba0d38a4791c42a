use crate::config::{DashboardSettings, InvalidLabelPolicy, NumberPolicy};
use crate::error::{EngineError, Result};
use crate::periods::FiscalPeriod;
use anyhow::anyhow;
use csv::{ReaderBuilder, StringRecord};
use shared::models::{FinancialRecord, Region};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Number cells as exported by the finance workbooks: "1,234,567", " 12.5 ", "8.3%"
pub mod number_format {
    use anyhow::{anyhow, Result};
    use std::str::FromStr;

    /// Parses an amount with optional thousands separators and trailing `%`.
    /// Blank cells are `Ok(None)`; non-finite results are treated as missing.
    pub fn parse_amount(s: &str) -> Result<Option<f64>> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let normalized: String = trimmed
            .strip_suffix('%')
            .unwrap_or(trimmed)
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        let value = f64::from_str(&normalized).map_err(|e| anyhow!("Failed to parse number '{}': {}", s, e))?;
        Ok(value.is_finite().then_some(value))
    }

}

// Accepted header spellings per column, English first.
const REGION_HEADERS: &[&str] = &["region", "地域"];
const PERIOD_LABEL_HEADERS: &[&str] = &["period_label", "period", "決算年度"];
const PERIOD_TYPE_HEADERS: &[&str] = &["period_type", "決算種別"];
const REVENUE_HEADERS: &[&str] = &["revenue", "営業収益"];
const PROFIT_HEADERS: &[&str] = &["profit", "営業利益"];
const REVENUE_SHARE_HEADERS: &[&str] = &["revenue_share", "営業収益構成比"];
const PROFIT_SHARE_HEADERS: &[&str] = &["profit_share", "営業利益構成比"];
const MARGIN_HEADERS: &[&str] = &["margin", "営業収益営業利益率"];

/// Period types that describe a single quarter; other rows (full year, half year) are dropped.
const QUARTER_PERIOD_TYPES: &[&str] = &["Q1", "Q2", "Q3", "Q4"];

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub invalid_label_policy: InvalidLabelPolicy,
    pub number_policy: NumberPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&DashboardSettings::default())
    }
}

impl From<&DashboardSettings> for LoadOptions {
    fn from(settings: &DashboardSettings) -> Self {
        Self {
            delimiter: settings.delimiter_byte(),
            invalid_label_policy: settings.invalid_label_policy,
            number_policy: settings.unparsable_number_policy,
        }
    }
}

struct ColumnMap {
    region: usize,
    period_label: usize,
    period_type: Option<usize>,
    revenue: usize,
    profit: usize,
    revenue_share: Option<usize>,
    profit_share: Option<usize>,
    margin: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let required = |aliases: &[&str]| {
            find_column(headers, aliases).ok_or_else(|| {
                EngineError::CsvDataFormatError(format!("Missing '{}' column in CSV header", aliases[0]))
            })
        };
        Ok(Self {
            region: required(REGION_HEADERS)?,
            period_label: required(PERIOD_LABEL_HEADERS)?,
            period_type: find_column(headers, PERIOD_TYPE_HEADERS),
            revenue: required(REVENUE_HEADERS)?,
            profit: required(PROFIT_HEADERS)?,
            revenue_share: find_column(headers, REVENUE_SHARE_HEADERS),
            profit_share: find_column(headers, PROFIT_SHARE_HEADERS),
            margin: find_column(headers, MARGIN_HEADERS),
        })
    }
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
}

pub struct RegionCsvParser;

impl RegionCsvParser {
    // CSV Header: region,period_label,period_type,revenue,profit,revenue_share,profit_share,margin
    // Example Row: Japan,FY2023-1Q,Q1,"2,345,678","45,678",68.2,55.1,1.9
    pub fn load_records_from_csv(file_path: &Path, options: &LoadOptions) -> Result<Vec<FinancialRecord>> {
        if !file_path.exists() {
            return Err(EngineError::DatasetNotFound(file_path.display().to_string()));
        }
        let file = File::open(file_path)?;
        let records = Self::load_records_from_reader(BufReader::new(file), options)?;
        tracing::info!(path = %file_path.display(), rows = records.len(), "Loaded regional dataset");
        Ok(records)
    }

    pub fn load_records_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<FinancialRecord>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let columns = ColumnMap::from_headers(&headers)?;

        let mut records = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let row = result?;

            if let Some(pos) = columns.period_type {
                let period_type = row.get(pos).unwrap_or("").trim();
                if !QUARTER_PERIOD_TYPES.contains(&period_type) {
                    tracing::debug!(line, period_type, "Skipping non-quarterly row");
                    continue;
                }
            }

            if let Some(record) = Self::parse_row(&row, &columns, options, line)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn parse_row(
        row: &StringRecord,
        columns: &ColumnMap,
        options: &LoadOptions,
        line: usize,
    ) -> Result<Option<FinancialRecord>> {
        let region_str = Self::get_field(row, columns.region, "region", line)?;
        let region = Region::from_label(region_str).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("Unknown region '{}' at line {}", region_str, line))
        })?;

        let period_label = Self::get_field(row, columns.period_label, "period_label", line)?.trim();
        if let Err(e) = FiscalPeriod::parse(period_label) {
            match options.invalid_label_policy {
                InvalidLabelPolicy::Reject => {
                    return Err(EngineError::FormatError(format!("line {}: {}", line, e)));
                }
                InvalidLabelPolicy::SkipWithWarning => {
                    tracing::warn!(line, label = period_label, error = %e, "Skipping row with malformed period label");
                    return Ok(None);
                }
            }
        }

        let number = |pos: Option<usize>, name: &str| -> Result<Option<f64>> {
            match pos {
                Some(pos) => {
                    let raw = Self::get_field(row, pos, name, line)?;
                    Self::parse_number(raw, name, line, options.number_policy)
                }
                None => Ok(None),
            }
        };

        Ok(Some(FinancialRecord {
            region,
            period_label: period_label.to_string(),
            revenue: number(Some(columns.revenue), "revenue")?,
            profit: number(Some(columns.profit), "profit")?,
            revenue_share: number(columns.revenue_share, "revenue_share")?,
            profit_share: number(columns.profit_share, "profit_share")?,
            margin: number(columns.margin, "margin")?,
        }))
    }

    fn parse_number(raw: &str, name: &str, line: usize, policy: NumberPolicy) -> Result<Option<f64>> {
        match number_format::parse_amount(raw) {
            Ok(value) => Ok(value),
            Err(e) => match policy {
                NumberPolicy::Missing => {
                    tracing::warn!(line, column = name, value = raw, "Unparsable number read as missing");
                    Ok(None)
                }
                NumberPolicy::Zero => {
                    tracing::warn!(line, column = name, value = raw, "Unparsable number read as zero");
                    Ok(Some(0.0))
                }
                NumberPolicy::Reject => Err(EngineError::CsvDataFormatError(format!(
                    "Error parsing '{}' at line {}: {}",
                    name, line, e
                ))),
            },
        }
    }

    fn get_field<'a>(row: &'a StringRecord, pos: usize, name: &str, line: usize) -> Result<&'a str> {
        row.get(pos)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    fn load(content: &str, options: LoadOptions) -> Result<Vec<FinancialRecord>> {
        RegionCsvParser::load_records_from_reader(content.as_bytes(), &options)
    }

    #[test]
    fn test_load_records_from_csv_valid_data() {
        let csv_content = "\
region,period_label,period_type,revenue,profit,revenue_share,profit_share,margin
Japan,FY2023-1Q,Q1,\"2,345,678\",\"45,678\",68.2,55.1,1.9
Asean,FY2023-1Q,Q1,\"456,789\",\"12,345\",13.3,14.9,2.7";
        let tmp_file = create_test_csv(csv_content);
        let records = RegionCsvParser::load_records_from_csv(tmp_file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, Region::Japan);
        assert_eq!(records[0].period_label, "FY2023-1Q");
        assert_eq!(records[0].revenue, Some(2345678.0));
        assert_eq!(records[0].profit, Some(45678.0));
        assert_eq!(records[0].revenue_share, Some(68.2));
        assert_eq!(records[0].profit_share, Some(55.1));
        assert_eq!(records[0].margin, Some(1.9));
        assert_eq!(records[1].region, Region::Asean);
    }

    #[test]
    fn test_load_records_with_local_headers() {
        let csv_content = "\
地域,決算年度,決算種別,営業収益,営業利益,営業収益構成比,営業利益構成比,営業収益営業利益率
日本,FY2023-1Q,Q1,\"1,000\",50,70.0,60.0,5.0
中国,FY2023-1Q,通期,\"9,000\",10,1.0,1.0,0.1
その他,FY2023-2Q,Q2,200,-5,10.0,-3.0,-2.5";
        let records = load(csv_content, LoadOptions::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, Region::Japan);
        assert_eq!(records[0].revenue, Some(1000.0));
        assert_eq!(records[1].region, Region::Other);
        assert_eq!(records[1].profit, Some(-5.0));
        assert_eq!(records[1].margin, Some(-2.5));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let csv_content = "region,period_label,revenue,profit\nChina,FY2022-4Q,100,10";
        let records = load(csv_content, LoadOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].margin, None);
        assert_eq!(records[0].revenue_share, None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv_content = "region,period_label,revenue\nChina,FY2022-4Q,100";
        let result = load(csv_content, LoadOptions::default());
        assert!(matches!(result, Err(EngineError::CsvDataFormatError(ref m)) if m.contains("'profit'")));
    }

    #[test]
    fn test_missing_file() {
        let result = RegionCsvParser::load_records_from_csv(Path::new("no/such/region_data.csv"), &LoadOptions::default());
        assert!(matches!(result, Err(EngineError::DatasetNotFound(_))));
    }

    #[test]
    fn test_unknown_region() {
        let csv_content = "region,period_label,revenue,profit\nEurope,FY2022-4Q,100,10";
        let result = load(csv_content, LoadOptions::default());
        assert!(matches!(result, Err(EngineError::CsvDataFormatError(ref m)) if m.contains("Europe")));
    }

    #[test]
    fn test_malformed_label_policies() {
        let csv_content = "region,period_label,revenue,profit\nJapan,2023-1Q,100,10\nJapan,FY2023-2Q,110,11";

        let reject = load(csv_content, LoadOptions::default());
        assert!(matches!(reject, Err(EngineError::FormatError(ref m)) if m.contains("line 2")));

        let options = LoadOptions {
            invalid_label_policy: InvalidLabelPolicy::SkipWithWarning,
            ..LoadOptions::default()
        };
        let records = load(csv_content, options).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].period_label, "FY2023-2Q");
    }

    #[test]
    fn test_unparsable_number_policies() {
        let csv_content = "region,period_label,revenue,profit\nJapan,FY2023-1Q,n/a,10";

        let missing = load(csv_content, LoadOptions::default()).unwrap();
        assert_eq!(missing[0].revenue, None);

        let zero = load(
            csv_content,
            LoadOptions {
                number_policy: NumberPolicy::Zero,
                ..LoadOptions::default()
            },
        )
        .unwrap();
        assert_eq!(zero[0].revenue, Some(0.0));

        let reject = load(
            csv_content,
            LoadOptions {
                number_policy: NumberPolicy::Reject,
                ..LoadOptions::default()
            },
        );
        match reject {
            Err(EngineError::CsvDataFormatError(msg)) => {
                assert!(msg.contains("Error parsing 'revenue' at line 2"));
                assert!(msg.contains("Failed to parse number 'n/a'"));
            }
            other => panic!("expected CsvDataFormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_number_is_missing_under_every_policy() {
        let csv_content = "region,period_label,revenue,profit\nJapan,FY2023-1Q,,10";
        let options = LoadOptions {
            number_policy: NumberPolicy::Reject,
            ..LoadOptions::default()
        };
        let records = load(csv_content, options).unwrap();
        assert_eq!(records[0].revenue, None);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv_content = "region;period_label;revenue;profit\nJapan;FY2023-1Q;1,500;10";
        let options = LoadOptions {
            delimiter: b';',
            ..LoadOptions::default()
        };
        let records = load(csv_content, options).unwrap();
        assert_eq!(records[0].revenue, Some(1500.0));
    }

    #[test]
    fn test_header_with_byte_order_mark() {
        let csv_content = "\u{feff}region,period_label,revenue,profit\nJapan,FY2023-1Q,1,1";
        assert_eq!(load(csv_content, LoadOptions::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_header_only_file() {
        let records = load("region,period_label,revenue,profit", LoadOptions::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_short_row_is_csv_error() {
        let csv_content = "region,period_label,revenue,profit\nJapan,FY2023-1Q";
        let result = load(csv_content, LoadOptions::default());
        assert!(matches!(result, Err(EngineError::CsvSystemError { .. })));
    }
}
