// CSV and JSON output for the report runner
use crate::error::Result;
use crate::periods::PeriodSelection;
use crate::views::{AugmentedRecord, RegionDetail};
use chrono::{DateTime, Utc};
use csv::Writer;
use serde::Serialize;
use shared::models::{Metric, PivotTable};
use shared::utils::format_cell;
use std::fs::File;
use std::path::Path;

pub const MANIFEST_FILENAME: &str = "manifest.json";

/// How numbers are rendered in a CSV cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellFormat {
    pub decimals: usize,
    pub thousands: bool,
}

impl CellFormat {
    /// Growth rates and ratios.
    pub const PERCENT: CellFormat = CellFormat {
        decimals: 1,
        thousands: false,
    };

    pub fn for_metric(metric: Metric) -> Self {
        CellFormat {
            decimals: metric.display_decimals(),
            thousands: metric.is_amount(),
        }
    }

    fn render(&self, value: Option<f64>) -> String {
        format_cell(value, self.decimals, self.thousands)
    }
}

/// Writes a pivot table: a label column followed by one column per period.
pub fn write_pivot_csv(path: &Path, table: &PivotTable, format: CellFormat) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;

    let mut header = Vec::with_capacity(table.columns.len() + 1);
    header.push("region".to_string());
    header.extend(table.columns.iter().cloned());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.label.clone());
        record.extend(row.values.iter().map(|v| format.render(*v)));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    tracing::debug!(path = %path.display(), title = %table.title, rows = table.rows.len(), "Wrote pivot table");
    Ok(())
}

pub fn write_region_detail_csv(path: &Path, detail: &RegionDetail) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    let amount = CellFormat::for_metric(Metric::Revenue);

    wtr.write_record([
        "period",
        "revenue",
        "profit",
        "revenue_yoy",
        "margin",
        "revenue_share",
        "profit_share",
    ])?;
    for row in &detail.rows {
        wtr.write_record([
            row.period.label(),
            amount.render(row.revenue),
            amount.render(row.profit),
            CellFormat::PERCENT.render(row.revenue_yoy),
            CellFormat::PERCENT.render(row.margin),
            CellFormat::PERCENT.render(row.revenue_share),
            CellFormat::PERCENT.render(row.profit_share),
        ])?;
    }

    wtr.flush()?;
    tracing::debug!(path = %path.display(), region = %detail.region, rows = detail.rows.len(), "Wrote region detail");
    Ok(())
}

/// Writes the augmented dataset unformatted, one `<metric>_yoy` column per entry of `growth_metrics`.
pub fn write_augmented_csv(path: &Path, records: &[AugmentedRecord], growth_metrics: &[Metric]) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;

    let mut header: Vec<String> = ["region", "period_label", "period_key"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(Metric::ALL.iter().map(|m| m.to_string()));
    header.extend(growth_metrics.iter().map(|m| format!("{}_yoy", m)));
    wtr.write_record(&header)?;

    let raw = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for rec in records {
        let mut record = vec![
            rec.row.region().name().to_string(),
            rec.row.period.label(),
            rec.period_key.to_string(),
        ];
        record.extend(Metric::ALL.iter().map(|m| raw(rec.row.value(*m))));
        record.extend(
            growth_metrics
                .iter()
                .map(|m| raw(rec.growth.get(m).copied().flatten())),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Summary of one report run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportManifest {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub dataset_fingerprint: String,
    pub selection: PeriodSelection,
    pub periods: Vec<String>,
    pub region: Option<String>,
    pub files: Vec<String>,
}

pub fn write_manifest(path: &Path, manifest: &ReportManifest) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, manifest)?;
    tracing::info!(path = %path.display(), files = manifest.files.len(), "Wrote report manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::periods::FiscalPeriod;
    use crate::views::RegionDetailRow;
    use shared::models::Region;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_pivot_csv_formats_amounts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("revenue.csv");
        let mut table = PivotTable::new("Revenue", Metric::Revenue, vec!["FY2023-1Q".into(), "FY2023-2Q".into()]);
        table.push_row("Japan", vec![Some(1234567.4), None]);
        table.push_row("China", vec![Some(-2500.0), Some(12.0)]);

        write_pivot_csv(&path, &table, CellFormat::for_metric(Metric::Revenue)).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "region,FY2023-1Q,FY2023-2Q\nJapan,\"1,234,567\",\nChina,\"-2,500\",12\n"
        );
    }

    #[test]
    fn test_write_pivot_csv_percent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("yoy.csv");
        let mut table = PivotTable::new("Revenue YoY", Metric::Revenue, vec!["FY2023-1Q".into()]);
        table.push_row("Asean", vec![Some(12.34)]);
        table.push_row("Other", vec![None]);

        write_pivot_csv(&path, &table, CellFormat::PERCENT).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "region,FY2023-1Q\nAsean,12.3\nOther,\n");
    }

    #[test]
    fn test_write_region_detail_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("detail.csv");
        let detail = RegionDetail {
            region: Region::China,
            rows: vec![RegionDetailRow {
                period: FiscalPeriod::parse("FY2023-1Q").unwrap(),
                revenue: Some(5000.0),
                profit: Some(-120.0),
                revenue_yoy: Some(3.4),
                margin: Some(-2.4),
                revenue_share: None,
                profit_share: Some(1.0),
            }],
        };

        write_region_detail_csv(&path, &detail).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("period,revenue,profit,revenue_yoy,margin,revenue_share,profit_share")
        );
        assert_eq!(lines.next(), Some("FY2023-1Q,\"5,000\",-120,3.4,-2.4,,1.0"));
    }

    #[test]
    fn test_write_augmented_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("augmented.csv");
        let record = shared::models::FinancialRecord::new(Region::Japan, "FY2023-1Q", Some(110.0), None);
        let row = crate::periods::PeriodRecord::from_record(record).unwrap();
        let mut growth = BTreeMap::new();
        growth.insert(Metric::Revenue, Some(10.0));
        let augmented = vec![AugmentedRecord {
            period_key: row.period_key(),
            row,
            growth,
        }];

        write_augmented_csv(&path, &augmented, &[Metric::Revenue, Metric::Profit]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "region,period_label,period_key,revenue,profit,revenue_share,profit_share,margin,revenue_yoy,profit_yoy"
        );
        assert_eq!(lines[1], "Japan,FY2023-1Q,20231,110,,,,,10,");
    }

    #[test]
    fn test_write_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);
        let manifest = ReportManifest {
            generated_at: Utc::now(),
            source: "data/region_data.csv".to_string(),
            dataset_fingerprint: "00ff".to_string(),
            selection: PeriodSelection::Recent { count: 4 },
            periods: vec!["FY2023-1Q".to_string()],
            region: None,
            files: vec!["revenue.csv".to_string()],
        };

        write_manifest(&path, &manifest).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["selection"]["mode"], "recent");
        assert_eq!(json["selection"]["count"], 4);
        assert_eq!(json["files"][0], "revenue.csv");
        assert!(json["region"].is_null());
        assert!(json["generated_at"].is_string());
    }
}
