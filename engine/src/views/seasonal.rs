// Quarter-of-year averages across every fiscal year in the dataset.
use crate::data::Dataset;
use crate::periods::fiscal_period::QUARTERS_PER_YEAR;
use shared::models::{Metric, PivotTable};

/// Mean of `metric` per region and quarter (`Q1`..`Q4`). Missing values are left out of
/// the mean; a quarter with no values is `None`.
pub fn seasonal_averages(dataset: &Dataset, metric: Metric, title: &str) -> PivotTable {
    let columns = (1..=QUARTERS_PER_YEAR).map(|q| format!("Q{}", q)).collect();
    let mut table = PivotTable::new(title, metric, columns);

    for (region, rows) in dataset.series() {
        let mut sums = [0.0f64; QUARTERS_PER_YEAR as usize];
        let mut counts = [0usize; QUARTERS_PER_YEAR as usize];
        for row in rows {
            if let Some(v) = row.value(metric) {
                let slot = usize::from(row.period.quarter() - 1);
                sums[slot] += v;
                counts[slot] += 1;
            }
        }
        let means = sums
            .iter()
            .zip(counts.iter())
            .map(|(sum, &n)| (n > 0).then(|| sum / n as f64))
            .collect();
        table.push_row(region.name(), means);
    }
    table
}
