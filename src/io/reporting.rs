// src/io/reporting.rs

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::strategy::comparator::StrategySummary;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush report: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat CSV shape of a `StrategySummary`.
#[derive(Debug, Serialize)]
struct ComparisonRow {
    rank: usize,
    reorder_point: u32,
    order_up_to: u32,
    total_cost: f64,
    average_cost_per_period: f64,
    shortage_period_count: usize,
    service_level: f64,
}

/// Serializes each record as one CSV row, with a header taken from the
/// first record's field names.
pub fn write_records<W: Write, T: Serialize>(writer: W, data: &[T]) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the records to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `data` - Period records, customers, or timeline samples from a run.
pub fn write_csv<P: AsRef<Path>, T: Serialize>(file_path: P, data: &[T]) -> Result<(), ReportError> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    write_records(file, data)?;

    tracing::info!(rows = data.len(), path = %path.display(), "report written");
    Ok(())
}

/// Writes the ranked comparison table, best strategy first.
pub fn write_comparison<W: Write>(writer: W, rows: &[StrategySummary]) -> Result<(), ReportError> {
    let flat: Vec<ComparisonRow> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| ComparisonRow {
            rank: i + 1,
            reorder_point: row.policy.reorder_point(),
            order_up_to: row.policy.order_up_to(),
            total_cost: row.total_cost,
            average_cost_per_period: row.average_cost_per_period,
            shortage_period_count: row.shortage_period_count,
            service_level: row.service_level,
        })
        .collect();
    write_records(writer, &flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::demand::reference_demand;
    use crate::model::policy::{CostModel, Policy};
    use crate::simulation::inventory::simulate_inventory;

    #[test]
    fn period_records_have_a_header_and_one_row_per_period() {
        let policy = Policy::new(10, 40).unwrap();
        let result = simulate_inventory(
            &policy,
            &reference_demand(),
            CostModel::new(2.0, 5.0, 23.0).unwrap(),
            None,
        )
        .unwrap();

        let mut buffer = Vec::new();
        write_records(&mut buffer, &result.records).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("period,demand,net_stock,stock_after_demand,order_quantity"));
        assert!(lines[1].starts_with("0,15,25,25,0,0,50"));
    }

    #[test]
    fn comparison_rows_are_flattened_and_ranked() {
        let rows = vec![StrategySummary {
            policy: Policy::new(20, 60).unwrap(),
            total_cost: 100.0,
            average_cost_per_period: 25.0,
            shortage_period_count: 1,
            service_level: 0.5,
        }];
        let mut buffer = Vec::new();
        write_comparison(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("rank,reorder_point,order_up_to,total_cost"));
        assert!(text.contains("1,20,60,100.0,25.0,1,0.5"));
    }
}
