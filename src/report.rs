//! Sample-prediction report written after training for manual inspection.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::{PipelineError, Result};

pub const ACTUAL_COLUMN: &str = "actual_price";
pub const PREDICTED_COLUMN: &str = "predicted_price";

/// Build the report frame: the first `rows` held-out feature rows with their
/// actual label and the prediction rounded half-to-even to an integer.
pub fn sample_report(
    x_test: &DataFrame,
    y_test: &Series,
    predictions: &[f64],
    rows: usize,
) -> Result<DataFrame> {
    let n = rows.min(x_test.height()).min(predictions.len());
    let mut report = x_test.head(Some(n));
    let actual = y_test.head(Some(n)).with_name(ACTUAL_COLUMN);
    let predicted: Vec<i64> = predictions[..n]
        .iter()
        .map(|p| p.round_ties_even() as i64)
        .collect();
    report.with_column(actual)?;
    report.with_column(Series::new(PREDICTED_COLUMN, predicted))?;
    Ok(report)
}

/// Write the report as CSV with a header row, replacing any existing file.
pub fn write_sample_report(
    x_test: &DataFrame,
    y_test: &Series,
    predictions: &[f64],
    rows: usize,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let path = path.as_ref();
    let mut report = sample_report(x_test, y_test, predictions, rows)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    let mut file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut report)?;
    info!(path = %path.display(), rows = report.height(), "wrote sample predictions");
    Ok(report.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held_out(n: usize) -> (DataFrame, Series, Vec<f64>) {
        let area: Vec<i64> = (0..n as i64).map(|i| 1000 + i).collect();
        let location: Vec<&str> = (0..n).map(|_| "Delhi").collect();
        let x = DataFrame::new(vec![
            Series::new("area", area),
            Series::new("location", location),
        ])
        .unwrap();
        let y = Series::new("price", (0..n as i64).map(|i| 100 + i).collect::<Vec<_>>());
        let preds: Vec<f64> = (0..n).map(|i| i as f64 + 0.5).collect();
        (x, y, preds)
    }

    #[test]
    fn test_report_takes_leading_rows() {
        let (x, y, preds) = held_out(30);
        let report = sample_report(&x, &y, &preds, 20).unwrap();
        assert_eq!(report.height(), 20);
        assert_eq!(
            report.get_column_names(),
            vec!["area", "location", ACTUAL_COLUMN, PREDICTED_COLUMN]
        );
        let actual: Vec<i64> = report
            .column(ACTUAL_COLUMN)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(actual[..3], [100, 101, 102]);
    }

    #[test]
    fn test_predictions_round_half_to_even() {
        let (x, y, preds) = held_out(4);
        let report = sample_report(&x, &y, &preds, 20).unwrap();
        assert_eq!(report.height(), 4);
        let predicted: Vec<i64> = report
            .column(PREDICTED_COLUMN)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        // 0.5, 1.5, 2.5, 3.5
        assert_eq!(predicted, vec![0, 2, 2, 4]);
    }

    #[test]
    fn test_write_creates_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("sample_predictions.csv");
        let (x, y, preds) = held_out(25);
        let written = write_sample_report(&x, &y, &preds, 20, &path).unwrap();
        assert_eq!(written, 20);

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("area,location,actual_price,predicted_price")
        );
        assert_eq!(lines.count(), 20);
    }
}
