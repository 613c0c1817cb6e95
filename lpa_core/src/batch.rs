//! Batch assessment of CSV readings.
//!
//! Input rows are `kit,value` with a header line. Every input row yields one
//! output row; rows that cannot be assessed carry an `error` column instead
//! of results and do not stop the batch.

use crate::conversion::ensure_non_negative;
use crate::{assess, ConversionModel, Result, RiskClassifier};
use std::io::{Read, Write};

/// A row in the CSV input
#[derive(Debug, serde::Deserialize)]
struct InputRow {
    kit: String,
    value: String,
}

/// A row in the CSV output
#[derive(Debug, Default, serde::Serialize)]
struct OutputRow {
    kit: String,
    value: String,
    harmonized_nmol_l: Option<f64>,
    band_index: Option<usize>,
    label: Option<&'static str>,
    legacy_nmol_l: Option<f64>,
    legacy_label: Option<&'static str>,
    underestimated: Option<bool>,
    error: Option<String>,
}

/// Counts from one batch run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub underestimated: usize,
}

/// Assess every row of `input` and write the results to `output`
pub fn assess_csv<R: Read, W: Write>(
    model: &ConversionModel,
    classifier: &RiskClassifier,
    input: R,
    output: W,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (line, record) in reader.deserialize::<InputRow>().enumerate() {
        summary.processed += 1;
        let row = match record {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Row {}: {}", line + 1, e);
                summary.failed += 1;
                writer.serialize(OutputRow {
                    error: Some(format!("malformed row: {}", e)),
                    ..Default::default()
                })?;
                continue;
            }
        };

        let out = match assess_row(model, classifier, &row) {
            Ok(out) => {
                if out.underestimated == Some(true) {
                    summary.underestimated += 1;
                }
                out
            }
            Err(e) => {
                tracing::warn!("Row {}: {}", line + 1, e);
                summary.failed += 1;
                OutputRow {
                    kit: row.kit,
                    value: row.value,
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };

        writer.serialize(out)?;
    }

    writer.flush()?;

    tracing::info!(
        "Batch complete: {} rows, {} failed, {} under-classified by legacy",
        summary.processed,
        summary.failed,
        summary.underestimated
    );

    Ok(summary)
}

fn assess_row(
    model: &ConversionModel,
    classifier: &RiskClassifier,
    row: &InputRow,
) -> Result<OutputRow> {
    let value: f64 = row.value.parse().map_err(|_| {
        crate::Error::InvalidInput(format!("'{}' is not a number", row.value))
    })?;
    let value = ensure_non_negative(value)?;
    let assessment = assess(model, classifier, &row.kit, value)?;

    let legacy = assessment.legacy.as_ref();
    Ok(OutputRow {
        kit: row.kit.clone(),
        value: row.value.clone(),
        harmonized_nmol_l: Some(assessment.conversion.harmonized),
        band_index: Some(assessment.risk.band_index),
        label: Some(assessment.risk.label),
        legacy_nmol_l: legacy.map(|l| l.estimate),
        legacy_label: legacy.map(|l| l.comparison.secondary.label),
        underestimated: legacy.map(|l| l.comparison.is_underestimated),
        error: None,
    })
}
