//! Dataset-preparation utilities.
//!
//! Training-side consumers of the same [`FeatureTable`] type: duplicate
//! removal, one-hot label encoding, and per-label splitting. They join on
//! the tabularizer's column identities and operate on tables, never on raw
//! tensors. None of this runs on the inference path.

use ndarray::Array2;
use std::collections::{BTreeMap, HashSet};

use crate::config::PipelineConfig;
use crate::error::{ImputationError, Result};
use crate::table::{ColumnKey, FeatureTable};
use crate::LABEL_COLUMN;

/// Drop duplicate and empty recordings, then re-encode zeros as missing.
///
/// The capture rig emits an all-zero joint when tracking is lost, so after
/// dropping exact-duplicate rows (first occurrence kept) and rows whose
/// coordinate columns are entirely zero, every remaining exact 0.0
/// coordinate is converted to NaN for the flagging/imputation stages to
/// handle. Flag and named columns are left as they are.
#[must_use]
pub fn remove_duplicates(table: &FeatureTable) -> FeatureTable {
    let coordinate_positions: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, key)| key.is_coordinate())
        .map(|(position, _)| position)
        .collect();

    let mut seen: HashSet<Vec<u64>> = HashSet::new();
    let mut keep_rows = Vec::new();
    for row in 0..table.n_rows() {
        // Bit-pattern hashing keeps NaN rows comparable.
        let fingerprint: Vec<u64> = table
            .values()
            .row(row)
            .iter()
            .map(|v| v.to_bits())
            .collect();
        if !seen.insert(fingerprint) {
            continue;
        }

        let all_zero = coordinate_positions
            .iter()
            .all(|&position| table.values()[(row, position)] == 0.0);
        if !all_zero {
            keep_rows.push(row);
        }
    }

    let deduplicated = table.select_rows(&keep_rows);
    let mut values = deduplicated.values().to_owned();
    for &position in &coordinate_positions {
        for v in values.column_mut(position).iter_mut() {
            if *v == 0.0 {
                *v = f64::NAN;
            }
        }
    }
    deduplicated.replace_values(values)
}

/// Read and validate a row's label as a class index.
fn class_of(row: usize, value: f64, classes: usize) -> Result<usize> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value >= classes as f64 {
        return Err(ImputationError::InvalidLabel { row, value });
    }
    Ok(value as usize)
}

/// Replace the `label` column with a fixed one-hot `label_0..label_{n-1}`
/// block appended after the feature columns.
///
/// Every class column is always emitted, even for classes absent from the
/// data, so the encoded width is independent of the batch.
///
/// # Errors
///
/// Returns [`ImputationError::MissingColumn`] if the table has no `label`
/// column, or [`ImputationError::InvalidLabel`] for a label that isn't an
/// integer in `0..label_classes`.
pub fn encode_label_dummies(table: &FeatureTable, config: &PipelineConfig) -> Result<FeatureTable> {
    config.validate()?;
    let label_position = table
        .column_index(LABEL_COLUMN)
        .ok_or_else(|| ImputationError::missing_column(LABEL_COLUMN))?;

    let n_rows = table.n_rows();
    let feature_positions: Vec<usize> = (0..table.n_columns())
        .filter(|&position| position != label_position)
        .collect();

    let width = feature_positions.len() + config.label_classes;
    let mut columns = Vec::with_capacity(width);
    let mut values = Array2::zeros((n_rows, width));

    for (out, &source) in feature_positions.iter().enumerate() {
        columns.push(table.key_at(source).clone());
        values.column_mut(out).assign(&table.column_at(source));
    }
    for class in 0..config.label_classes {
        columns.push(ColumnKey::named(format!("label_{class}")));
    }

    let labels = table.column_at(label_position);
    for (row, &label) in labels.iter().enumerate() {
        let class = class_of(row, label, config.label_classes)?;
        values[(row, feature_positions.len() + class)] = 1.0;
    }

    FeatureTable::new(columns, values)
}

/// Partition a labeled table into per-label tables, label column dropped,
/// keyed by ascending label value.
///
/// # Errors
///
/// Returns [`ImputationError::MissingColumn`] if the table has no `label`
/// column, or [`ImputationError::InvalidLabel`] for a non-integer label.
pub fn split_by_label(table: &FeatureTable) -> Result<BTreeMap<usize, FeatureTable>> {
    let label_position = table
        .column_index(LABEL_COLUMN)
        .ok_or_else(|| ImputationError::missing_column(LABEL_COLUMN))?;

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let labels = table.column_at(label_position);
    for (row, &label) in labels.iter().enumerate() {
        let class = class_of(row, label, usize::MAX)?;
        groups.entry(class).or_default().push(row);
    }

    let feature_positions: Vec<usize> = (0..table.n_columns())
        .filter(|&position| position != label_position)
        .collect();

    let mut split = BTreeMap::new();
    for (class, rows) in groups {
        let group = table.select_rows(&rows).select_columns(&feature_positions)?;
        split.insert(class, group);
    }
    Ok(split)
}
