//! Table-to-tensor conversion for model consumption.
//!
//! Drops the label-encoding columns a training pipeline may have carried
//! through the table, then reshapes the remaining coordinate+flag block
//! into the `(N, frames, joints*4)` float32 tensor the model consumes.
//! The reshape is purely structural: it is valid only because the flagger
//! left the columns in frame-major, joint-minor `[x, y, z, is_missing]`
//! order, so the column count is checked exactly before reshaping.

use ndarray::{Array2, Array3};

use crate::config::PipelineConfig;
use crate::error::{ImputationError, Result};
use crate::table::{ColumnKey, FeatureTable};
use crate::LABEL_COLUMN;

/// Whether a named column belongs to the reserved label encoding: the raw
/// `label` column or one of the `label_0..label_{classes-1}` one-hot
/// columns.
fn is_label_column(key: &ColumnKey, reserved: &[String]) -> bool {
    match key {
        ColumnKey::Joint(_) => false,
        ColumnKey::Named(name) => name == LABEL_COLUMN || reserved.iter().any(|r| r == name),
    }
}

/// Convert an imputed table back into the model input tensor.
///
/// # Errors
///
/// Returns [`ImputationError::ShapeMismatch`] if, after dropping label
/// columns, the remaining column count isn't exactly `frames * joints * 4`.
/// That mismatch always indicates a column-ordering bug upstream and is
/// never recovered from.
pub fn detabularize(table: &FeatureTable, config: &PipelineConfig) -> Result<Array3<f32>> {
    config.validate()?;

    let reserved: Vec<String> = (0..config.label_classes)
        .map(|class| format!("label_{class}"))
        .collect();
    let keep: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, key)| !is_label_column(key, &reserved))
        .map(|(position, _)| position)
        .collect();

    let expected = config.feature_width();
    if keep.len() != expected {
        return Err(ImputationError::shape_mismatch(expected, keep.len()));
    }

    let n_samples = table.n_rows();
    let mut flat = Array2::<f32>::zeros((n_samples, expected));
    for (out, &source) in keep.iter().enumerate() {
        let column = table.column_at(source);
        for (row, &v) in column.iter().enumerate() {
            flat[(row, out)] = v as f32;
        }
    }

    let per_frame = config.joints * crate::FEATURES_PER_JOINT;
    let tensor = flat
        .into_shape_with_order((n_samples, config.frames, per_frame))
        .map_err(|_| ImputationError::shape_mismatch(expected, keep.len()))?;
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::flag_joint_missingness;
    use crate::tabularize::tabularize;
    use ndarray::Array4;

    fn flagged_table(n: usize, config: &PipelineConfig) -> FeatureTable {
        let tensor = Array4::zeros((n, config.frames, config.joints, 3));
        let table = tabularize(tensor.view(), None, config).unwrap();
        flag_joint_missingness(&table).unwrap()
    }

    #[test]
    fn test_output_shape() {
        let config = PipelineConfig::default();
        let flagged = flagged_table(4, &config);
        let tensor = detabularize(&flagged, &config).unwrap();
        assert_eq!(tensor.shape(), &[4, 15, 100]);
    }

    #[test]
    fn test_label_columns_dropped() {
        let config = PipelineConfig::new().with_frames(2).with_joints(2);
        let tensor = Array4::zeros((2, 2, 2, 3));
        let table = tabularize(tensor.view(), Some(&[0.0, 1.0]), &config).unwrap();
        let mut flagged = flag_joint_missingness(&table).unwrap();

        // Simulate a training table that also carries the one-hot block.
        for class in 0..config.label_classes {
            flagged = flagged
                .append_column(ColumnKey::named(format!("label_{class}")), &[0.0, 0.0])
                .unwrap();
        }

        let cleaned = detabularize(&flagged, &config).unwrap();
        assert_eq!(cleaned.shape(), &[2, 2, 8]);
    }

    #[test]
    fn test_off_by_one_column_count_is_fatal() {
        let config = PipelineConfig::default();
        let flagged = flagged_table(1, &config);
        let extra = flagged
            .append_column(ColumnKey::named("extra"), &[0.0])
            .unwrap();
        assert_eq!(extra.n_columns(), 1501);

        assert!(matches!(
            detabularize(&extra, &config),
            Err(ImputationError::ShapeMismatch {
                expected: 1500,
                actual: 1501,
            })
        ));
    }

    #[test]
    fn test_values_survive_in_order() {
        let config = PipelineConfig::new().with_frames(2).with_joints(2);
        let mut raw = Array4::zeros((1, 2, 2, 3));
        for (i, v) in raw.iter_mut().enumerate() {
            *v = i as f64;
        }
        let table = tabularize(raw.view(), None, &config).unwrap();
        let flagged = flag_joint_missingness(&table).unwrap();
        let cleaned = detabularize(&flagged, &config).unwrap();

        // Frame 1, joint 1, z sits at tensor cell 11 of the counting input
        // and at block offset joint*4 + 2 in the output frame.
        assert_eq!(cleaned[(0, 1, 4 + 2)], 11.0);
        // The flag slots inside each joint block are all zero (no NaN).
        assert_eq!(cleaned[(0, 0, 3)], 0.0);
        assert_eq!(cleaned[(0, 1, 7)], 0.0);
    }
}
