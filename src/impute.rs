//! Mean imputation in standardized space.
//!
//! Each coordinate column (one axis of one joint in one frame, across all
//! recordings) is standardized over its observed entries, missing entries
//! are filled with the mean of the standardized observed values, and the
//! affine transform is inverted to return to original coordinate units.
//! That fill mean is ≈0 by construction but is computed explicitly rather
//! than assumed, so zero-variance and all-missing columns fall through the
//! same code path. Flag and named columns are never touched.
//!
//! Degenerate columns are not an error here: a column with no observed
//! entries imputes to 0.0 in original units (mean 0, std 1 fallback), and
//! a zero-variance column imputes to its constant observed value. Callers
//! that want to reject degenerate input instead can run
//! [`ScalingParameters::check`] first.

use ndarray::ArrayView1;

use crate::error::{ImputationError, Result};
use crate::table::{ColumnId, ColumnKey, FeatureTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Invertible per-column standardization parameters, fitted over observed
/// (non-NaN) entries only.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnScaling {
    /// Mean of observed entries (0.0 when nothing is observed).
    pub mean: f64,
    /// Population standard deviation of observed entries, with 1.0
    /// substituted for all-missing and zero-variance columns.
    pub std: f64,
    degenerate: bool,
}

impl ColumnScaling {
    /// Fit mean and standard deviation over the column's observed entries.
    ///
    /// A column with zero observed entries gets mean 0 / std 1; a column
    /// with zero variance keeps its mean but gets std 1. Both are marked
    /// degenerate.
    #[must_use]
    pub fn fit(column: ArrayView1<'_, f64>) -> Self {
        let mut sum = 0.0;
        let mut observed = 0usize;
        for &v in &column {
            if !v.is_nan() {
                sum += v;
                observed += 1;
            }
        }

        if observed == 0 {
            return Self {
                mean: 0.0,
                std: 1.0,
                degenerate: true,
            };
        }

        let mean = sum / observed as f64;
        let mut sum_sq = 0.0;
        for &v in &column {
            if !v.is_nan() {
                sum_sq += (v - mean) * (v - mean);
            }
        }
        let std = (sum_sq / observed as f64).sqrt();

        if std > 0.0 {
            Self {
                mean,
                std,
                degenerate: false,
            }
        } else {
            Self {
                mean,
                std: 1.0,
                degenerate: true,
            }
        }
    }

    /// Map a value into standardized space.
    #[must_use]
    pub fn transform(&self, v: f64) -> f64 {
        (v - self.mean) / self.std
    }

    /// Map a standardized value back to original units.
    #[must_use]
    pub fn inverse(&self, v: f64) -> f64 {
        v * self.std + self.mean
    }

    /// Whether the fallback mean/std was substituted (all-missing or
    /// zero-variance column).
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

/// Fitted scaling for every coordinate column of a table, in column order.
#[derive(Debug, Clone)]
pub struct ScalingParameters {
    entries: Vec<(ColumnId, ColumnScaling)>,
}

impl ScalingParameters {
    /// Fit scaling parameters for each coordinate column.
    #[must_use]
    pub fn fit(table: &FeatureTable) -> Self {
        let entries = table
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(position, key)| match key {
                ColumnKey::Joint(id) if id.feature.is_coordinate() => {
                    Some((*id, ColumnScaling::fit(table.column_at(position))))
                }
                _ => None,
            })
            .collect();
        Self { entries }
    }

    /// Scaling for one coordinate column, if it exists in the table.
    #[must_use]
    pub fn get(&self, id: ColumnId) -> Option<&ColumnScaling> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, scaling)| scaling)
    }

    /// Iterate over `(column, scaling)` pairs in table column order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &ColumnScaling)> {
        self.entries.iter().map(|(id, scaling)| (*id, scaling))
    }

    /// Number of fitted coordinate columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no coordinate column was fitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Strict validation: fail on the first degenerate column.
    ///
    /// # Errors
    ///
    /// Returns [`ImputationError::DegenerateColumn`] naming the first
    /// all-missing or zero-variance coordinate column.
    pub fn check(&self) -> Result<()> {
        for (id, scaling) in &self.entries {
            if scaling.is_degenerate() {
                return Err(ImputationError::degenerate_column(id.name()));
            }
        }
        Ok(())
    }
}

/// Replace every NaN in the table's coordinate columns with the per-column
/// mean of observed values.
///
/// With `scale` set, each column goes through the three-phase
/// standardize → mean-fill → invert sequence; otherwise missing entries are
/// filled with the observed mean directly. Flag columns and named columns
/// pass through exactly as given.
pub fn impute_missingness(table: &FeatureTable, scale: bool) -> FeatureTable {
    let mut values = table.values().to_owned();

    for (position, key) in table.columns().iter().enumerate() {
        if !key.is_coordinate() {
            continue;
        }

        let scaling = ColumnScaling::fit(values.column(position));
        let mut column = values.column_mut(position);

        if scale {
            // Phase 1: standardize observed entries.
            for v in column.iter_mut() {
                if !v.is_nan() {
                    *v = scaling.transform(*v);
                }
            }

            // Phase 2: fill missing entries with the explicit mean of the
            // standardized observed values (0.0 when nothing is observed).
            let mut sum = 0.0;
            let mut observed = 0usize;
            for &v in column.iter() {
                if !v.is_nan() {
                    sum += v;
                    observed += 1;
                }
            }
            let fill = if observed > 0 { sum / observed as f64 } else { 0.0 };

            // Phase 3: invert the affine transform over every entry.
            for v in column.iter_mut() {
                if v.is_nan() {
                    *v = fill;
                }
                *v = scaling.inverse(*v);
            }
        } else {
            for v in column.iter_mut() {
                if v.is_nan() {
                    *v = scaling.mean;
                }
            }
        }
    }

    table.replace_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Feature;
    use ndarray::{array, Array2};

    fn coordinate_table(columns: Vec<ColumnKey>, values: Array2<f64>) -> FeatureTable {
        FeatureTable::new(columns, values).unwrap()
    }

    #[test]
    fn test_scaling_fit() {
        let column = array![1.0, 3.0, f64::NAN, 5.0];
        let scaling = ColumnScaling::fit(column.view());
        assert!((scaling.mean - 3.0).abs() < 1e-12);
        // Population std over [1, 3, 5].
        let expected_std = (8.0f64 / 3.0).sqrt();
        assert!((scaling.std - expected_std).abs() < 1e-12);
        assert!(!scaling.is_degenerate());

        let v = 4.2;
        assert!((scaling.inverse(scaling.transform(v)) - v).abs() < 1e-12);
    }

    #[test]
    fn test_scaling_degenerate_fallbacks() {
        let all_missing = array![f64::NAN, f64::NAN];
        let scaling = ColumnScaling::fit(all_missing.view());
        assert_eq!(scaling.mean, 0.0);
        assert_eq!(scaling.std, 1.0);
        assert!(scaling.is_degenerate());

        let constant = array![2.5, 2.5, f64::NAN];
        let scaling = ColumnScaling::fit(constant.view());
        assert_eq!(scaling.mean, 2.5);
        assert_eq!(scaling.std, 1.0);
        assert!(scaling.is_degenerate());
    }

    #[test]
    fn test_mean_imputation_through_scaling() {
        let table = coordinate_table(
            vec![ColumnKey::joint(0, 0, Feature::X)],
            array![[1.0], [3.0], [f64::NAN]],
        );
        let imputed = impute_missingness(&table, true);

        assert!((imputed.value(2, "frame_0_joint_0_x").unwrap() - 2.0).abs() < 1e-9);
        // Observed entries survive the standardize/invert round trip.
        assert!((imputed.value(0, "frame_0_joint_0_x").unwrap() - 1.0).abs() < 1e-9);
        assert!((imputed.value(1, "frame_0_joint_0_x").unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_clean_column_unchanged() {
        let table = coordinate_table(
            vec![ColumnKey::joint(0, 0, Feature::Y)],
            array![[1.5], [-2.0], [0.25], [4.0]],
        );
        let imputed = impute_missingness(&table, true);
        for row in 0..4 {
            let before = table.value(row, "frame_0_joint_0_y").unwrap();
            let after = imputed.value(row, "frame_0_joint_0_y").unwrap();
            assert!((before - after).abs() < 1e-9);
        }
    }

    #[test]
    fn test_all_missing_column_imputes_to_zero() {
        let table = coordinate_table(
            vec![ColumnKey::joint(0, 0, Feature::Z)],
            array![[f64::NAN], [f64::NAN]],
        );
        let imputed = impute_missingness(&table, true);
        assert_eq!(imputed.value(0, "frame_0_joint_0_z"), Some(0.0));
        assert_eq!(imputed.value(1, "frame_0_joint_0_z"), Some(0.0));
    }

    #[test]
    fn test_zero_variance_column_imputes_to_constant() {
        let table = coordinate_table(
            vec![ColumnKey::joint(0, 0, Feature::X)],
            array![[7.0], [7.0], [f64::NAN]],
        );
        let imputed = impute_missingness(&table, true);
        assert!((imputed.value(2, "frame_0_joint_0_x").unwrap() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_flags_and_named_columns_untouched() {
        let table = coordinate_table(
            vec![
                ColumnKey::joint(0, 0, Feature::X),
                ColumnKey::joint(0, 0, Feature::IsMissing),
                ColumnKey::named("label"),
            ],
            array![[f64::NAN, 1.0, 4.0], [2.0, 0.0, 9.0]],
        );
        let imputed = impute_missingness(&table, true);

        assert_eq!(imputed.value(0, "frame_0_joint_0_is_missing"), Some(1.0));
        assert_eq!(imputed.value(1, "frame_0_joint_0_is_missing"), Some(0.0));
        assert_eq!(imputed.value(0, "label"), Some(4.0));
        // The coordinate itself was filled.
        assert!((imputed.value(0, "frame_0_joint_0_x").unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unscaled_path_fills_observed_mean() {
        let table = coordinate_table(
            vec![ColumnKey::joint(0, 0, Feature::X)],
            array![[10.0], [f64::NAN], [20.0]],
        );
        let imputed = impute_missingness(&table, false);
        assert!((imputed.value(1, "frame_0_joint_0_x").unwrap() - 15.0).abs() < 1e-12);
        // Observed entries are bit-identical without the scaling round trip.
        assert_eq!(imputed.value(0, "frame_0_joint_0_x"), Some(10.0));
    }

    #[test]
    fn test_scaling_parameters_check() {
        let table = coordinate_table(
            vec![
                ColumnKey::joint(0, 0, Feature::X),
                ColumnKey::joint(0, 0, Feature::Y),
            ],
            array![[1.0, f64::NAN], [2.0, f64::NAN]],
        );
        let params = ScalingParameters::fit(&table);
        assert_eq!(params.len(), 2);
        assert!(params
            .get(ColumnId::new(0, 0, Feature::X))
            .is_some_and(|s| !s.is_degenerate()));

        let err = params.check().unwrap_err();
        assert!(err.to_string().contains("frame_0_joint_0_y"));
    }
}
