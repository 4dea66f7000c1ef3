//! Per-joint missingness flagging.
//!
//! For every (frame, joint) pair, derives a boolean `is_missing` column
//! from the three coordinate columns and rebuilds the table in per-joint
//! blocks of `[x, y, z, is_missing]`, frame-major and joint-minor. That
//! block order is what makes the final reshape into `(N, frames, joints*4)`
//! structurally valid, so it is restored here explicitly by sorting on the
//! integer `(frame, joint)` pair rather than on column names.
//!
//! Columns that are not x/y/z coordinates (a label, prior flags) pass
//! through unmodified, appended after the ordered coordinate+flag block in
//! their original relative order.

use ndarray::Array2;
use std::collections::BTreeMap;

use crate::error::{ImputationError, Result};
use crate::table::{ColumnKey, Feature, FeatureTable};
use crate::FEATURES_PER_JOINT;

/// Derive per-joint missingness flags and restore block ordering.
///
/// A joint's flag is true iff any of its x/y/z coordinates is NaN in that
/// row. Flags are stored as 0.0 / 1.0.
///
/// # Errors
///
/// Returns [`ImputationError::IncompleteJoint`] if a (frame, joint) pair
/// has some but not all of its x/y/z columns. The flagger fails fast here
/// rather than flagging the joints it can: a partial joint group means the
/// table was not produced by [`tabularize`](crate::tabularize) and the
/// downstream reshape contract is already broken.
pub fn flag_joint_missingness(table: &FeatureTable) -> Result<FeatureTable> {
    // Group coordinate columns by (frame, joint). BTreeMap iteration is
    // ascending over the integer pair, which is exactly the frame-major,
    // joint-minor order the output must have.
    let mut groups: BTreeMap<(usize, usize), [Option<usize>; 3]> = BTreeMap::new();
    let mut passthrough: Vec<usize> = Vec::new();

    for (position, key) in table.columns().iter().enumerate() {
        match key {
            ColumnKey::Joint(id) if id.feature.is_coordinate() => {
                let slot = match id.feature {
                    Feature::X => 0,
                    Feature::Y => 1,
                    Feature::Z => 2,
                    Feature::IsMissing => unreachable!(),
                };
                groups.entry((id.frame, id.joint)).or_insert([None; 3])[slot] = Some(position);
            }
            _ => passthrough.push(position),
        }
    }

    let n_rows = table.n_rows();
    let out_width = groups.len() * FEATURES_PER_JOINT + passthrough.len();
    let mut columns = Vec::with_capacity(out_width);
    let mut values = Array2::zeros((n_rows, out_width));
    let mut out = 0;

    for (&(frame, joint), slots) in &groups {
        let mut sources = [0; 3];
        for (&slot, source) in slots.iter().zip(sources.iter_mut()) {
            *source = slot.ok_or(ImputationError::incomplete_joint(frame, joint))?;
        }

        for (feature, &source) in Feature::COORDINATES.iter().zip(sources.iter()) {
            columns.push(ColumnKey::joint(frame, joint, *feature));
            values.column_mut(out).assign(&table.column_at(source));
            out += 1;
        }

        columns.push(ColumnKey::joint(frame, joint, Feature::IsMissing));
        for row in 0..n_rows {
            let missing = sources
                .iter()
                .any(|&source| table.values()[(row, source)].is_nan());
            values[(row, out)] = if missing { 1.0 } else { 0.0 };
        }
        out += 1;
    }

    for &source in &passthrough {
        columns.push(table.key_at(source).clone());
        values.column_mut(out).assign(&table.column_at(source));
        out += 1;
    }

    FeatureTable::new(columns, values)
}
