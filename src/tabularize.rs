//! Tensor-to-table conversion.
//!
//! Flattens a raw `(samples, frames, joints, 3)` motion tensor into a
//! [`FeatureTable`] whose column names and ordering are fully determined by
//! the configured geometry: frame outermost, joint middle, axis innermost,
//! exactly matching the tensor's row-major flattening. NaN coordinates pass
//! through unchanged; missingness handling happens downstream.

use ndarray::{Array2, ArrayView4};

use crate::config::PipelineConfig;
use crate::error::{ImputationError, Result};
use crate::table::{ColumnKey, Feature, FeatureTable};
use crate::{AXES_PER_JOINT, LABEL_COLUMN};

/// Flatten a motion tensor into a named-column feature table.
///
/// `labels`, when present, becomes a trailing `label` column so training
/// pipelines can carry the class through the same table type.
///
/// # Errors
///
/// Returns [`ImputationError::InputShape`] if the tensor's trailing
/// dimensions aren't `(frames, joints, 3)` as configured, or
/// [`ImputationError::LabelLengthMismatch`] if the label vector length
/// differs from the sample count.
///
/// # Example
///
/// ```
/// use motion_imputation::{tabularize, PipelineConfig};
/// use ndarray::Array4;
///
/// let config = PipelineConfig::new().with_frames(2).with_joints(2);
/// let tensor = Array4::<f64>::zeros((3, 2, 2, 3));
///
/// let table = tabularize(tensor.view(), None, &config)?;
/// assert_eq!(table.n_columns(), 2 * 2 * 3);
/// assert_eq!(table.columns()[0].name(), "frame_0_joint_0_x");
/// # Ok::<(), motion_imputation::ImputationError>(())
/// ```
pub fn tabularize(
    tensor: ArrayView4<'_, f64>,
    labels: Option<&[f64]>,
    config: &PipelineConfig,
) -> Result<FeatureTable> {
    config.validate()?;

    let (n_samples, frames, joints, axes) = tensor.dim();
    if frames != config.frames || joints != config.joints || axes != AXES_PER_JOINT {
        return Err(ImputationError::input_shape(
            (config.frames, config.joints, AXES_PER_JOINT),
            (frames, joints, axes),
        ));
    }
    if let Some(labels) = labels {
        if labels.len() != n_samples {
            return Err(ImputationError::label_length_mismatch(
                n_samples,
                labels.len(),
            ));
        }
    }

    let coordinate_width = config.coordinate_width();
    let total_width = coordinate_width + usize::from(labels.is_some());

    let mut columns = Vec::with_capacity(total_width);
    for frame in 0..config.frames {
        for joint in 0..config.joints {
            for feature in Feature::COORDINATES {
                columns.push(ColumnKey::joint(frame, joint, feature));
            }
        }
    }
    if labels.is_some() {
        columns.push(ColumnKey::named(LABEL_COLUMN));
    }

    let mut values = Array2::zeros((n_samples, total_width));
    for ((sample, frame, joint, axis), &v) in tensor.indexed_iter() {
        let position = (frame * config.joints + joint) * AXES_PER_JOINT + axis;
        values[(sample, position)] = v;
    }
    if let Some(labels) = labels {
        for (row, &label) in labels.iter().enumerate() {
            values[(row, coordinate_width)] = label;
        }
    }

    FeatureTable::new(columns, values)
}
