//! The full cleaning pipeline.
//!
//! Chains the four stages in their only valid order:
//! tabularize → flag → impute → detabularize. No stage holds state across
//! calls and every stage returns freshly allocated data, so independent
//! inputs can be cleaned concurrently without locking.

use ndarray::{Array3, ArrayView4};

use crate::config::PipelineConfig;
use crate::detabularize::detabularize;
use crate::error::Result;
use crate::flag::flag_joint_missingness;
use crate::impute::impute_missingness;
use crate::tabularize::tabularize;

/// Clean one batch of motion recordings into a model-ready tensor.
///
/// Takes a `(N, frames, joints, 3)` tensor whose missing coordinates are
/// NaN and returns the `(N, frames, joints*4)` float32 tensor the model
/// consumes: per-joint `[x, y, z, is_missing]` blocks with every NaN
/// replaced by that column's observed mean. A label vector, when given, is
/// carried through the table and dropped again before the final reshape.
///
/// # Errors
///
/// Propagates the stage errors: [`InputShape`] / [`LabelLengthMismatch`]
/// from tabularization and [`ShapeMismatch`] from detabularization.
/// There are no partial results; a failed call leaves nothing behind.
///
/// [`InputShape`]: crate::ImputationError::InputShape
/// [`LabelLengthMismatch`]: crate::ImputationError::LabelLengthMismatch
/// [`ShapeMismatch`]: crate::ImputationError::ShapeMismatch
///
/// # Example
///
/// ```
/// use motion_imputation::{clean_motion_tensor, PipelineConfig};
/// use ndarray::Array4;
///
/// let config = PipelineConfig::new().with_frames(2).with_joints(2);
/// let mut tensor = Array4::zeros((1, 2, 2, 3));
/// tensor[(0, 0, 1, 0)] = f64::NAN;
///
/// let cleaned = clean_motion_tensor(tensor.view(), None, &config)?;
/// assert_eq!(cleaned.shape(), &[1, 2, 8]);
/// // Joint 1's flag in frame 0 is set.
/// assert_eq!(cleaned[(0, 0, 7)], 1.0);
/// # Ok::<(), motion_imputation::ImputationError>(())
/// ```
pub fn clean_motion_tensor(
    tensor: ArrayView4<'_, f64>,
    labels: Option<&[f64]>,
    config: &PipelineConfig,
) -> Result<Array3<f32>> {
    let table = tabularize(tensor, labels, config)?;
    let flagged = flag_joint_missingness(&table)?;
    let imputed = impute_missingness(&flagged, config.scale);
    detabularize(&imputed, config)
}
