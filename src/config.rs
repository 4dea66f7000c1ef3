//! Configuration for the motion cleaning pipeline.
//!
//! This module provides the [`PipelineConfig`] struct which centralizes the
//! recording geometry (frames per sample, joints per frame) and imputation
//! behavior, along with the capture-rig preset the library was built for.
//!
//! # Example
//!
//! ```
//! use motion_imputation::PipelineConfig;
//!
//! // Default configuration: 15 frames x 25 joints, scaled imputation
//! let config = PipelineConfig::default();
//!
//! // Smaller rig for tests
//! let small = PipelineConfig::new().with_frames(2).with_joints(3);
//! assert_eq!(small.coordinate_width(), 2 * 3 * 3);
//! ```

use crate::error::{ImputationError, Result};
use crate::{AXES_PER_JOINT, FEATURES_PER_JOINT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for one pipeline invocation.
///
/// Column names and ordering are fully determined by `frames` and `joints`;
/// no data value ever influences the table layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Time steps per recording.
    pub frames: usize,

    /// Tracked skeletal landmarks per frame.
    pub joints: usize,

    /// Cardinality of the one-hot label block (`label_0..label_{n-1}`)
    /// recognized and dropped by the detabularizer.
    pub label_classes: usize,

    /// Whether imputation standardizes each column before mean-filling and
    /// inverts afterwards. When false, missing entries are filled with the
    /// per-column observed mean directly.
    pub scale: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frames: 15,
            joints: 25,
            label_classes: 10,
            scale: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for the Kinect-v2-style capture rig the recordings come from:
    /// 25 joints sampled over 15-frame windows, 10 action classes.
    #[must_use]
    pub fn kinect_v2() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.frames == 0 {
            return Err(ImputationError::invalid_config("frames must be at least 1"));
        }
        if self.joints == 0 {
            return Err(ImputationError::invalid_config("joints must be at least 1"));
        }
        if self.label_classes == 0 {
            return Err(ImputationError::invalid_config(
                "label_classes must be at least 1",
            ));
        }
        Ok(())
    }

    /// Set the number of frames per recording.
    #[must_use]
    pub const fn with_frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self
    }

    /// Set the number of joints per frame.
    #[must_use]
    pub const fn with_joints(mut self, joints: usize) -> Self {
        self.joints = joints;
        self
    }

    /// Set the one-hot label cardinality.
    #[must_use]
    pub const fn with_label_classes(mut self, classes: usize) -> Self {
        self.label_classes = classes;
        self
    }

    /// Enable or disable standardized-space imputation.
    #[must_use]
    pub const fn with_scale(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    /// Coordinate column count before flagging: `frames * joints * 3`.
    #[must_use]
    pub const fn coordinate_width(&self) -> usize {
        self.frames * self.joints * AXES_PER_JOINT
    }

    /// Feature column count after flagging: `frames * joints * 4`.
    #[must_use]
    pub const fn feature_width(&self) -> usize {
        self.frames * self.joints * FEATURES_PER_JOINT
    }
}
