//! Motion Imputation Library
//!
//! Cleaning pipeline for fixed-length skeletal motion recordings.
//!
//! This library turns raw `(samples, frames, joints, 3)` motion tensors,
//! some of whose joint coordinates are missing (encoded as NaN), into the
//! model-ready `(samples, frames, joints*4)` float32 tensor a trained
//! action classifier consumes, with missing joints flagged and
//! statistically imputed.
//!
//! # Pipeline
//!
//! Four stages, applied in a strict order, all pure in-memory transforms:
//!
//! 1. **Tabularize**: flatten the tensor into a table of deterministically
//!    named columns (`frame_{t}_joint_{j}_{x,y,z}`), frame-major order.
//! 2. **Flag**: derive one `is_missing` column per (frame, joint) pair and
//!    regroup columns into per-joint `[x, y, z, is_missing]` blocks.
//! 3. **Impute**: standardize each coordinate column over observed values,
//!    fill NaNs with the column mean, invert the standardization.
//! 4. **Detabularize**: drop label columns and reshape into the model's
//!    input tensor.
//!
//! # Quick Start
//!
//! ```
//! use motion_imputation::{clean_motion_tensor, PipelineConfig};
//! use ndarray::Array4;
//!
//! let config = PipelineConfig::kinect_v2();
//! let mut tensor = Array4::zeros((1, 15, 25, 3));
//! tensor[(0, 0, 3, 1)] = f64::NAN; // joint 3's y is unobserved in frame 0
//!
//! let cleaned = clean_motion_tensor(tensor.view(), None, &config)?;
//! assert_eq!(cleaned.shape(), &[1, 15, 100]);
//! # Ok::<(), motion_imputation::ImputationError>(())
//! ```
//!
//! # Design Notes
//!
//! - Coordinate and flag columns carry their `(frame, joint)` indices as
//!   integers ([`ColumnId`]) from the moment they are generated; ordering
//!   is decided by comparing those integers, never by re-parsing names.
//! - No stage holds state across calls or mutates shared data, so the
//!   pipeline is safe to run concurrently on independent inputs.
//! - The pipeline never logs; it returns structured errors for the serving
//!   layer to translate.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod dataset;
pub mod detabularize;
pub mod error;
pub mod flag;
pub mod impute;
pub mod pipeline;
pub mod table;
pub mod tabularize;

// Re-exports for convenient access
pub use config::PipelineConfig;
pub use dataset::{encode_label_dummies, remove_duplicates, split_by_label};
pub use detabularize::detabularize;
pub use error::{ImputationError, Result};
pub use flag::flag_joint_missingness;
pub use impute::{impute_missingness, ColumnScaling, ScalingParameters};
pub use pipeline::clean_motion_tensor;
pub use table::{ColumnId, ColumnKey, Feature, FeatureTable};
pub use tabularize::tabularize;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Coordinates per joint in the raw tensor.
pub const AXES_PER_JOINT: usize = 3;

/// Features per joint after flagging: x, y, z, is_missing.
pub const FEATURES_PER_JOINT: usize = 4;

/// Name of the pass-through label column.
pub const LABEL_COLUMN: &str = "label";
