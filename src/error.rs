//! Error types for the motion cleaning pipeline.
//!
//! All errors are local to one pipeline invocation; nothing is retried
//! internally and the pipeline itself never logs. The calling layer is
//! responsible for translating these into user-visible responses.

use thiserror::Error;

/// Main error type for motion cleaning operations.
#[derive(Error, Debug)]
pub enum ImputationError {
    /// Raw tensor's trailing dimensions don't match the configured
    /// frame/joint/axis counts.
    #[error(
        "Input tensor shape mismatch: expected (frames, joints, axes) = {expected:?}, got {actual:?}"
    )]
    InputShape {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// Label vector length doesn't match the tensor's sample count.
    #[error("Label length mismatch: {rows} samples vs {labels} labels")]
    LabelLengthMismatch { rows: usize, labels: usize },

    /// Two columns in one table resolved to the same name.
    #[error("Duplicate column name: {name}")]
    DuplicateColumn { name: String },

    /// A joint is missing one of its x/y/z coordinate columns, so its
    /// missingness flag cannot be derived.
    #[error("Incomplete joint group: frame {frame}, joint {joint} lacks an x/y/z column")]
    IncompleteJoint { frame: usize, joint: usize },

    /// A coordinate column has zero observed values or zero variance.
    /// Recoverable: the imputation path substitutes mean 0 / std 1 instead
    /// of raising this; only the strict scaling check reports it.
    #[error("Degenerate column: {name} has no usable mean/std")]
    DegenerateColumn { name: String },

    /// Post-processing column count doesn't equal frames*joints*4 before
    /// the final reshape. Always fatal: indicates a column-ordering bug
    /// upstream.
    #[error("Shape mismatch: expected {expected} feature columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A label value can't be one-hot encoded into the configured classes.
    #[error("Invalid label at row {row}: {value}")]
    InvalidLabel { row: usize, value: f64 },

    /// A required column is absent from the table.
    #[error("Missing column: {name}")]
    MissingColumn { name: String },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for motion cleaning operations.
pub type Result<T> = std::result::Result<T, ImputationError>;

impl ImputationError {
    /// Create an input shape error.
    #[must_use]
    pub const fn input_shape(
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    ) -> Self {
        Self::InputShape { expected, actual }
    }

    /// Create a label length mismatch error.
    #[must_use]
    pub const fn label_length_mismatch(rows: usize, labels: usize) -> Self {
        Self::LabelLengthMismatch { rows, labels }
    }

    /// Create a duplicate column error.
    #[must_use]
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }

    /// Create an incomplete joint error.
    #[must_use]
    pub const fn incomplete_joint(frame: usize, joint: usize) -> Self {
        Self::IncompleteJoint { frame, joint }
    }

    /// Create a degenerate column error.
    #[must_use]
    pub fn degenerate_column(name: impl Into<String>) -> Self {
        Self::DegenerateColumn { name: name.into() }
    }

    /// Create a shape mismatch error.
    #[must_use]
    pub const fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Create a missing column error.
    #[must_use]
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn { name: name.into() }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
