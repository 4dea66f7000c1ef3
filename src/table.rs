//! The named-column feature table and its typed column identifiers.
//!
//! A [`FeatureTable`] is the tabular view of a motion tensor: `N` rows
//! (one per recording) and one `f64` column per derived feature. Coordinate
//! and missingness-flag columns carry their `(frame, joint)` indices as a
//! [`ColumnId`] from the moment they are generated; ordering decisions
//! always compare those integers and never re-parse a column name.
//!
//! Column names follow the `frame_{t}_joint_{j}_{x|y|z|is_missing}` scheme
//! and are reproducible from the recording geometry alone, so downstream
//! code can locate columns by name rather than position.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ImputationError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One derived feature of a joint within a frame.
///
/// Ordering matches the per-joint block layout: x, y, z, then the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Feature {
    /// X coordinate.
    X,
    /// Y coordinate.
    Y,
    /// Z coordinate.
    Z,
    /// Derived per-joint missingness flag (stored as 0.0 / 1.0).
    IsMissing,
}

impl Feature {
    /// The three coordinate features in block order.
    pub const COORDINATES: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Column-name suffix for this feature.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::IsMissing => "is_missing",
        }
    }

    /// Whether this feature is one of the x/y/z coordinates.
    #[must_use]
    pub const fn is_coordinate(self) -> bool {
        !matches!(self, Self::IsMissing)
    }
}

/// Identity of a joint-derived column: which frame, which joint, which
/// feature.
///
/// The derived `Ord` gives frame-major, joint-minor, feature-innermost
/// ordering, matching the tensor's row-major flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnId {
    /// Frame index, `0..frames`.
    pub frame: usize,
    /// Joint index within the frame, `0..joints`.
    pub joint: usize,
    /// Feature within the joint's block.
    pub feature: Feature,
}

impl ColumnId {
    /// Create a column identity.
    #[must_use]
    pub const fn new(frame: usize, joint: usize, feature: Feature) -> Self {
        Self {
            frame,
            joint,
            feature,
        }
    }

    /// Deterministic column name, e.g. `frame_0_joint_3_y`.
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "frame_{}_joint_{}_{}",
            self.frame,
            self.joint,
            self.feature.suffix()
        )
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame_{}_joint_{}_{}",
            self.frame,
            self.joint,
            self.feature.suffix()
        )
    }
}

/// Key of one table column: either a joint-derived feature with explicit
/// indices, or a free-form named column (label, one-hot block, etc.)
/// carried through the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnKey {
    /// A coordinate or flag column with explicit `(frame, joint)` identity.
    Joint(ColumnId),
    /// A pass-through column identified only by name.
    Named(String),
}

impl ColumnKey {
    /// A joint-derived column key.
    #[must_use]
    pub const fn joint(frame: usize, joint: usize, feature: Feature) -> Self {
        Self::Joint(ColumnId::new(frame, joint, feature))
    }

    /// A named pass-through column key.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The column's name as it appears in the table header.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Joint(id) => id.name(),
            Self::Named(name) => name.clone(),
        }
    }

    /// Whether this is an x/y/z coordinate column.
    #[must_use]
    pub fn is_coordinate(&self) -> bool {
        matches!(self, Self::Joint(id) if id.feature.is_coordinate())
    }

    /// Whether this is a per-joint missingness flag column.
    #[must_use]
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            Self::Joint(ColumnId {
                feature: Feature::IsMissing,
                ..
            })
        )
    }
}

/// A 2-D table of `N` rows and named `f64` columns.
///
/// Missing coordinates are NaN; flag columns hold 0.0 or 1.0. The backing
/// storage is a row-major [`Array2`], so a table whose columns are in
/// frame-major, joint-minor block order reshapes directly into the model's
/// `(N, frames, joints*4)` tensor.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    columns: Vec<ColumnKey>,
    index: HashMap<String, usize>,
    values: Array2<f64>,
}

impl FeatureTable {
    /// Build a table from column keys and a matching value matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ImputationError::ShapeMismatch`] if the key count differs
    /// from the matrix width, or [`ImputationError::DuplicateColumn`] if
    /// two keys resolve to the same name.
    pub fn new(columns: Vec<ColumnKey>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(ImputationError::shape_mismatch(
                columns.len(),
                values.ncols(),
            ));
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (position, key) in columns.iter().enumerate() {
            let name = key.name();
            if index.insert(name, position).is_some() {
                return Err(ImputationError::duplicate_column(key.name()));
            }
        }

        Ok(Self {
            columns,
            index,
            values,
        })
    }

    /// Number of rows (recordings).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// The ordered column keys.
    #[must_use]
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Key of the column at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    #[must_use]
    pub fn key_at(&self, position: usize) -> &ColumnKey {
        &self.columns[position]
    }

    /// Position of the column with the given name, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// View of the column with the given name, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name).map(|i| self.values.column(i))
    }

    /// View of the column at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    #[must_use]
    pub fn column_at(&self, position: usize) -> ArrayView1<'_, f64> {
        self.values.column(position)
    }

    /// Single cell lookup by row index and column name.
    #[must_use]
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column_index(name)
            .and_then(|i| self.values.get((row, i)).copied())
    }

    /// View of the backing value matrix, rows × columns.
    #[must_use]
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Consume the table, returning the backing value matrix.
    #[must_use]
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Same-layout table with new values. Width is guaranteed by the
    /// caller holding a table of the same layout.
    pub(crate) fn replace_values(&self, values: Array2<f64>) -> Self {
        debug_assert_eq!(values.ncols(), self.columns.len());
        Self {
            columns: self.columns.clone(),
            index: self.index.clone(),
            values,
        }
    }

    /// New table with one extra column appended on the right.
    ///
    /// # Errors
    ///
    /// Returns an error if the column length differs from the row count or
    /// the name collides with an existing column.
    pub fn append_column(&self, key: ColumnKey, data: &[f64]) -> Result<Self> {
        if data.len() != self.n_rows() {
            return Err(ImputationError::label_length_mismatch(
                self.n_rows(),
                data.len(),
            ));
        }

        let mut values = Array2::zeros((self.n_rows(), self.n_columns() + 1));
        values
            .slice_mut(ndarray::s![.., ..self.n_columns()])
            .assign(&self.values);
        for (row, &v) in data.iter().enumerate() {
            values[(row, self.n_columns())] = v;
        }

        let mut columns = self.columns.clone();
        columns.push(key);
        Self::new(columns, values)
    }

    /// New table containing the given columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if a position is repeated (duplicate column).
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds.
    pub fn select_columns(&self, positions: &[usize]) -> Result<Self> {
        let columns: Vec<ColumnKey> = positions.iter().map(|&i| self.columns[i].clone()).collect();
        let values = self.values.select(Axis(1), positions);
        Self::new(columns, values)
    }

    /// New table containing the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if a row index is out of bounds.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            index: self.index.clone(),
            values: self.values.select(Axis(0), rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_column_names() {
        assert_eq!(ColumnId::new(0, 3, Feature::Y).name(), "frame_0_joint_3_y");
        assert_eq!(
            ColumnId::new(14, 24, Feature::IsMissing).name(),
            "frame_14_joint_24_is_missing"
        );
        assert_eq!(ColumnKey::named("label").name(), "label");
    }

    #[test]
    fn test_column_id_ordering_is_frame_major() {
        let mut ids = vec![
            ColumnId::new(1, 0, Feature::X),
            ColumnId::new(0, 2, Feature::Z),
            ColumnId::new(0, 2, Feature::X),
            ColumnId::new(0, 10, Feature::X),
        ];
        ids.sort();

        // Frame outermost, joint middle, feature innermost. Integer joint
        // indices sort numerically (joint 2 before joint 10), which a
        // lexicographic sort over names would get wrong.
        assert_eq!(ids[0], ColumnId::new(0, 2, Feature::X));
        assert_eq!(ids[1], ColumnId::new(0, 2, Feature::Z));
        assert_eq!(ids[2], ColumnId::new(0, 10, Feature::X));
        assert_eq!(ids[3], ColumnId::new(1, 0, Feature::X));
    }

    #[test]
    fn test_key_classification() {
        assert!(ColumnKey::joint(0, 0, Feature::X).is_coordinate());
        assert!(!ColumnKey::joint(0, 0, Feature::IsMissing).is_coordinate());
        assert!(ColumnKey::joint(0, 0, Feature::IsMissing).is_flag());
        assert!(!ColumnKey::named("label").is_coordinate());
    }

    fn small_table() -> FeatureTable {
        let columns = vec![
            ColumnKey::joint(0, 0, Feature::X),
            ColumnKey::joint(0, 0, Feature::Y),
            ColumnKey::named("label"),
        ];
        let values = array![[1.0, 2.0, 0.0], [3.0, 4.0, 1.0]];
        FeatureTable::new(columns, values).unwrap()
    }

    #[test]
    fn test_lookup_by_name() {
        let table = small_table();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_columns(), 3);
        assert_eq!(table.column_index("frame_0_joint_0_y"), Some(1));
        assert_eq!(table.value(1, "frame_0_joint_0_y"), Some(4.0));
        assert_eq!(table.value(0, "label"), Some(0.0));
        assert!(table.column("frame_0_joint_9_x").is_none());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let columns = vec![
            ColumnKey::joint(0, 0, Feature::X),
            ColumnKey::joint(0, 0, Feature::X),
        ];
        let values = Array2::zeros((1, 2));
        assert!(matches!(
            FeatureTable::new(columns, values),
            Err(ImputationError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_append_and_select() {
        let table = small_table();
        let appended = table
            .append_column(ColumnKey::named("extra"), &[9.0, 8.0])
            .unwrap();
        assert_eq!(appended.n_columns(), 4);
        assert_eq!(appended.value(0, "extra"), Some(9.0));

        let reordered = appended.select_columns(&[2, 0]).unwrap();
        assert_eq!(reordered.key_at(0).name(), "label");
        assert_eq!(reordered.value(1, "frame_0_joint_0_x"), Some(3.0));

        let one_row = table.select_rows(&[1]);
        assert_eq!(one_row.n_rows(), 1);
        assert_eq!(one_row.value(0, "frame_0_joint_0_x"), Some(3.0));
    }

    #[test]
    fn test_append_length_mismatch() {
        let table = small_table();
        assert!(table
            .append_column(ColumnKey::named("extra"), &[1.0])
            .is_err());
    }
}
