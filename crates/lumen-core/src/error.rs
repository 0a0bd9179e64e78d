//! Error types for coordinate handling and cell arrays.

use thiserror::Error;

/// Errors from coordinate-system lookup and coordinate array construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoordError {
    /// A numeric coordinate-system code does not name a registered system.
    #[error("unsupported coordinate system code {code}")]
    UnsupportedCoordinateSystem {
        /// The offending code as found in a file or passed by the caller.
        code: i64,
    },
    /// The three component arrays of a coordinate or vector array differ in length.
    #[error("component length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Length of the first component.
        expected: usize,
        /// Length of the disagreeing component.
        found: usize,
    },
}

/// Errors from [`FieldArray`](crate::FieldArray) construction and reshaping.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The data length does not equal the product of the dimensions.
    #[error("array of {found} values does not fit dims {dims:?} ({expected} values)")]
    LengthMismatch {
        /// Requested dimensions.
        dims: Vec<usize>,
        /// Product of `dims`.
        expected: usize,
        /// Actual number of values.
        found: usize,
    },
}
