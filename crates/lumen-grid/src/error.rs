//! Error types for grid construction and the geometry file.

use lumen_codec::CodecError;
use lumen_core::CoordError;
use thiserror::Error;

use crate::grid::Axis;

/// Errors arising from grid construction or geometry-file I/O.
#[derive(Debug, Error)]
pub enum GridError {
    /// An axis edge array is unusable.
    #[error("invalid {axis} axis: {reason}")]
    InvalidAxis {
        /// The offending axis.
        axis: Axis,
        /// What went wrong.
        reason: String,
    },
    /// The grid style is reserved or unknown.
    ///
    /// Only the regular style (0) is implemented; oct-tree (1) and layered
    /// (10) grids fail here instead of being read as something else.
    #[error("unsupported grid style {style}")]
    UnsupportedGridStyle {
        /// The style code.
        style: i64,
    },
    /// Field or file codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Unknown coordinate-system code.
    #[error(transparent)]
    Coord(#[from] CoordError),
}
