//! Regular curvilinear grids for Lumen.
//!
//! A [`Grid`] owns three edge arrays in one of the three coordinate
//! systems and derives the point (corner) and cell (midpoint) meshes every
//! field writer samples. The [`geometry`] module reads and writes the
//! solver's `amr_grid` file.
//!
//! Only the regular style is implemented. Oct-tree and layered AMR grids
//! are reserved [`GridStyle`] variants that fail with
//! [`GridError::UnsupportedGridStyle`] on both read and write.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod grid;
pub mod style;

pub use error::GridError;
pub use geometry::{decode_grid, encode_grid, geometry_header};
pub use grid::{Axis, Grid};
pub use style::GridStyle;
