//! Core types for the Lumen radiative-transfer staging toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! geometric vocabulary shared by every other Lumen crate:
//!
//! - [`CoordinateSystem`], [`Point`] and [`Coordinates`]: points in one of
//!   three bases with pure, bidirectional transforms
//! - [`VectorSample`] and [`VectorField`]: vector quantities anchored at a
//!   point, rotated between the same three bases
//! - [`FieldArray`]: a column-major cell array as read from and written to
//!   the solver's field files
//! - [`units`]: the cgs constant table

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coords;
pub mod error;
pub mod field;
pub mod units;
pub mod vector;

pub use coords::{normalize_angle, CoordinateSystem, Coordinates, Point};
pub use error::{CoordError, ShapeError};
pub use field::{Dims, FieldArray};
pub use vector::{VectorField, VectorSample};
