//! Reads a solver directory back into named cell arrays.
//!
//! [`Mapper`] is the inverse of the species writers: it parses the
//! descriptors to learn the species names, reads each numeric file in
//! whichever encoding is present and reshapes the blocks to the grid. The
//! result is a [`MappedFields`] aggregate, whose
//! [`cell_data`](MappedFields::cell_data) view is what a renderer consumes
//! alongside [`Grid::points`](lumen_grid::Grid::points).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fields;
pub mod mapper;

pub use fields::MappedFields;
pub use mapper::{map_variables, Mapper};
