//! Field-file codec for the Lumen radiative-transfer staging toolkit.
//!
//! Reads and writes the solver's structured-grid files in both of their
//! encodings:
//!
//! - [`FieldWriter`] and [`FieldReader`] handle the numeric field files
//!   (`dust_density`, `gas_temperature`, `gas_velocity`, ...), including
//!   positional per-species block access in binary mode
//! - [`descriptor`] handles the text descriptors (`dustopac.inp`,
//!   `line.inp`) that name the species inside multi-species files
//! - [`IoContext`] ties both to an output directory and runs every write
//!   through an [`OverwritePolicy`]
//!
//! # Format
//!
//! ```text
//! ASCII:  [1] [cells] ([species]) [values, one per line ...]
//! Binary: [1 i64] [precision i64] [cells i64] ([species i64]) [f32|f64 ...]
//! ```
//!
//! All binary numbers are little-endian. Block `i` of a binary file starts
//! at `header_bytes + i * cells * components * precision`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod files;
pub mod io;
pub mod layout;
pub mod reader;
pub mod wavelength;
pub mod writer;

pub use descriptor::{DustOpacityEntry, LineEntry, DESCRIPTOR_FORMAT};
pub use error::CodecError;
pub use io::{prompt_overwrite, IoConfig, IoContext, OverwritePolicy};
pub use layout::{
    interleave_components, Encoding, FieldLayout, FieldShape, FileKind, HeaderInts, Precision,
    FORMAT_VERSION,
};
pub use reader::FieldReader;
pub use writer::{write_blocks, FieldWriter};
