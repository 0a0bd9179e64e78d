//! Error types for field files, descriptors and the I/O context.

use std::io;
use std::path::PathBuf;

use lumen_core::ShapeError;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or locating solver files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An I/O error occurred during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The format-version header field is not the one this file type requires.
    #[error("unrecognized format version {found}")]
    UnrecognizedFormat {
        /// The version found in the file.
        found: i64,
    },
    /// A binary precision field is neither 4 nor 8.
    #[error("invalid precision byte count {found} (expected 4 or 8)")]
    InvalidPrecision {
        /// The byte count found in the file.
        found: i64,
    },
    /// A header could not be decoded.
    #[error("malformed header: {detail}")]
    MalformedHeader {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// An ASCII token is not a number of the expected kind.
    #[error("cannot parse {token:?} as a number")]
    Parse {
        /// The offending token.
        token: String,
    },
    /// The header's cell count disagrees with the grid.
    #[error("cell count mismatch: grid has {expected} cells, file declares {found}")]
    CellCountMismatch {
        /// Cells in the grid.
        expected: usize,
        /// Cells declared by the file header.
        found: usize,
    },
    /// The body is shorter or longer than the header implies.
    #[error("body length mismatch: header implies {expected} {unit}, found {found}")]
    BodyLengthMismatch {
        /// Length implied by the header.
        expected: u64,
        /// Length actually present.
        found: u64,
        /// `"bytes"` for binary files, `"values"` for ASCII files.
        unit: &'static str,
    },
    /// A numeric file's species count disagrees with its descriptor.
    #[error("inconsistent species count: descriptor lists {descriptor}, file holds {file}")]
    InconsistentSpeciesCount {
        /// Entries in the companion descriptor.
        descriptor: usize,
        /// Species blocks declared by the numeric file.
        file: usize,
    },
    /// A required companion descriptor file does not exist.
    #[error("missing descriptor {}", path.display())]
    MissingDescriptor {
        /// Where the descriptor was expected.
        path: PathBuf,
    },
    /// Neither the ASCII nor the binary variant of a field exists.
    #[error("neither ASCII nor binary variant of {stem:?} exists")]
    AmbiguousOrMissingFile {
        /// The field file stem, e.g. `"dust_density"`.
        stem: String,
    },
    /// The overwrite gate declined to replace an existing file.
    #[error("overwrite of {} aborted", path.display())]
    OverwriteAborted {
        /// The file that would have been replaced.
        path: PathBuf,
    },
    /// An ASCII block was written out of sequence.
    #[error("ASCII blocks must be written in order: expected block {expected}, got {found}")]
    BlockOutOfOrder {
        /// The next block the stream can accept.
        expected: usize,
        /// The block the caller tried to write or read.
        found: usize,
    },
    /// A block index is past the declared block count.
    #[error("block index {index} out of range for {count} blocks")]
    BlockIndex {
        /// Requested block.
        index: usize,
        /// Declared number of blocks.
        count: usize,
    },
    /// A block was supplied with the wrong number of values.
    #[error("block length mismatch: expected {expected} values, got {found}")]
    BlockLength {
        /// Values per block according to the layout.
        expected: usize,
        /// Values supplied.
        found: usize,
    },
    /// A field writer was finished before every block was written.
    #[error("incomplete field: {written} of {expected} blocks written")]
    IncompleteField {
        /// Blocks written.
        written: usize,
        /// Blocks declared in the header.
        expected: usize,
    },
    /// An I/O configuration value is invalid.
    #[error("invalid I/O configuration: {reason}")]
    InvalidConfig {
        /// Which invariant was violated.
        reason: String,
    },
    /// Decoded values do not fit the requested array shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
