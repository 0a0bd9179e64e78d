//! Encodings, element precision and field-file layout arithmetic.
//!
//! A field file is an `i64` header followed by one or more equally sized
//! blocks. Each block holds `cell_count * components` values in
//! column-major order; a multi-species file holds one block per species.

use smallvec::SmallVec;

use crate::error::CodecError;

/// Header integers, at most five for field files and eleven for the grid.
pub type HeaderInts = SmallVec<[i64; 12]>;

/// Field-file format version. The only version the solver understands.
pub const FORMAT_VERSION: i64 = 1;

/// Byte width of one header integer.
pub const HEADER_INT_BYTES: u64 = 8;

/// On-disk representation of a numeric file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Whitespace-separated text.
    Ascii,
    /// Raw little-endian `i64` header and `f32`/`f64` values.
    #[default]
    Binary,
}

/// Which extension pair a file family uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Solver inputs: `.inp` / `.binp`.
    Input,
    /// Solver outputs: `.dat` / `.bdat`.
    Output,
}

impl Encoding {
    /// File extension for this encoding and file family.
    pub const fn extension(self, kind: FileKind) -> &'static str {
        match (self, kind) {
            (Self::Ascii, FileKind::Input) => "inp",
            (Self::Binary, FileKind::Input) => "binp",
            (Self::Ascii, FileKind::Output) => "dat",
            (Self::Binary, FileKind::Output) => "bdat",
        }
    }

    /// `stem.ext` for this encoding.
    pub fn file_name(self, stem: &str, kind: FileKind) -> String {
        format!("{stem}.{}", self.extension(kind))
    }
}

/// Width of binary floating-point values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    /// `f32`, four bytes.
    Single,
    /// `f64`, eight bytes.
    #[default]
    Double,
}

impl Precision {
    /// Bytes per value.
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Single => 4,
            Self::Double => 8,
        }
    }

    /// Decode the precision header field.
    pub fn from_bytes(found: i64) -> Result<Self, CodecError> {
        match found {
            4 => Ok(Self::Single),
            8 => Ok(Self::Double),
            _ => Err(CodecError::InvalidPrecision { found }),
        }
    }
}

/// Shape family of a field file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldShape {
    /// Whether the header carries a species count.
    pub multi_species: bool,
    /// Values per cell: 1 for scalars, 3 for vectors.
    pub components: usize,
}

impl FieldShape {
    /// One scalar per cell, no species axis (`gas_temperature`, `numberdens_*`).
    pub const SCALAR: FieldShape = FieldShape {
        multi_species: false,
        components: 1,
    };
    /// One scalar per cell per species (`dust_density`, `dust_temperature`).
    pub const SPECIES: FieldShape = FieldShape {
        multi_species: true,
        components: 1,
    };
    /// Three components per cell, no species axis (`gas_velocity`).
    pub const VECTOR: FieldShape = FieldShape {
        multi_species: false,
        components: 3,
    };
}

/// Fully resolved layout of one field file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    /// Text or binary.
    pub encoding: Encoding,
    /// Value width; only meaningful for [`Encoding::Binary`].
    pub precision: Precision,
    /// Shape family.
    pub shape: FieldShape,
    /// Cells per block.
    pub cell_count: usize,
    /// Number of blocks. Always 1 unless `shape.multi_species`.
    pub species_count: usize,
}

impl FieldLayout {
    /// Layout for a new file.
    pub fn new(
        encoding: Encoding,
        precision: Precision,
        shape: FieldShape,
        cell_count: usize,
        species_count: usize,
    ) -> Self {
        let species_count = if shape.multi_species { species_count } else { 1 };
        Self {
            encoding,
            precision,
            shape,
            cell_count,
            species_count,
        }
    }

    /// The header integers in file order.
    ///
    /// `[1, (precision,) cell_count, (species_count)]`.
    pub fn header(&self) -> HeaderInts {
        let mut h = HeaderInts::new();
        h.push(FORMAT_VERSION);
        if self.encoding == Encoding::Binary {
            h.push(self.precision.bytes() as i64);
        }
        h.push(self.cell_count as i64);
        if self.shape.multi_species {
            h.push(self.species_count as i64);
        }
        h
    }

    /// Number of header integers.
    pub fn header_len(&self) -> usize {
        1 + usize::from(self.encoding == Encoding::Binary)
            + 1
            + usize::from(self.shape.multi_species)
    }

    /// Binary header size in bytes.
    pub fn header_bytes(&self) -> u64 {
        self.header_len() as u64 * HEADER_INT_BYTES
    }

    /// Values per block.
    pub fn block_len(&self) -> usize {
        self.cell_count * self.shape.components
    }

    /// Binary block size in bytes.
    pub fn block_bytes(&self) -> u64 {
        self.block_len() as u64 * self.precision.bytes()
    }

    /// Byte offset of block `index` in a binary file.
    ///
    /// `header_bytes + index * cell_count * components * element_size`.
    pub fn block_offset(&self, index: usize) -> u64 {
        self.header_bytes() + index as u64 * self.block_bytes()
    }

    /// Total size of a complete binary file.
    pub fn total_bytes(&self) -> u64 {
        self.block_offset(self.species_count)
    }

    /// Total number of body values.
    pub fn total_values(&self) -> u64 {
        self.block_len() as u64 * self.species_count as u64
    }

    /// Fail with [`CodecError::MalformedHeader`] unless every size derived
    /// from the counts fits in memory-addressable and file-offset ranges.
    ///
    /// Every other size method assumes a layout that passed this check.
    pub fn check_sizes(&self) -> Result<(), CodecError> {
        let overflow = || CodecError::MalformedHeader {
            detail: format!(
                "{} cells of {} components in {} blocks overflows the file size",
                self.cell_count, self.shape.components, self.species_count
            ),
        };
        let block_len = self
            .cell_count
            .checked_mul(self.shape.components)
            .ok_or_else(overflow)?;
        (block_len as u64)
            .checked_mul(self.precision.bytes())
            .and_then(|b| b.checked_mul(self.species_count as u64))
            .and_then(|b| b.checked_add(self.header_bytes()))
            .ok_or_else(overflow)?;
        Ok(())
    }

    pub(crate) fn check_block(&self, index: usize) -> Result<(), CodecError> {
        if index >= self.species_count {
            return Err(CodecError::BlockIndex {
                index,
                count: self.species_count,
            });
        }
        Ok(())
    }
}

/// Interleave per-axis component arrays cell by cell.
///
/// The result is the column-major body of a `[3, n]` vector block.
pub fn interleave_components(components: &[Vec<f64>; 3]) -> Vec<f64> {
    let n = components[0].len();
    let mut out = Vec::with_capacity(3 * n);
    for i in 0..n {
        for c in components {
            out.push(c.get(i).copied().unwrap_or(f64::NAN));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_species_header() {
        let l = FieldLayout::new(Encoding::Binary, Precision::Double, FieldShape::SPECIES, 2, 1);
        assert_eq!(l.header().as_slice(), &[1, 8, 2, 1]);
        assert_eq!(l.header_bytes(), 32);
        assert_eq!(l.block_offset(0), 32);
        assert_eq!(l.total_bytes(), 32 + 16);
    }

    #[test]
    fn ascii_scalar_header_has_no_precision() {
        let l = FieldLayout::new(Encoding::Ascii, Precision::Single, FieldShape::SCALAR, 10, 5);
        assert_eq!(l.header().as_slice(), &[1, 10]);
        assert_eq!(l.species_count, 1);
    }

    #[test]
    fn offsets_step_by_whole_blocks() {
        let l = FieldLayout::new(Encoding::Binary, Precision::Single, FieldShape::SPECIES, 7, 3);
        for i in 0..3 {
            assert_eq!(l.block_offset(i), 32 + i as u64 * 7 * 4);
        }
        assert!(l.check_block(3).is_err());
    }

    #[test]
    fn vector_block_has_three_values_per_cell() {
        let l = FieldLayout::new(Encoding::Binary, Precision::Double, FieldShape::VECTOR, 4, 1);
        assert_eq!(l.block_len(), 12);
        assert_eq!(l.header_bytes(), 24);
    }

    #[test]
    fn extensions() {
        assert_eq!(Encoding::Ascii.file_name("dust_density", FileKind::Input), "dust_density.inp");
        assert_eq!(Encoding::Binary.file_name("dust_temperature", FileKind::Output), "dust_temperature.bdat");
    }

    #[test]
    fn interleave_puts_components_adjacent() {
        let out = interleave_components(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(out, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn overflowing_counts_are_malformed() {
        let l = FieldLayout::new(Encoding::Binary, Precision::Double, FieldShape::SPECIES, 1 << 62, 1);
        assert!(matches!(l.check_sizes(), Err(CodecError::MalformedHeader { .. })));
        let l = FieldLayout::new(Encoding::Ascii, Precision::Double, FieldShape::VECTOR, usize::MAX / 2, 1);
        assert!(matches!(l.check_sizes(), Err(CodecError::MalformedHeader { .. })));
        let l = FieldLayout::new(Encoding::Binary, Precision::Single, FieldShape::SPECIES, 1 << 30, 1 << 40);
        assert!(matches!(l.check_sizes(), Err(CodecError::MalformedHeader { .. })));
        let l = FieldLayout::new(Encoding::Binary, Precision::Double, FieldShape::SPECIES, 2, 3);
        assert!(l.check_sizes().is_ok());
    }

    #[test]
    fn precision_field() {
        assert_eq!(Precision::from_bytes(4).unwrap(), Precision::Single);
        assert!(matches!(
            Precision::from_bytes(2),
            Err(CodecError::InvalidPrecision { found: 2 })
        ));
    }
}
