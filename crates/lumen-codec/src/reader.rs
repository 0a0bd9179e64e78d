//! Field-file reader.
//!
//! [`FieldReader`] decodes and validates the header on construction. For
//! binary files the total file length is checked against the header before
//! any block is read, so a truncated or half-written file is rejected up
//! front.

use std::io::{BufRead, Seek, SeekFrom};

use tracing::debug;

use crate::codec::Decoder;
use crate::error::CodecError;
use crate::layout::{Encoding, FieldLayout, FieldShape, Precision, FORMAT_VERSION};

fn header_count(value: i64, what: &str) -> Result<usize, CodecError> {
    usize::try_from(value).map_err(|_| CodecError::MalformedHeader {
        detail: format!("negative {what} {value}"),
    })
}

/// Reads one field file from a seekable byte source.
pub struct FieldReader<R: BufRead + Seek> {
    decoder: Decoder<R>,
    layout: FieldLayout,
    next_ascii: usize,
}

impl<R: BufRead + Seek> FieldReader<R> {
    /// Open a field stream, reading and validating the header.
    ///
    /// `shape` says whether a species count follows the cell count and how
    /// many values each cell holds; the header itself does not record it.
    pub fn open(mut source: R, encoding: Encoding, shape: FieldShape) -> Result<Self, CodecError> {
        let file_len = match encoding {
            Encoding::Binary => {
                let len = source.seek(SeekFrom::End(0))?;
                source.seek(SeekFrom::Start(0))?;
                Some(len)
            }
            Encoding::Ascii => None,
        };

        let mut decoder = Decoder::new(source, encoding);
        let format = decoder.read_int()?;
        if format != FORMAT_VERSION {
            return Err(CodecError::UnrecognizedFormat { found: format });
        }
        let precision = match encoding {
            Encoding::Binary => Precision::from_bytes(decoder.read_int()?)?,
            Encoding::Ascii => Precision::Double,
        };
        let cell_count = header_count(decoder.read_int()?, "cell count")?;
        let species_count = if shape.multi_species {
            header_count(decoder.read_int()?, "species count")?
        } else {
            1
        };
        let layout = FieldLayout::new(encoding, precision, shape, cell_count, species_count);
        layout.check_sizes()?;

        if let Some(found) = file_len {
            if found != layout.total_bytes() {
                return Err(CodecError::BodyLengthMismatch {
                    expected: layout.total_bytes(),
                    found,
                    unit: "bytes",
                });
            }
        }
        debug!(?encoding, cell_count, species_count, "opened field stream");

        Ok(Self {
            decoder,
            layout,
            next_ascii: 0,
        })
    }

    /// The layout recovered from the header.
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Fail unless the header's cell count equals `expected`.
    pub fn check_cell_count(&self, expected: usize) -> Result<(), CodecError> {
        if self.layout.cell_count != expected {
            return Err(CodecError::CellCountMismatch {
                expected,
                found: self.layout.cell_count,
            });
        }
        Ok(())
    }

    /// Read block `index`.
    ///
    /// Binary blocks are read from their exact offset, so reading species
    /// `i` never touches its neighbours. ASCII blocks must be read in order.
    pub fn read_block(&mut self, index: usize) -> Result<Vec<f64>, CodecError> {
        self.layout.check_block(index)?;
        let count = self.layout.block_len();
        match &mut self.decoder {
            Decoder::Binary(r) => {
                r.seek(SeekFrom::Start(self.layout.block_offset(index)))?;
            }
            Decoder::Ascii(_) => {
                if index != self.next_ascii {
                    return Err(CodecError::BlockOutOfOrder {
                        expected: self.next_ascii,
                        found: index,
                    });
                }
                self.next_ascii += 1;
            }
        }
        self.decoder.read_values(count, self.layout.precision)
    }

    /// Read every block in order and verify nothing trails the body.
    pub fn read_all(mut self) -> Result<Vec<Vec<f64>>, CodecError> {
        let blocks = (0..self.layout.species_count)
            .map(|i| self.read_block(i))
            .collect::<Result<Vec<_>, _>>()?;
        if let Decoder::Ascii(tokens) = &mut self.decoder {
            let extra = tokens.count_remaining()?;
            if extra > 0 {
                let expected = self.layout.total_values();
                return Err(CodecError::BodyLengthMismatch {
                    expected,
                    found: expected + extra,
                    unit: "values",
                });
            }
        }
        Ok(blocks)
    }
}
