//! Field-file writer.
//!
//! [`FieldWriter`] writes the header immediately on construction. Binary
//! blocks are written positionally, so species may be emitted in any order
//! without holding the full multi-species array in memory. ASCII blocks
//! are a plain stream and must arrive in order.

use std::io::{Seek, SeekFrom, Write};

use tracing::debug;

use crate::codec::Encoder;
use crate::error::CodecError;
use crate::layout::{Encoding, FieldLayout};

/// Writes one field file to a seekable byte sink.
///
/// Generic over `W: Write + Seek` so tests can use `Cursor<Vec<u8>>` and
/// production code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use lumen_codec::{Encoding, FieldLayout, FieldShape, FieldWriter, Precision};
///
/// let layout = FieldLayout::new(Encoding::Binary, Precision::Single, FieldShape::SPECIES, 2, 2);
/// let mut w = FieldWriter::new(Cursor::new(Vec::new()), layout).unwrap();
/// // Species blocks may be written out of order in binary mode.
/// w.write_block(1, &[3.0, 4.0]).unwrap();
/// w.write_block(0, &[1.0, 2.0]).unwrap();
/// let bytes = w.finish().unwrap().into_inner();
/// assert_eq!(bytes.len() as u64, layout.total_bytes());
/// ```
pub struct FieldWriter<W: Write + Seek> {
    encoder: Encoder<W>,
    layout: FieldLayout,
    written: Vec<bool>,
    next_ascii: usize,
}

impl<W: Write + Seek> FieldWriter<W> {
    /// Create a writer, immediately writing the header.
    pub fn new(sink: W, layout: FieldLayout) -> Result<Self, CodecError> {
        let mut encoder = Encoder::new(sink, layout.encoding, layout.precision);
        encoder.write_ints(&layout.header())?;
        Ok(Self {
            encoder,
            layout,
            written: vec![false; layout.species_count],
            next_ascii: 0,
        })
    }

    /// The layout being written.
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Write block `index` (one species, or the single block).
    ///
    /// `values` must hold exactly [`FieldLayout::block_len`] values in
    /// column-major order.
    pub fn write_block(&mut self, index: usize, values: &[f64]) -> Result<(), CodecError> {
        self.layout.check_block(index)?;
        if values.len() != self.layout.block_len() {
            return Err(CodecError::BlockLength {
                expected: self.layout.block_len(),
                found: values.len(),
            });
        }
        match self.layout.encoding {
            Encoding::Binary => {
                let offset = self.layout.block_offset(index);
                self.encoder.get_mut().seek(SeekFrom::Start(offset))?;
                self.encoder.write_values(values)?;
                debug!(index, offset, "wrote binary block");
            }
            Encoding::Ascii => {
                if index != self.next_ascii {
                    return Err(CodecError::BlockOutOfOrder {
                        expected: self.next_ascii,
                        found: index,
                    });
                }
                self.encoder.write_values(values)?;
                self.next_ascii += 1;
                debug!(index, "wrote ASCII block");
            }
        }
        self.written[index] = true;
        Ok(())
    }

    /// Number of distinct blocks written so far.
    pub fn blocks_written(&self) -> usize {
        self.written.iter().filter(|&&w| w).count()
    }

    /// Flush and return the sink.
    ///
    /// Fails with [`CodecError::IncompleteField`] if any declared block was
    /// never written.
    pub fn finish(mut self) -> Result<W, CodecError> {
        let written = self.blocks_written();
        if written != self.layout.species_count {
            return Err(CodecError::IncompleteField {
                written,
                expected: self.layout.species_count,
            });
        }
        self.encoder.flush()?;
        Ok(self.encoder.into_inner())
    }
}

/// Write every block of `layout` in order, asking `provider` for each.
///
/// This is the one-call form used by the species writers: `provider(i)`
/// returns the column-major values of block `i`.
pub fn write_blocks<W, F>(sink: W, layout: FieldLayout, mut provider: F) -> Result<W, CodecError>
where
    W: Write + Seek,
    F: FnMut(usize) -> Vec<f64>,
{
    let mut writer = FieldWriter::new(sink, layout)?;
    for i in 0..layout.species_count {
        let values = provider(i);
        writer.write_block(i, &values)?;
    }
    writer.finish()
}
