//! The `amr_grid` geometry file.
//!
//! ```text
//! [1] ([precision]) [style] [coord_code] [grid_info] [incl_u] [incl_v] [incl_w]
//! [nu] [nv] [nw]
//! [u edges, nu+1] [v edges, nv+1] [w edges, nw+1]
//! ```
//!
//! The body holds the raw edge arrays, not the midpoints.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use lumen_codec::codec::{Decoder, Encoder};
use lumen_codec::{
    files, CodecError, Encoding, FileKind, HeaderInts, IoContext, Precision, FORMAT_VERSION,
};
use lumen_core::CoordinateSystem;
use tracing::debug;

use crate::error::GridError;
use crate::grid::{Axis, Grid};
use crate::style::GridStyle;

/// Header integers of the geometry file in order.
pub fn geometry_header(grid: &Grid, encoding: Encoding, precision: Precision) -> HeaderInts {
    let mut h = HeaderInts::new();
    h.push(FORMAT_VERSION);
    if encoding == Encoding::Binary {
        h.push(precision.bytes() as i64);
    }
    h.push(grid.style().code());
    h.push(grid.coordinate_system().code());
    h.push(0);
    h.extend(grid.included().map(i64::from));
    h.extend(grid.shape().map(|n| n as i64));
    h
}

/// Encode `grid` to any sink.
pub fn encode_grid<W: Write>(
    sink: W,
    grid: &Grid,
    encoding: Encoding,
    precision: Precision,
) -> Result<W, GridError> {
    grid.style().ensure_implemented()?;
    let mut enc = Encoder::new(sink, encoding, precision);
    enc.write_ints(&geometry_header(grid, encoding, precision))?;
    for axis in Axis::ALL {
        enc.write_values(grid.edges(axis))?;
    }
    enc.flush()?;
    Ok(enc.into_inner())
}

fn count(value: i64, what: &str) -> Result<usize, CodecError> {
    usize::try_from(value).map_err(|_| CodecError::MalformedHeader {
        detail: format!("negative {what} {value}"),
    })
}

/// Decode a grid from any source.
pub fn decode_grid<R: BufRead>(source: R, encoding: Encoding) -> Result<Grid, GridError> {
    let mut dec = Decoder::new(source, encoding);
    let format = dec.read_int()?;
    if format != FORMAT_VERSION {
        return Err(CodecError::UnrecognizedFormat { found: format }.into());
    }
    let precision = match encoding {
        Encoding::Binary => Precision::from_bytes(dec.read_int()?)?,
        Encoding::Ascii => Precision::Double,
    };
    let style = GridStyle::from_code(dec.read_int()?)?;
    let system = CoordinateSystem::from_code(dec.read_int()?)?;
    let _grid_info = dec.read_int()?;
    let incl = dec.read_ints(3)?;
    let mut sizes = [0usize; 3];
    for (slot, axis) in sizes.iter_mut().zip(Axis::ALL) {
        *slot = count(dec.read_int()?, &format!("{axis} cell count"))?;
    }

    let mut edges: [Vec<f64>; 3] = Default::default();
    for (slot, n) in edges.iter_mut().zip(sizes) {
        *slot = dec.read_values(n + 1, precision)?;
    }
    check_trailing(&mut dec)?;

    let [u, v, w] = &edges;
    let mut grid = Grid::new(system, u, v, w)?;
    grid.set_style(style);
    grid.set_included([incl[0] != 0, incl[1] != 0, incl[2] != 0]);
    debug!(?system, shape = ?grid.shape(), "decoded grid");
    Ok(grid)
}

fn check_trailing<R: BufRead>(dec: &mut Decoder<R>) -> Result<(), CodecError> {
    let extra = match dec {
        Decoder::Ascii(tokens) => tokens.count_remaining()?,
        Decoder::Binary(r) => r.fill_buf()?.len() as u64,
    };
    if extra > 0 {
        return Err(CodecError::MalformedHeader {
            detail: format!("{extra} trailing items after the w axis"),
        });
    }
    Ok(())
}

impl Grid {
    /// Write `amr_grid.{inp|binp}` in the context's encoding.
    ///
    /// Fails with [`GridError::UnsupportedGridStyle`] for reserved styles
    /// before any file is touched.
    pub fn write(&self, io: &mut IoContext) -> Result<PathBuf, GridError> {
        self.style().ensure_implemented()?;
        let name = io.field_file_name(files::AMR_GRID, FileKind::Input);
        let sink = io.create(&name)?;
        encode_grid(sink, self, io.encoding(), io.precision())?;
        debug!(file = %name, shape = ?self.shape(), "wrote grid");
        Ok(io.path(&name))
    }

    /// Read `amr_grid`, trying the ASCII variant first.
    pub fn read(io: &IoContext) -> Result<Grid, GridError> {
        let (name, encoding) = io.require(files::AMR_GRID, FileKind::Input)?;
        decode_grid(io.open(&name)?, encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn small() -> Grid {
        Grid::new(
            CoordinateSystem::Cartesian,
            &[0.0, 1.0, 2.0],
            &[0.0, 1.0],
            &[0.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn binary_header_layout() {
        let g = small();
        assert_eq!(
            geometry_header(&g, Encoding::Binary, Precision::Double).as_slice(),
            &[1, 8, 0, 0, 0, 1, 1, 1, 2, 1, 1]
        );
        let bytes = encode_grid(Vec::new(), &g, Encoding::Binary, Precision::Double).unwrap();
        assert_eq!(bytes.len(), 11 * 8 + 7 * 8);
    }

    #[test]
    fn ascii_header_has_no_precision() {
        let mut g = small();
        g.set_coordinate_system(CoordinateSystem::Cylindrical);
        assert_eq!(
            geometry_header(&g, Encoding::Ascii, Precision::Single).as_slice(),
            &[1, 0, 200, 0, 1, 1, 1, 2, 1, 1]
        );
    }

    #[test]
    fn roundtrip_both_encodings() {
        let g = small();
        for encoding in [Encoding::Ascii, Encoding::Binary] {
            let bytes = encode_grid(Vec::new(), &g, encoding, Precision::Double).unwrap();
            let back = decode_grid(Cursor::new(bytes), encoding).unwrap();
            assert_eq!(back, g);
        }
    }

    #[test]
    fn reserved_style_refused_on_write() {
        let mut g = small();
        g.set_style(GridStyle::Octree);
        assert!(matches!(
            encode_grid(Vec::new(), &g, Encoding::Ascii, Precision::Double),
            Err(GridError::UnsupportedGridStyle { style: 1 })
        ));
    }

    #[test]
    fn reserved_style_refused_on_read() {
        let text = "1\n10\n0\n0\n1\n1\n1\n1\n1\n1\n0\n1\n0\n1\n0\n1\n";
        assert!(matches!(
            decode_grid(Cursor::new(text.as_bytes()), Encoding::Ascii),
            Err(GridError::UnsupportedGridStyle { style: 10 })
        ));
    }

    #[test]
    fn wrong_format_version() {
        let text = "2\n0\n0\n0\n1\n1\n1\n1\n1\n1\n0\n1\n0\n1\n0\n1\n";
        assert!(matches!(
            decode_grid(Cursor::new(text.as_bytes()), Encoding::Ascii),
            Err(GridError::Codec(CodecError::UnrecognizedFormat { found: 2 }))
        ));
    }

    #[test]
    fn unknown_coordinate_code() {
        let text = "1\n0\n300\n0\n1\n1\n1\n1\n1\n1\n0\n1\n0\n1\n0\n1\n";
        assert!(matches!(
            decode_grid(Cursor::new(text.as_bytes()), Encoding::Ascii),
            Err(GridError::Coord(_))
        ));
    }

    #[test]
    fn spherical_code_range_accepted() {
        let text = "1\n0\n150\n0\n1\n1\n1\n1\n1\n1\n1\n2\n0\n1\n0\n6\n";
        let g = decode_grid(Cursor::new(text.as_bytes()), Encoding::Ascii).unwrap();
        assert_eq!(g.coordinate_system(), CoordinateSystem::Spherical);
        assert_eq!(g.edges(Axis::U), &[1.0, 2.0]);
    }

    #[test]
    fn oversized_axis_count_rejected() {
        let text = "1\n0\n0\n0\n1\n1\n1\n2305843009213693951\n1\n1\n0\n1\n";
        assert!(matches!(
            decode_grid(Cursor::new(text.as_bytes()), Encoding::Ascii),
            Err(GridError::Codec(CodecError::BodyLengthMismatch { found: 2, .. }))
        ));

        let mut bytes = Vec::new();
        for i in [1i64, 8, 0, 0, 0, 1, 1, 1, 1 << 40, 1, 1] {
            bytes.extend_from_slice(&i.to_le_bytes());
        }
        bytes.extend_from_slice(&0.0f64.to_le_bytes());
        assert!(matches!(
            decode_grid(Cursor::new(bytes), Encoding::Binary),
            Err(GridError::Codec(CodecError::Io(_)))
        ));
    }

    #[test]
    fn trailing_values_rejected() {
        let mut bytes = encode_grid(Vec::new(), &small(), Encoding::Ascii, Precision::Double).unwrap();
        bytes.extend_from_slice(b"9.0\n");
        assert!(decode_grid(Cursor::new(bytes), Encoding::Ascii).is_err());
    }
}
