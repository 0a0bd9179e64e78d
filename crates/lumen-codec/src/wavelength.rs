//! The `wavelength_micron.inp` grid.
//!
//! A plain count followed by one wavelength per line, in microns. Shared
//! by the thermal Monte-Carlo run and the stellar spectra in `stars.inp`.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::codec::{format_value, AsciiTokens};
use crate::error::CodecError;
use crate::files;
use crate::io::IoContext;

/// Encode a wavelength grid.
pub fn encode_wavelengths(w: &mut dyn Write, microns: &[f64]) -> Result<(), CodecError> {
    writeln!(w, "{}", microns.len())?;
    for &l in microns {
        writeln!(w, "{}", format_value(l))?;
    }
    Ok(())
}

/// Decode a wavelength grid.
pub fn decode_wavelengths(r: &mut dyn BufRead) -> Result<Vec<f64>, CodecError> {
    let mut tokens = AsciiTokens::new(r);
    let count = tokens.next_int()?;
    let count = usize::try_from(count).map_err(|_| CodecError::MalformedHeader {
        detail: format!("negative wavelength count {count}"),
    })?;
    let values = tokens.next_values(count)?;
    let extra = tokens.count_remaining()?;
    if extra > 0 {
        return Err(CodecError::BodyLengthMismatch {
            expected: count as u64,
            found: count as u64 + extra,
            unit: "values",
        });
    }
    Ok(values)
}

impl IoContext {
    /// Write `wavelength_micron.inp`.
    pub fn write_wavelengths(&mut self, microns: &[f64]) -> Result<(), CodecError> {
        let mut w = self.create(files::WAVELENGTHS)?;
        encode_wavelengths(&mut w, microns)?;
        w.flush()?;
        debug!(count = microns.len(), "wrote wavelength grid");
        Ok(())
    }

    /// Read `wavelength_micron.inp`, or `None` if it does not exist.
    pub fn read_wavelengths(&self) -> Result<Option<Vec<f64>>, CodecError> {
        if !self.exists(files::WAVELENGTHS) {
            return Ok(None);
        }
        decode_wavelengths(&mut self.open(files::WAVELENGTHS)?).map(Some)
    }
}
