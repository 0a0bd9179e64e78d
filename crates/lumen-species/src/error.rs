//! Error types for the species writers.

use lumen_codec::CodecError;
use thiserror::Error;

/// Errors arising while writing species containers.
#[derive(Debug, Error)]
pub enum SpeciesError {
    /// A model returned the wrong number of values for the grid.
    #[error("{field} has {found} values, the grid has {expected} cells")]
    ValueCount {
        /// Which field the model was producing, e.g. `"dust_density[carbon]"`.
        field: String,
        /// Cells in the grid.
        expected: usize,
        /// Values the model returned.
        found: usize,
    },
    /// A star's flux table does not match the wavelength grid.
    #[error("star {star:?} has {found} flux values for {expected} wavelengths")]
    SpectrumLengthMismatch {
        /// Star name.
        star: String,
        /// Wavelengths in the grid.
        expected: usize,
        /// Flux values supplied.
        found: usize,
    },
    /// A blackbody star with a temperature that is not strictly positive.
    #[error("star {star:?} has blackbody temperature {temperature} K, which must be positive")]
    InvalidTemperature {
        /// Star name.
        star: String,
        /// The rejected temperature.
        temperature: f64,
    },
    /// Molecules were written without a gas model.
    #[error("gas container has no model")]
    MissingGasModel,
    /// File codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Fail with [`SpeciesError::ValueCount`] unless `values` has one entry per cell.
pub(crate) fn check_count(
    field: impl FnOnce() -> String,
    values: &[f64],
    expected: usize,
) -> Result<(), SpeciesError> {
    if values.len() != expected {
        return Err(SpeciesError::ValueCount {
            field: field(),
            expected,
            found: values.len(),
        });
    }
    Ok(())
}
