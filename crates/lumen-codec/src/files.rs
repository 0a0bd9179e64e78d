//! Names of the files exchanged with the solver.
//!
//! Numeric files are given as stems; the extension depends on the
//! encoding and on [`FileKind`](crate::FileKind).

/// Geometry file stem.
pub const AMR_GRID: &str = "amr_grid";
/// Dust mass density stem (multi-species input).
pub const DUST_DENSITY: &str = "dust_density";
/// Dust temperature stem (multi-species solver output).
pub const DUST_TEMPERATURE: &str = "dust_temperature";
/// Gas temperature stem.
pub const GAS_TEMPERATURE: &str = "gas_temperature";
/// Gas velocity stem (vector field).
pub const GAS_VELOCITY: &str = "gas_velocity";
/// Prefix of per-molecule number-density stems.
pub const NUMBER_DENSITY_PREFIX: &str = "numberdens_";
/// Dust opacity descriptor.
pub const DUST_OPACITY: &str = "dustopac.inp";
/// Molecular line descriptor.
pub const LINES: &str = "line.inp";
/// Stellar sources.
pub const STARS: &str = "stars.inp";
/// Wavelength grid.
pub const WAVELENGTHS: &str = "wavelength_micron.inp";
/// Solver configuration.
pub const SOLVER_CONFIG: &str = "radmc3d.inp";

/// Number-density stem for one molecule.
pub fn number_density(species: &str) -> String {
    format!("{NUMBER_DENSITY_PREFIX}{species}")
}
