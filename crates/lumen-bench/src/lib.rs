//! Benchmark profiles for the Lumen field codec and transforms.
//!
//! - [`reference_grid`]: 64x32x16 spherical grid (32K cells)
//! - [`stress_grid`]: 128x64x32 spherical grid (~262K cells)
//! - [`disk_density`]: a flared-disk density over any grid's cells

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f64::consts::{PI, TAU};

use lumen_core::{units, CoordinateSystem, Coordinates};
use lumen_grid::Grid;

fn log_span(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let (a, b) = (lo.ln(), hi.ln());
    (0..=n)
        .map(|i| (a + (b - a) * i as f64 / n as f64).exp())
        .collect()
}

fn lin_span(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..=n).map(|i| lo + (hi - lo) * i as f64 / n as f64).collect()
}

/// Spherical grid from 1 to 100 AU, log-spaced in radius.
pub fn spherical_grid(nr: usize, ntheta: usize, nphi: usize) -> Grid {
    Grid::new(
        CoordinateSystem::Spherical,
        &log_span(units::AU, 100.0 * units::AU, nr),
        &lin_span(0.1, PI - 0.1, ntheta),
        &lin_span(0.0, TAU, nphi),
    )
    .expect("benchmark grid axes are valid")
}

/// 64x32x16 spherical grid (32K cells).
pub fn reference_grid() -> Grid {
    spherical_grid(64, 32, 16)
}

/// 128x64x32 spherical grid (~262K cells).
pub fn stress_grid() -> Grid {
    spherical_grid(128, 64, 32)
}

/// Flared-disk density, `rho0 (R/AU)^-2.25 exp(-z^2 / 2h^2)` with
/// `h = 0.05 R (R/AU)^0.25`. `cells` may be in any coordinate system.
pub fn disk_density(cells: &Coordinates) -> Vec<f64> {
    let cyl = cells.transform(CoordinateSystem::Cylindrical);
    cyl.u()
        .iter()
        .zip(cyl.w())
        .map(|(&r, &z)| {
            let x = r / units::AU;
            let h = 0.05 * r * x.powf(0.25);
            1e-13 * x.powf(-2.25) * (-z * z / (2.0 * h * h)).exp()
        })
        .collect()
}
