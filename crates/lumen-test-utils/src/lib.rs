//! Test fixtures for Lumen development.
//!
//! Temporary output directories with a ready [`IoContext`], small grids in
//! each coordinate system, gas models with known output
//! ([`fixtures`]), and a stand-in for the solver's own output files.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::path::PathBuf;

use lumen_codec::{files, Encoding, FieldShape, FileKind, IoConfig, IoContext, OverwritePolicy};
use lumen_core::CoordinateSystem;
use lumen_grid::Grid;
use tempfile::TempDir;

pub use fixtures::{ConstantGas, DustCoupledGas, ShortDust};

/// A temporary output directory. Removed when dropped.
pub struct TestOutdir {
    dir: TempDir,
}

impl TestOutdir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temporary output directory"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Configuration writing into this directory with `encoding`.
    pub fn config(&self, encoding: Encoding) -> IoConfig {
        IoConfig {
            outdir: self.path(),
            encoding,
            ..IoConfig::default()
        }
    }

    /// Context that always overwrites.
    pub fn io(&self, encoding: Encoding) -> IoContext {
        IoContext::new(self.config(encoding), OverwritePolicy::Always)
            .expect("valid test configuration")
    }

    /// Whether `name` exists in the directory.
    pub fn has(&self, name: &str) -> bool {
        self.dir.path().join(name).is_file()
    }
}

impl Default for TestOutdir {
    fn default() -> Self {
        Self::new()
    }
}

/// Two Cartesian cells along `u`: edges `[0,1,2] x [0,1] x [0,1]`.
pub fn two_cell_grid() -> Grid {
    Grid::new(
        CoordinateSystem::Cartesian,
        &[0.0, 1.0, 2.0],
        &[0.0, 1.0],
        &[0.0, 1.0],
    )
    .expect("valid two-cell grid")
}

/// `nu x nv x nw` unit cells starting at the origin.
pub fn cartesian_grid(nu: usize, nv: usize, nw: usize) -> Grid {
    let axis = |n: usize| (0..=n).map(|i| i as f64).collect::<Vec<_>>();
    Grid::new(CoordinateSystem::Cartesian, &axis(nu), &axis(nv), &axis(nw))
        .expect("valid cartesian grid")
}

/// A cylindrical grid of `nr x nphi x nz` cells on `r in [1, 2]`,
/// `phi in [0, 2pi]`, `z in [-1, 1]`.
pub fn cylindrical_grid(nr: usize, nphi: usize, nz: usize) -> Grid {
    let span = |lo: f64, hi: f64, n: usize| {
        (0..=n)
            .map(|i| lo + (hi - lo) * i as f64 / n as f64)
            .collect::<Vec<_>>()
    };
    Grid::new(
        CoordinateSystem::Cylindrical,
        &span(1.0, 2.0, nr),
        &span(0.0, std::f64::consts::TAU, nphi),
        &span(-1.0, 1.0, nz),
    )
    .expect("valid cylindrical grid")
}

/// Write `dust_temperature` the way the solver does after a thermal run:
/// one block per species, as a solver-output file.
pub fn write_solver_dust_temperature(io: &mut IoContext, grid: &Grid, per_species: &[f64]) {
    let n = grid.nrcells();
    io.write_field(
        files::DUST_TEMPERATURE,
        FileKind::Output,
        FieldShape::SPECIES,
        n,
        per_species.len(),
        |i| vec![per_species[i]; n],
    )
    .expect("write solver dust temperature");
}
