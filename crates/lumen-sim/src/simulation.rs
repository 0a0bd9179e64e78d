//! The simulation: everything staged into one output directory.

use std::io;
use std::process::ExitStatus;

use lumen_codec::{IoConfig, IoContext, OverwritePolicy};
use lumen_grid::Grid;
use lumen_mapper::{map_variables, MappedFields};
use lumen_species::{write_stars, DustContainer, GasContainer, StarContainer};
use tracing::info;

use crate::config::SolverConfig;
use crate::error::SimError;
use crate::runner::run_solver;

/// Command line of the thermal Monte Carlo run.
pub const MCTHERM_COMMAND: &str = "radmc3d mctherm";

/// A grid, its species, the wavelength grid and the solver configuration,
/// bound to one output directory.
///
/// The configuration and the grid are written by the first commit that
/// needs them and again only after they have been changed through
/// [`config_mut`](Self::config_mut), [`grid_mut`](Self::grid_mut) or
/// [`set_grid`](Self::set_grid). Species files are rewritten on every
/// commit.
#[derive(Debug)]
pub struct Simulation {
    io: IoContext,
    grid: Grid,
    config: SolverConfig,
    dust: DustContainer,
    gas: GasContainer,
    stars: StarContainer,
    wavelengths: Vec<f64>,
    config_written: bool,
    grid_written: bool,
}

impl Simulation {
    /// A simulation over a one-cell Cartesian grid with nothing staged.
    pub fn new(config: IoConfig, policy: OverwritePolicy) -> Result<Self, SimError> {
        Ok(Self {
            io: IoContext::new(config, policy)?,
            grid: Grid::default(),
            config: SolverConfig::default(),
            dust: DustContainer::new(),
            gas: GasContainer::new(),
            stars: StarContainer::new(),
            wavelengths: Vec::new(),
            config_written: false,
            grid_written: false,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The I/O context.
    pub fn io(&self) -> &IoContext {
        &self.io
    }

    /// The I/O context, mutably.
    pub fn io_mut(&mut self) -> &mut IoContext {
        &mut self.io
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The grid, mutably. The geometry file is rewritten on the next commit.
    pub fn grid_mut(&mut self) -> &mut Grid {
        self.grid_written = false;
        &mut self.grid
    }

    /// Replace the grid. The geometry file is rewritten on the next commit.
    pub fn set_grid(&mut self, grid: Grid) {
        self.grid_written = false;
        self.grid = grid;
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The solver configuration, mutably. `radmc3d.inp` is rewritten on
    /// the next commit.
    pub fn config_mut(&mut self) -> &mut SolverConfig {
        self.config_written = false;
        &mut self.config
    }

    /// Dust species.
    pub fn dust(&self) -> &DustContainer {
        &self.dust
    }

    /// Dust species, mutably.
    pub fn dust_mut(&mut self) -> &mut DustContainer {
        &mut self.dust
    }

    /// Gas model and molecules.
    pub fn gas(&self) -> &GasContainer {
        &self.gas
    }

    /// Gas model and molecules, mutably.
    pub fn gas_mut(&mut self) -> &mut GasContainer {
        &mut self.gas
    }

    /// Stars.
    pub fn stars(&self) -> &StarContainer {
        &self.stars
    }

    /// Stars, mutably.
    pub fn stars_mut(&mut self) -> &mut StarContainer {
        &mut self.stars
    }

    /// Wavelength grid in microns.
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Replace the wavelength grid with a copy of `microns`.
    pub fn set_wavelengths(&mut self, microns: &[f64]) {
        self.wavelengths = microns.to_vec();
    }

    // ── Commits ────────────────────────────────────────────────────

    fn commit_shared(&mut self) -> Result<(), SimError> {
        if !self.config_written {
            self.config.write(&mut self.io)?;
            self.config_written = true;
        }
        if !self.grid_written {
            self.grid.write(&mut self.io)?;
            self.grid_written = true;
        }
        Ok(())
    }

    /// Stage the inputs of a thermal Monte Carlo run: wavelengths,
    /// configuration, grid, stars and dust, in that order.
    pub fn commit_mctherm(&mut self) -> Result<(), SimError> {
        info!(outdir = %self.io.outdir().display(), "committing thermal run");
        self.io.write_wavelengths(&self.wavelengths)?;
        self.commit_shared()?;
        write_stars(
            &mut self.io,
            &self.stars,
            &self.wavelengths,
            self.grid.coordinate_system(),
        )?;
        self.dust.write(&mut self.io, &self.grid)?;
        info!(
            stars = self.stars.len(),
            dust = self.dust.len(),
            wavelengths = self.wavelengths.len(),
            "thermal run committed"
        );
        Ok(())
    }

    /// Stage the inputs of a line run: configuration, grid and gas.
    ///
    /// The gas model sees every field already present in the output
    /// directory, e.g. the dust temperature of an earlier thermal run.
    pub fn commit_lines(&mut self) -> Result<(), SimError> {
        info!(outdir = %self.io.outdir().display(), "committing line run");
        self.commit_shared()?;
        let mapped = self.map()?;
        self.gas.write(&mut self.io, &self.grid, &mapped)?;
        info!(molecules = self.gas.species().len(), "line run committed");
        Ok(())
    }

    // ── Solver ─────────────────────────────────────────────────────

    /// Run `command` in the output directory, relaying its output to this
    /// process's stdout and stderr.
    pub fn run(&self, command: &str) -> Result<ExitStatus, SimError> {
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.run_with(command, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Run `command` in the output directory, relaying its output to the
    /// given sinks.
    pub fn run_with(
        &self,
        command: &str,
        stdout: &mut dyn io::Write,
        stderr: &mut dyn io::Write,
    ) -> Result<ExitStatus, SimError> {
        run_solver(command, self.io.outdir(), stdout, stderr)
    }

    /// Run the thermal Monte Carlo, `radmc3d mctherm`.
    pub fn run_mctherm(&self) -> Result<ExitStatus, SimError> {
        self.run(MCTHERM_COMMAND)
    }

    /// Read back every field present in the output directory.
    pub fn map(&self) -> Result<MappedFields, SimError> {
        Ok(map_variables(&self.io, &self.grid)?)
    }
}
