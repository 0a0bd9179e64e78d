//! Dust species and the `dustopac.inp` / `dust_density` writer.

use std::fmt;
use std::path::PathBuf;

use lumen_codec::{files, DustOpacityEntry, FieldShape, FileKind, IoContext};
use lumen_core::Coordinates;
use lumen_grid::Grid;
use tracing::debug;

use crate::error::{check_count, SpeciesError};
use crate::map::SpeciesMap;

/// A dust species: a mass density at every cell center.
pub trait DustSpecies {
    /// Density in g/cm³ at each of `cells`, in the same order.
    fn density(&self, cells: &Coordinates) -> Vec<f64>;
}

impl<F> DustSpecies for F
where
    F: Fn(&Coordinates) -> Vec<f64>,
{
    fn density(&self, cells: &Coordinates) -> Vec<f64> {
        self(cells)
    }
}

/// The same density everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformDust {
    /// Density in g/cm³.
    pub density: f64,
}

impl UniformDust {
    /// Uniform dust of the given density.
    pub const fn new(density: f64) -> Self {
        Self { density }
    }
}

impl DustSpecies for UniformDust {
    fn density(&self, cells: &Coordinates) -> Vec<f64> {
        vec![self.density; cells.len()]
    }
}

/// Boxed dust species as stored in a [`DustContainer`].
pub type BoxedDust = Box<dyn DustSpecies + Send + Sync>;

/// Named dust species in file order.
#[derive(Default)]
pub struct DustContainer {
    species: SpeciesMap<BoxedDust>,
}

impl fmt::Debug for DustContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DustContainer")
            .field("species", &self.species.names().collect::<Vec<_>>())
            .finish()
    }
}

impl DustContainer {
    /// An empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a species. The name doubles as the opacity table
    /// suffix (`dustkappa_<name>.inp`).
    pub fn insert(&mut self, name: impl Into<String>, species: impl DustSpecies + Send + Sync + 'static) {
        self.species.insert(name, Box::new(species));
    }

    /// Remove a species.
    pub fn remove(&mut self, name: &str) -> Option<BoxedDust> {
        self.species.remove(name)
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Species names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.species.names()
    }

    /// Write `dustopac.inp` and `dust_density` for `grid`.
    ///
    /// Each species is evaluated over the cell centers and written as its
    /// own block, so only one species is held in memory at a time.
    pub fn write(&self, io: &mut IoContext, grid: &Grid) -> Result<PathBuf, SpeciesError> {
        let entries: Vec<_> = self.names().map(DustOpacityEntry::thermal).collect();
        io.write_dust_opacities(&entries)?;

        let n = grid.nrcells();
        let (mut writer, path) = io.field_writer(
            files::DUST_DENSITY,
            FileKind::Input,
            FieldShape::SPECIES,
            n,
            self.len(),
        )?;
        for (i, (name, species)) in self.species.iter().enumerate() {
            let rho = species.density(grid.cells());
            check_count(|| format!("dust_density[{name}]"), &rho, n)?;
            writer.write_block(i, &rho)?;
            debug!(index = i, species = %name, offset = writer.layout().block_offset(i), "wrote dust block");
        }
        writer.finish()?;
        Ok(path)
    }
}
