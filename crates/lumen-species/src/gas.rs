//! Molecular gas: the line descriptor and the gas field files.
//!
//! One [`GasModel`] supplies the gas density, temperature and velocity for
//! the whole grid. Each [`MoleculeSpecies`] scales the shared density into
//! its own number density, `density * abundance / mass`.

use std::fmt;

use lumen_codec::{files, interleave_components, FieldShape, FileKind, IoContext, LineEntry};
use lumen_core::{Coordinates, VectorField};
use lumen_grid::Grid;
use lumen_mapper::MappedFields;
use tracing::debug;

use crate::error::{check_count, SpeciesError};
use crate::map::SpeciesMap;

/// Default molecular mass in grams (28 amu, CO).
pub const DEFAULT_MOLECULE_MASS: f64 = 4.65119e-23;

/// The physical gas model.
///
/// Density and temperature may depend on fields the solver already
/// produced, e.g. a gas temperature derived from the dust temperature of
/// an earlier thermal run; `mapped` holds everything readable from the
/// output directory at write time.
pub trait GasModel {
    /// Gas mass density at each cell center.
    fn density(&self, cells: &Coordinates, mapped: &MappedFields) -> Vec<f64>;

    /// Gas temperature at each cell center.
    fn temperature(&self, cells: &Coordinates, mapped: &MappedFields) -> Vec<f64>;

    /// Gas velocity at each cell center. Any basis is accepted; it is
    /// rotated into the grid's coordinate system before writing.
    fn velocity(&self, cells: &Coordinates) -> VectorField;
}

/// Boxed gas model as stored in a [`GasContainer`].
pub type BoxedGasModel = Box<dyn GasModel + Send + Sync>;

/// One molecule listed in `line.inp`.
#[derive(Clone, Debug, PartialEq)]
pub struct MoleculeSpecies {
    /// Fractional abundance relative to the gas density. Default: 1.
    pub abundance: f64,
    /// Molecular data input style. Default: `"leiden"`.
    pub input_style: String,
    /// First solver flag. Default: 0.
    pub flag_a: i64,
    /// Second solver flag. Default: 0.
    pub flag_b: i64,
    /// Collision partner names. Default: none.
    pub partners: Vec<String>,
    /// Molecular mass in grams. Default: [`DEFAULT_MOLECULE_MASS`].
    pub mass: f64,
}

impl Default for MoleculeSpecies {
    fn default() -> Self {
        Self {
            abundance: 1.0,
            input_style: "leiden".to_string(),
            flag_a: 0,
            flag_b: 0,
            partners: Vec::new(),
            mass: DEFAULT_MOLECULE_MASS,
        }
    }
}

impl MoleculeSpecies {
    /// A molecule with the given abundance and default settings otherwise.
    pub fn with_abundance(abundance: f64) -> Self {
        Self {
            abundance,
            ..Self::default()
        }
    }

    fn line_entry(&self, name: &str) -> LineEntry {
        LineEntry {
            name: name.to_string(),
            input_style: self.input_style.clone(),
            flag_a: self.flag_a,
            flag_b: self.flag_b,
            partners: self.partners.clone(),
        }
    }
}

/// A gas model plus the molecules to stage.
#[derive(Default)]
pub struct GasContainer {
    model: Option<BoxedGasModel>,
    species: SpeciesMap<MoleculeSpecies>,
}

impl fmt::Debug for GasContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GasContainer")
            .field("model", &self.model.as_ref().map(|_| ".."))
            .field("species", &self.species)
            .finish()
    }
}

impl GasContainer {
    /// An empty container without a model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gas model.
    pub fn set_model(&mut self, model: impl GasModel + Send + Sync + 'static) {
        self.model = Some(Box::new(model));
    }

    /// Whether a model is set.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Add or replace a molecule.
    pub fn insert(&mut self, name: impl Into<String>, species: MoleculeSpecies) {
        self.species.insert(name, species);
    }

    /// The molecules.
    pub fn species(&self) -> &SpeciesMap<MoleculeSpecies> {
        &self.species
    }

    /// The molecules, mutably.
    pub fn species_mut(&mut self) -> &mut SpeciesMap<MoleculeSpecies> {
        &mut self.species
    }

    /// Write `line.inp`, `gas_temperature`, one `numberdens_<name>` per
    /// molecule and `gas_velocity`.
    ///
    /// Fails with [`SpeciesError::MissingGasModel`] before touching any
    /// file if no model is set.
    pub fn write(
        &self,
        io: &mut IoContext,
        grid: &Grid,
        mapped: &MappedFields,
    ) -> Result<(), SpeciesError> {
        let model = self.model.as_ref().ok_or(SpeciesError::MissingGasModel)?;
        let n = grid.nrcells();
        let cells = grid.cells();

        let entries: Vec<_> = self
            .species
            .iter()
            .map(|(name, s)| s.line_entry(name))
            .collect();
        io.write_lines(&entries)?;

        let temperature = model.temperature(cells, mapped);
        check_count(|| files::GAS_TEMPERATURE.to_string(), &temperature, n)?;
        write_single(io, files::GAS_TEMPERATURE, FieldShape::SCALAR, n, &temperature)?;

        let density = model.density(cells, mapped);
        check_count(|| "gas density".to_string(), &density, n)?;
        for (name, species) in &self.species {
            let stem = files::number_density(name);
            let numdens: Vec<f64> = density
                .iter()
                .map(|rho| rho * species.abundance / species.mass)
                .collect();
            write_single(io, &stem, FieldShape::SCALAR, n, &numdens)?;
        }

        let velocity = model.velocity(cells);
        if velocity.len() != n {
            return Err(SpeciesError::ValueCount {
                field: files::GAS_VELOCITY.to_string(),
                expected: n,
                found: velocity.len(),
            });
        }
        let components = velocity
            .transform(grid.coordinate_system())
            .into_components();
        let body = interleave_components(&components);
        write_single(io, files::GAS_VELOCITY, FieldShape::VECTOR, n, &body)?;

        debug!(molecules = self.species.len(), cells = n, "wrote gas fields");
        Ok(())
    }
}

fn write_single(
    io: &mut IoContext,
    stem: &str,
    shape: FieldShape,
    cells: usize,
    values: &[f64],
) -> Result<(), SpeciesError> {
    let (mut writer, _) = io.field_writer(stem, FileKind::Input, shape, cells, 1)?;
    writer.write_block(0, values)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molecule_defaults() {
        let m = MoleculeSpecies::default();
        assert_eq!(m.abundance, 1.0);
        assert_eq!(m.input_style, "leiden");
        assert_eq!(m.mass, 4.65119e-23);
        assert!(m.partners.is_empty());
    }

    #[test]
    fn line_entry_carries_partners() {
        let m = MoleculeSpecies {
            partners: vec!["p-h2".into()],
            flag_b: 2,
            ..MoleculeSpecies::with_abundance(1e-4)
        };
        let e = m.line_entry("co");
        assert_eq!(e.name, "co");
        assert_eq!(e.flag_b, 2);
        assert_eq!(e.partners, vec!["p-h2".to_string()]);
    }
}
