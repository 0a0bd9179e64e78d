//! Species and gas models with known output.
//!
//! - [`ConstantGas`]: fixed density, temperature and Cartesian velocity.
//! - [`DustCoupledGas`]: gas temperature copied from the first mapped dust
//!   temperature, for staging a line run after a thermal run.
//! - [`ShortDust`]: returns one value too few.

use lumen_core::{Coordinates, VectorField};
use lumen_mapper::MappedFields;
use lumen_species::{DustSpecies, GasModel};

/// The same gas state in every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantGas {
    pub density: f64,
    pub temperature: f64,
    pub velocity: [f64; 3],
}

impl ConstantGas {
    pub fn new(density: f64, temperature: f64, velocity: [f64; 3]) -> Self {
        Self {
            density,
            temperature,
            velocity,
        }
    }
}

impl GasModel for ConstantGas {
    fn density(&self, cells: &Coordinates, _: &MappedFields) -> Vec<f64> {
        vec![self.density; cells.len()]
    }

    fn temperature(&self, cells: &Coordinates, _: &MappedFields) -> Vec<f64> {
        vec![self.temperature; cells.len()]
    }

    fn velocity(&self, cells: &Coordinates) -> VectorField {
        VectorField::from_fn(cells.clone(), |_| self.velocity)
    }
}

/// Constant density at rest, at the temperature of the first dust species
/// found in the output directory, or `fallback` if there is none.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DustCoupledGas {
    pub density: f64,
    pub fallback: f64,
}

impl GasModel for DustCoupledGas {
    fn density(&self, cells: &Coordinates, _: &MappedFields) -> Vec<f64> {
        vec![self.density; cells.len()]
    }

    fn temperature(&self, cells: &Coordinates, mapped: &MappedFields) -> Vec<f64> {
        match mapped.dust_temperature.values().next() {
            Some(t) => t.as_slice().to_vec(),
            None => vec![self.fallback; cells.len()],
        }
    }

    fn velocity(&self, cells: &Coordinates) -> VectorField {
        VectorField::from_fn(cells.clone(), |_| [0.0; 3])
    }
}

/// A dust species that returns one value fewer than there are cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShortDust;

impl DustSpecies for ShortDust {
    fn density(&self, cells: &Coordinates) -> Vec<f64> {
        vec![1.0; cells.len().saturating_sub(1)]
    }
}
