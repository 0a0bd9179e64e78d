//! The name→array aggregate returned by the mapper.

use indexmap::IndexMap;
use lumen_core::FieldArray;

/// Every field family found in an output directory.
///
/// Species-indexed families map species name to a `[nu, nv, nw]` array in
/// descriptor order. `gas_velocity` has dims `[3, nu, nv, nw]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MappedFields {
    /// Dust mass density per dust species.
    pub dust_density: IndexMap<String, FieldArray>,
    /// Solver-computed dust temperature per dust species.
    pub dust_temperature: IndexMap<String, FieldArray>,
    /// Number density per molecule.
    pub gas_number_density: IndexMap<String, FieldArray>,
    /// Gas temperature.
    pub gas_temperature: Option<FieldArray>,
    /// Gas velocity in the grid's coordinate basis.
    pub gas_velocity: Option<FieldArray>,
}

impl MappedFields {
    /// `true` when no family was found.
    pub fn is_empty(&self) -> bool {
        self.dust_density.is_empty()
            && self.dust_temperature.is_empty()
            && self.gas_number_density.is_empty()
            && self.gas_temperature.is_none()
            && self.gas_velocity.is_none()
    }

    /// Number of arrays across all families.
    pub fn len(&self) -> usize {
        self.dust_density.len()
            + self.dust_temperature.len()
            + self.gas_number_density.len()
            + usize::from(self.gas_temperature.is_some())
            + usize::from(self.gas_velocity.is_some())
    }

    /// Flat view for rendering: one entry per array, named
    /// `dust_density_<species>`, `dust_temperature_<species>`,
    /// `gas_number_density_<species>`, `gas_temperature` and `gas_velocity`.
    pub fn cell_data(&self) -> IndexMap<String, &FieldArray> {
        let prefixed = [
            ("dust_density", &self.dust_density),
            ("dust_temperature", &self.dust_temperature),
            ("gas_number_density", &self.gas_number_density),
        ];
        let mut out = IndexMap::with_capacity(self.len());
        for (family, map) in prefixed {
            for (name, array) in map {
                out.insert(format!("{family}_{name}"), array);
            }
        }
        if let Some(t) = &self.gas_temperature {
            out.insert("gas_temperature".to_string(), t);
        }
        if let Some(v) = &self.gas_velocity {
            out.insert("gas_velocity".to_string(), v);
        }
        out
    }
}
