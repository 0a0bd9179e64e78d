//! Lumen: staging and readback of structured-grid inputs for the RADMC-3D
//! radiative-transfer solver.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Lumen sub-crates. For most users, adding `lumen` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lumen::prelude::*;
//!
//! let dir = std::env::temp_dir().join("lumen-doc-quick-start");
//! let config = IoConfig { outdir: dir.clone(), ..IoConfig::default() };
//! let mut sim = Simulation::new(config, OverwritePolicy::Always).unwrap();
//!
//! // 8 x 4 x 1 cells in spherical coordinates.
//! let r: Vec<f64> = (0..=8).map(|i| (1.0 + i as f64) * lumen::units::AU).collect();
//! let theta = [0.5, 1.0, 1.5, 2.0, 2.5];
//! sim.set_grid(Grid::new(CoordinateSystem::Spherical, &r, &theta, &[0.0, 6.28]).unwrap());
//!
//! sim.set_wavelengths(&[0.1, 1.0, 10.0, 100.0, 1000.0]);
//! sim.config_mut().nphot = Some(100_000);
//! sim.stars_mut().insert(
//!     "sun",
//!     Star::blackbody(Point::cartesian(0.0, 0.0, 0.0), lumen::units::R_SUN, lumen::units::M_SUN, 5780.0),
//! );
//! sim.dust_mut().insert("silicate", |cells: &Coordinates| {
//!     cells.u().iter().map(|r| 1e-16 * (lumen::units::AU / r).powi(2)).collect::<Vec<_>>()
//! });
//! sim.commit_mctherm().unwrap();
//!
//! let mapped = sim.map().unwrap();
//! assert_eq!(mapped.dust_density["silicate"].dims(), &[8, 4, 1]);
//! # std::fs::remove_dir_all(dir).unwrap();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lumen-core` | Coordinate systems, vector fields, cell arrays |
//! | [`units`] | `lumen-core` | cgs constants and the unit table |
//! | [`codec`] | `lumen-codec` | Field files, descriptors, the I/O context |
//! | [`grid`] | `lumen-grid` | Regular grids and the geometry file |
//! | [`mapper`] | `lumen-mapper` | Reading an output directory back |
//! | [`species`] | `lumen-species` | Dust, gas and star writers |
//! | [`sim`] | `lumen-sim` | Orchestration, solver configuration, solver runs |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Geometric core types (`lumen-core`).
///
/// [`types::CoordinateSystem`], [`types::Point`], [`types::Coordinates`],
/// [`types::VectorField`] and [`types::FieldArray`].
pub use lumen_core as types;

/// Physical constants in cgs units (`lumen-core`).
pub use lumen_core::units;

/// Field-file codec and output-directory I/O (`lumen-codec`).
///
/// [`codec::IoContext`] owns the output directory and the overwrite gate;
/// [`codec::FieldWriter`] and [`codec::FieldReader`] handle the numeric
/// files in either encoding.
pub use lumen_codec as codec;

/// Regular grids and the `amr_grid` geometry file (`lumen-grid`).
pub use lumen_grid as grid;

/// Reverse reading of an output directory (`lumen-mapper`).
///
/// [`mapper::map_variables`] returns every discoverable field as a
/// [`mapper::MappedFields`].
pub use lumen_mapper as mapper;

/// Dust, gas and star species and their writers (`lumen-species`).
pub use lumen_species as species;

/// Simulation orchestration and the solver runner (`lumen-sim`).
pub use lumen_sim as sim;

/// Common imports for typical Lumen usage.
///
/// ```rust
/// use lumen::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use lumen_core::{CoordinateSystem, Coordinates, FieldArray, Point, VectorField};

    // I/O
    pub use lumen_codec::{Encoding, IoConfig, IoContext, OverwritePolicy, Precision};

    // Grid
    pub use lumen_grid::{Axis, Grid, GridStyle};

    // Readback
    pub use lumen_mapper::MappedFields;

    // Species
    pub use lumen_species::{
        DustSpecies, GasModel, MoleculeSpecies, Star, UniformDust,
    };

    // Simulation
    pub use lumen_sim::{Simulation, SolverConfig};

    // Errors
    pub use lumen_codec::CodecError;
    pub use lumen_core::CoordError;
    pub use lumen_grid::GridError;
    pub use lumen_sim::SimError;
    pub use lumen_species::SpeciesError;
}
