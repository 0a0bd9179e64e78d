//! Species containers and their writers.
//!
//! Each container turns caller-defined physics into solver input files
//! over a [`Grid`](lumen_grid::Grid):
//!
//! - [`DustContainer`]: `dustopac.inp` and the multi-species `dust_density`
//! - [`GasContainer`]: `line.inp`, `gas_temperature`, `numberdens_<name>`
//!   and `gas_velocity`
//! - [`StarContainer`]: `stars.inp`
//!
//! Containers are [`SpeciesMap`]s underneath: insertion order is file
//! order and re-inserting a name replaces the species in place.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dust;
pub mod error;
pub mod gas;
pub mod map;
pub mod star;

pub use dust::{BoxedDust, DustContainer, DustSpecies, UniformDust};
pub use error::SpeciesError;
pub use gas::{BoxedGasModel, GasContainer, GasModel, MoleculeSpecies, DEFAULT_MOLECULE_MASS};
pub use map::SpeciesMap;
pub use star::{decode_stars, encode_stars, read_stars, write_stars, Star, StarContainer, StarsFile};
