//! Simulation orchestration for Lumen.
//!
//! [`Simulation`] binds a grid, its dust, gas and star species, a
//! wavelength grid and a [`SolverConfig`] to one output directory. The
//! commit methods stage the solver's input files there; [`run_solver`]
//! launches the external solver in that directory and relays its output;
//! [`Simulation::map`] reads every produced field back.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod runner;
pub mod simulation;

pub use config::SolverConfig;
pub use error::SimError;
pub use runner::{run_solver, shell_command, StreamLine};
pub use simulation::{Simulation, MCTHERM_COMMAND};
