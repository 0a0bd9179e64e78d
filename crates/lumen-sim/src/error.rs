//! Error type for the orchestrator and the solver runner.

use std::io;

use lumen_codec::CodecError;
use lumen_grid::GridError;
use lumen_species::SpeciesError;
use thiserror::Error;

/// Errors arising from a commit, a solver run or the solver configuration.
#[derive(Debug, Error)]
pub enum SimError {
    /// The solver process could not be started.
    #[error("failed to start {command:?}: {source}")]
    Spawn {
        /// The command line.
        command: String,
        /// Underlying OS error.
        source: io::Error,
    },
    /// `radmc3d.inp` names a key this configuration does not know.
    #[error("unknown solver configuration key {key:?}")]
    UnknownConfigKey {
        /// The key as written.
        key: String,
    },
    /// A configuration value could not be parsed for its key.
    #[error("invalid value {value:?} for solver configuration key {key}")]
    InvalidConfigValue {
        /// The key.
        key: String,
        /// The value as written.
        value: String,
    },
    /// I/O error while relaying solver output or reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Field or descriptor codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Grid construction or geometry file failure.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Species writer failure.
    #[error(transparent)]
    Species(#[from] SpeciesError),
}
