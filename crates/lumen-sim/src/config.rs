//! Solver configuration, `radmc3d.inp`.
//!
//! Every key is optional. Only keys that are set are written, one
//! `key = value` per line in declaration order; booleans are written as
//! `0`/`1`. Values are passed through unchecked.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use lumen_codec::codec::{format_value, parse_int, parse_value};
use lumen_codec::{files, CodecError, IoContext};
use tracing::debug;

use crate::error::SimError;

// ── Value rendering ────────────────────────────────────────────────

/// A scalar that can appear on the right of a `radmc3d.inp` line.
trait ConfigValue: Sized {
    fn render(&self) -> String;
    fn parse(text: &str) -> Option<Self>;
}

impl ConfigValue for bool {
    fn render(&self) -> String {
        i64::from(*self).to_string()
    }

    fn parse(text: &str) -> Option<Self> {
        <i64 as ConfigValue>::parse(text).map(|v| v != 0)
    }
}

impl ConfigValue for i64 {
    fn render(&self) -> String {
        self.to_string()
    }

    fn parse(text: &str) -> Option<Self> {
        if let Ok(v) = parse_int(text) {
            return Some(v);
        }
        // Photon counts are often written as `1e6`.
        let v = parse_value(text).ok()?;
        (v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
    }
}

impl ConfigValue for f64 {
    fn render(&self) -> String {
        format_value(*self)
    }

    fn parse(text: &str) -> Option<Self> {
        parse_value(text).ok()
    }
}

// ── SolverConfig ───────────────────────────────────────────────────

macro_rules! solver_config {
    ($($(#[doc = $doc:literal])+ $key:ident: $ty:ty,)+) => {
        /// Contents of `radmc3d.inp`. Every key defaults to unset.
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct SolverConfig {
            $($(#[doc = $doc])+ pub $key: Option<$ty>,)+
        }

        impl SolverConfig {
            /// Every key this configuration knows, in declaration order.
            pub const KEYS: &'static [&'static str] = &[$(stringify!($key)),+];

            /// The set keys and their rendered values, in declaration order.
            pub fn entries(&self) -> Vec<(&'static str, String)> {
                let mut out = Vec::new();
                $(
                    if let Some(v) = &self.$key {
                        out.push((stringify!($key), ConfigValue::render(v)));
                    }
                )+
                out
            }

            /// Set `key` from its textual value.
            pub fn set(&mut self, key: &str, value: &str) -> Result<(), SimError> {
                let invalid = || SimError::InvalidConfigValue {
                    key: key.to_string(),
                    value: value.to_string(),
                };
                match key {
                    $(
                        stringify!($key) => {
                            self.$key = Some(<$ty as ConfigValue>::parse(value).ok_or_else(invalid)?);
                        }
                    )+
                    _ => {
                        return Err(SimError::UnknownConfigKey {
                            key: key.to_string(),
                        })
                    }
                }
                Ok(())
            }
        }
    };
}

solver_config! {
    /// Include dust in the radiative transfer.
    incl_dust: bool,
    /// Include molecular lines.
    incl_lines: bool,
    /// Include free-free emission.
    incl_freefree: bool,
    /// Photon packages for the thermal Monte Carlo run.
    nphot: i64,
    /// Photon packages for scattering Monte Carlo in images.
    nphot_scat: i64,
    /// Photon packages for scattering Monte Carlo in spectra.
    nphot_spec: i64,
    /// Random seed.
    iseed: i64,
    /// Fast-mode level for the thermal Monte Carlo.
    ifast: i64,
    /// Temperature convergence threshold.
    enthres: f64,
    /// Decouple the temperatures of dust species.
    itempdecoup: i64,
    /// Treat stars as spheres rather than points.
    istar_sphere: i64,
    /// Number of temperatures in the emissivity table.
    ntemp: i64,
    /// Lowest temperature of the emissivity table.
    temp0: f64,
    /// Highest temperature of the emissivity table.
    temp1: f64,
    /// Most detailed scattering mode allowed.
    scattering_mode_max: i64,
    /// Style of solver-written output files.
    rto_style: i64,
    /// Camera ray-tracing mode.
    camera_tracemode: i64,
    /// Maximum pixel refinement depth.
    camera_nrrefine: i64,
    /// Pixel refinement criterion.
    camera_refine_criterion: f64,
    /// Include stars in images.
    camera_incl_stars: bool,
    /// Pixels across a star's disk.
    camera_starsphere_nrpix: i64,
    /// Relative resolution of the central cavity of spherical grids.
    camera_spher_cavity_relres: f64,
    /// Projection used for a local observer.
    camera_localobs_projection: i64,
    /// Minimum angular resolution for local observers.
    camera_min_dangle: f64,
    /// Maximum angular resolution for local observers.
    camera_max_dangle: f64,
    /// Minimum radial resolution for local observers.
    camera_min_dr: f64,
    /// Write sub-pixel diagnostics.
    camera_diagnostics_subpix: bool,
    /// Second-order ray tracing.
    camera_secondorder: bool,
    /// Interpolate emissivity between cell corners.
    camera_interpol_jnu: bool,
    /// Weighted photon packages in the Monte Carlo.
    mc_weighted_photons: bool,
    /// Doppler-aware ray stepping.
    optimized_motion: bool,
    /// Line transfer mode.
    lines_mode: i64,
    /// Maximum Doppler shift per ray step, in units of the line width.
    lines_maxdoppler: f64,
    /// Temperatures in the partition function table.
    lines_partition_ntempint: i64,
    /// Lowest temperature of the partition function table.
    lines_partition_temp0: f64,
    /// Highest temperature of the partition function table.
    lines_partition_temp1: f64,
    /// Print level diagrams.
    lines_show_pictograms: bool,
    /// Set the gas temperature equal to the dust temperature.
    tgas_eq_tdust: bool,
    /// Modified random walk in optically thick cells.
    modified_random_walk: bool,
}

impl SolverConfig {
    /// Number of keys that are set.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no key is set.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Encode as `key = value` lines.
    pub fn encode(&self, w: &mut dyn Write) -> Result<(), SimError> {
        for (key, value) in self.entries() {
            writeln!(w, "{key} = {value}")?;
        }
        Ok(())
    }

    /// Decode `key = value` lines. Blank lines and `#` comments are skipped.
    pub fn decode(r: &mut dyn BufRead) -> Result<Self, SimError> {
        let mut config = Self::default();
        for line in r.lines() {
            let line = line?;
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(CodecError::MalformedHeader {
                    detail: format!("expected `key = value`, found {line:?}"),
                }
                .into());
            };
            config.set(key.trim(), value.trim())?;
        }
        Ok(config)
    }

    /// Write `radmc3d.inp` through the overwrite gate.
    pub fn write(&self, io: &mut IoContext) -> Result<PathBuf, SimError> {
        let mut w = io.create(files::SOLVER_CONFIG)?;
        self.encode(&mut w)?;
        w.flush()?;
        debug!(keys = self.len(), "wrote solver configuration");
        Ok(io.path(files::SOLVER_CONFIG))
    }

    /// Read `radmc3d.inp`, or `None` if it does not exist.
    pub fn read(io: &IoContext) -> Result<Option<Self>, SimError> {
        if !io.exists(files::SOLVER_CONFIG) {
            return Ok(None);
        }
        Self::decode(&mut io.open(files::SOLVER_CONFIG)?).map(Some)
    }
}
