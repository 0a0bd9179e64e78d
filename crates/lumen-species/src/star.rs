//! Stellar sources and `stars.inp`.
//!
//! ```text
//! 2
//! <nstars>\t<nlam>
//! <radius>\t<mass>\t<u>\t<v>\t<w>        one line per star
//! <wavelength>                            nlam lines
//! <-Teff> | <flux, nlam lines>            per star
//! ```
//!
//! A negative first spectrum value tells the solver to use a blackbody of
//! that temperature instead of a flux table.

use std::io::{BufRead, Write};

use lumen_codec::codec::{format_value, AsciiTokens};
use lumen_codec::{files, CodecError, IoContext};
use lumen_core::{CoordinateSystem, Point};
use tracing::debug;

use crate::error::SpeciesError;
use crate::map::SpeciesMap;

/// Format version of `stars.inp`.
pub const STARS_FORMAT: i64 = 2;

/// A point source.
#[derive(Clone, Debug, PartialEq)]
pub enum Star {
    /// Blackbody emitter of the given effective temperature.
    Blackbody {
        /// Position, in any coordinate system.
        center: Point,
        /// Radius in cm.
        radius: f64,
        /// Mass in g.
        mass: f64,
        /// Effective temperature in K.
        temperature: f64,
    },
    /// Explicit flux table, one value per wavelength.
    Spectrum {
        /// Position, in any coordinate system.
        center: Point,
        /// Radius in cm.
        radius: f64,
        /// Mass in g.
        mass: f64,
        /// Flux in erg/s/cm²/Hz at 1 pc, one per wavelength.
        flux: Vec<f64>,
    },
}

impl Star {
    /// A blackbody star.
    pub fn blackbody(center: Point, radius: f64, mass: f64, temperature: f64) -> Self {
        Self::Blackbody {
            center,
            radius,
            mass,
            temperature,
        }
    }

    /// A star with an explicit flux table.
    pub fn spectrum(center: Point, radius: f64, mass: f64, flux: Vec<f64>) -> Self {
        Self::Spectrum {
            center,
            radius,
            mass,
            flux,
        }
    }

    /// Position.
    pub fn center(&self) -> Point {
        match self {
            Self::Blackbody { center, .. } | Self::Spectrum { center, .. } => *center,
        }
    }

    /// Radius in cm.
    pub fn radius(&self) -> f64 {
        match self {
            Self::Blackbody { radius, .. } | Self::Spectrum { radius, .. } => *radius,
        }
    }

    /// Mass in g.
    pub fn mass(&self) -> f64 {
        match self {
            Self::Blackbody { mass, .. } | Self::Spectrum { mass, .. } => *mass,
        }
    }

    /// Spectrum values as written after the wavelength grid.
    fn spectrum_values(&self) -> Vec<f64> {
        match self {
            Self::Blackbody { temperature, .. } => vec![-temperature],
            Self::Spectrum { flux, .. } => flux.clone(),
        }
    }
}

/// Named stars in file order.
pub type StarContainer = SpeciesMap<Star>;

/// Encode `stars.inp`, expressing each center in `system`.
pub fn encode_stars(
    w: &mut dyn Write,
    stars: &StarContainer,
    wavelengths: &[f64],
    system: CoordinateSystem,
) -> Result<(), SpeciesError> {
    for (name, star) in stars {
        match star {
            Star::Spectrum { flux, .. } if flux.len() != wavelengths.len() => {
                return Err(SpeciesError::SpectrumLengthMismatch {
                    star: name.clone(),
                    expected: wavelengths.len(),
                    found: flux.len(),
                });
            }
            // The sign carries the blackbody marker, so zero cannot be written.
            Star::Blackbody { temperature, .. } if !(*temperature > 0.0) => {
                return Err(SpeciesError::InvalidTemperature {
                    star: name.clone(),
                    temperature: *temperature,
                });
            }
            _ => {}
        }
    }

    writeln!(w, "{STARS_FORMAT}").map_err(CodecError::from)?;
    writeln!(w, "{}\t{}", stars.len(), wavelengths.len()).map_err(CodecError::from)?;
    for (_, star) in stars {
        let [u, v, x] = star.center().transform(system).components();
        let line = [star.radius(), star.mass(), u, v, x].map(format_value).join("\t");
        writeln!(w, "{line}").map_err(CodecError::from)?;
    }
    for &l in wavelengths {
        writeln!(w, "{}", format_value(l)).map_err(CodecError::from)?;
    }
    for (_, star) in stars {
        for value in star.spectrum_values() {
            writeln!(w, "{}", format_value(value)).map_err(CodecError::from)?;
        }
    }
    Ok(())
}

/// Decoded contents of `stars.inp`.
#[derive(Clone, Debug, PartialEq)]
pub struct StarsFile {
    /// Wavelength grid in microns.
    pub wavelengths: Vec<f64>,
    /// Stars in file order, centers tagged with the system given to
    /// [`decode_stars`].
    pub stars: Vec<Star>,
}

fn count(value: i64, what: &str) -> Result<usize, CodecError> {
    usize::try_from(value).map_err(|_| CodecError::MalformedHeader {
        detail: format!("negative {what} {value}"),
    })
}

/// Decode `stars.inp`. Centers are taken to be in `system`.
///
/// A spectrum whose first value carries a minus sign is a blackbody and
/// occupies a single value.
pub fn decode_stars(r: &mut dyn BufRead, system: CoordinateSystem) -> Result<StarsFile, CodecError> {
    let mut t = AsciiTokens::new(r);
    let format = t.next_int()?;
    if format != STARS_FORMAT {
        return Err(CodecError::UnrecognizedFormat { found: format });
    }
    let nstars = count(t.next_int()?, "star count")?;
    let nlam = count(t.next_int()?, "wavelength count")?;
    let mut params = Vec::new();
    for _ in 0..nstars {
        let v = t.next_values(5)?;
        params.push(v);
    }
    let wavelengths = t.next_values(nlam)?;
    let mut stars = Vec::with_capacity(params.len());
    for p in params {
        let center = Point::new(system, [p[2], p[3], p[4]]);
        let first = t.next_values(1)?[0];
        let star = if first.is_sign_negative() {
            Star::blackbody(center, p[0], p[1], -first)
        } else {
            let mut flux = vec![first];
            flux.extend(t.next_values(nlam.saturating_sub(1))?);
            Star::spectrum(center, p[0], p[1], flux)
        };
        stars.push(star);
    }
    Ok(StarsFile { wavelengths, stars })
}

/// Write `stars.inp` for a grid in `system`.
pub fn write_stars(
    io: &mut IoContext,
    stars: &StarContainer,
    wavelengths: &[f64],
    system: CoordinateSystem,
) -> Result<(), SpeciesError> {
    let mut w = io.create(files::STARS)?;
    encode_stars(&mut w, stars, wavelengths, system)?;
    w.flush().map_err(CodecError::from)?;
    debug!(stars = stars.len(), wavelengths = wavelengths.len(), "wrote stars");
    Ok(())
}

/// Read `stars.inp`, or `None` if it does not exist.
pub fn read_stars(io: &IoContext, system: CoordinateSystem) -> Result<Option<StarsFile>, CodecError> {
    if !io.exists(files::STARS) {
        return Ok(None);
    }
    decode_stars(&mut io.open(files::STARS)?, system).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sun() -> Star {
        Star::blackbody(Point::cartesian(0.0, 0.0, 0.0), 6.9551e10, 1.9885e33, 5780.0)
    }

    #[test]
    fn blackbody_writes_negative_temperature() {
        let mut stars = StarContainer::new();
        stars.insert("sun", sun());
        let mut buf = Vec::new();
        encode_stars(&mut buf, &stars, &[0.1, 1.0], CoordinateSystem::Cartesian).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "1\t2");
        assert_eq!(lines[2].split('\t').count(), 5);
        assert_eq!(lines.last().copied(), Some("-5.78e3"));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn short_flux_table_rejected() {
        let mut stars = StarContainer::new();
        stars.insert("a", Star::spectrum(Point::default(), 1.0, 1.0, vec![1.0]));
        let err = encode_stars(&mut Vec::new(), &stars, &[1.0, 2.0], CoordinateSystem::Cartesian)
            .unwrap_err();
        assert!(matches!(
            err,
            SpeciesError::SpectrumLengthMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn center_expressed_in_grid_system() {
        let mut stars = StarContainer::new();
        stars.insert(
            "s",
            Star::blackbody(Point::cartesian(0.0, 2.0, 0.0), 1.0, 1.0, 100.0),
        );
        let mut buf = Vec::new();
        encode_stars(&mut buf, &stars, &[1.0], CoordinateSystem::Spherical).unwrap();
        let back = decode_stars(&mut buf.as_slice(), CoordinateSystem::Spherical).unwrap();
        let [r, theta, phi] = back.stars[0].center().components();
        assert!((r - 2.0).abs() < 1e-12);
        assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((phi - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn non_positive_temperature_rejected() {
        for temperature in [0.0, -10.0, f64::NAN] {
            let mut stars = StarContainer::new();
            stars.insert("cold", Star::blackbody(Point::default(), 1.0, 1.0, temperature));
            stars.insert("warm", Star::blackbody(Point::default(), 1.0, 1.0, 5000.0));
            let err = encode_stars(&mut Vec::new(), &stars, &[1.0, 2.0, 3.0], CoordinateSystem::Cartesian)
                .unwrap_err();
            assert!(matches!(err, SpeciesError::InvalidTemperature { ref star, .. } if star == "cold"));
        }
    }

    #[test]
    fn negative_zero_marks_a_blackbody() {
        let text = "2\n2\t3\n1 1 0 0 0\n1 1 0 0 0\n0.5\n1\n2\n-0e0\n-5e3\n";
        let back = decode_stars(&mut text.as_bytes(), CoordinateSystem::Cartesian).unwrap();
        assert_eq!(back.stars.len(), 2);
        assert!(matches!(back.stars[0], Star::Blackbody { temperature, .. } if temperature == 0.0));
        assert!(matches!(back.stars[1], Star::Blackbody { temperature, .. } if temperature == 5000.0));
    }

    #[test]
    fn oversized_counts_report_short_body() {
        let text = "2\n2305843009213693951\t2305843009213693951\n1 1 0 0 0\n";
        assert!(matches!(
            decode_stars(&mut text.as_bytes(), CoordinateSystem::Cartesian),
            Err(CodecError::BodyLengthMismatch { .. })
        ));
    }

    #[test]
    fn mixed_stars_decode() {
        let mut stars = StarContainer::new();
        stars.insert("bb", sun());
        stars.insert(
            "table",
            Star::spectrum(Point::cartesian(1.0, 0.0, 0.0), 2.0, 3.0, vec![4.0, 5.0, 6.0]),
        );
        let lam = [0.5, 1.0, 2.0];
        let mut buf = Vec::new();
        encode_stars(&mut buf, &stars, &lam, CoordinateSystem::Cartesian).unwrap();
        let back = decode_stars(&mut buf.as_slice(), CoordinateSystem::Cartesian).unwrap();
        assert_eq!(back.wavelengths, lam.to_vec());
        assert_eq!(back.stars[0], sun());
        assert_eq!(back.stars[1], stars.get("table").unwrap().clone());
    }
}
