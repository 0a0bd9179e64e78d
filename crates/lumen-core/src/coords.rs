//! Coordinate systems and point transforms.
//!
//! A [`Point`] is a triple tagged with the [`CoordinateSystem`] it is
//! expressed in. [`Coordinates`] is the array form used for grid meshes:
//! three equally long component vectors sharing one tag. Both convert to
//! any of the three systems through Cartesian space.
//!
//! Angles produced by a transform are normalized into `[0, 2π)`.

use std::f64::consts::TAU;

use crate::error::CoordError;

/// The three coordinate systems understood by the solver.
///
/// The numeric codes are those of the geometry file: the solver reserves a
/// block of one hundred codes per system, and Lumen writes the first code
/// of each block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// `(x, y, z)`.
    #[default]
    Cartesian,
    /// `(r, θ, φ)` with θ the polar angle measured from +z.
    Spherical,
    /// `(s, φ, z)` with s the distance from the z axis.
    Cylindrical,
}

impl CoordinateSystem {
    /// All registered systems, in code order.
    pub const ALL: [CoordinateSystem; 3] = [
        CoordinateSystem::Cartesian,
        CoordinateSystem::Spherical,
        CoordinateSystem::Cylindrical,
    ];

    /// Numeric code written to the geometry file.
    pub const fn code(self) -> i64 {
        match self {
            Self::Cartesian => 0,
            Self::Spherical => 100,
            Self::Cylindrical => 200,
        }
    }

    /// Resolve a numeric code read from a file.
    ///
    /// Codes `0..100` are Cartesian, `100..200` spherical and `200..300`
    /// cylindrical. Anything else is
    /// [`CoordError::UnsupportedCoordinateSystem`].
    pub fn from_code(code: i64) -> Result<Self, CoordError> {
        match code {
            0..=99 => Ok(Self::Cartesian),
            100..=199 => Ok(Self::Spherical),
            200..=299 => Ok(Self::Cylindrical),
            _ => Err(CoordError::UnsupportedCoordinateSystem { code }),
        }
    }

    /// Conventional names of the three axes, in storage order.
    pub const fn axis_names(self) -> [&'static str; 3] {
        match self {
            Self::Cartesian => ["x", "y", "z"],
            Self::Spherical => ["r", "theta", "phi"],
            Self::Cylindrical => ["s", "phi", "z"],
        }
    }
}

/// Map an angle into `[0, 2π)`.
///
/// Accepts the output range of `atan2`, i.e. `[-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = (angle + TAU) % TAU;
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Convert a triple in `system` to Cartesian `(x, y, z)`.
pub fn to_cartesian(system: CoordinateSystem, c: [f64; 3]) -> [f64; 3] {
    match system {
        CoordinateSystem::Cartesian => c,
        CoordinateSystem::Spherical => {
            let [r, theta, phi] = c;
            [
                r * theta.sin() * phi.cos(),
                r * theta.sin() * phi.sin(),
                r * theta.cos(),
            ]
        }
        CoordinateSystem::Cylindrical => {
            let [s, phi, z] = c;
            [s * phi.cos(), s * phi.sin(), z]
        }
    }
}

/// Convert a Cartesian `(x, y, z)` triple to `target`.
pub fn from_cartesian(target: CoordinateSystem, c: [f64; 3]) -> [f64; 3] {
    let [x, y, z] = c;
    match target {
        CoordinateSystem::Cartesian => c,
        CoordinateSystem::Spherical => {
            let rho = (x * x + y * y).sqrt();
            let r = (x * x + y * y + z * z).sqrt();
            [r, normalize_angle(rho.atan2(z)), normalize_angle(y.atan2(x))]
        }
        CoordinateSystem::Cylindrical => {
            let s = (x * x + y * y).sqrt();
            [s, normalize_angle(y.atan2(x)), z]
        }
    }
}

/// Convert a triple between two systems.
///
/// The identity conversion returns `c` untouched, without a round trip
/// through Cartesian space.
pub fn convert(from: CoordinateSystem, to: CoordinateSystem, c: [f64; 3]) -> [f64; 3] {
    if from == to {
        return c;
    }
    from_cartesian(to, to_cartesian(from, c))
}

/// A single point tagged with its coordinate system.
///
/// # Examples
///
/// ```
/// use lumen_core::{CoordinateSystem, Point};
///
/// let p = Point::cartesian(0.0, 1.0, 0.0);
/// let s = p.transform(CoordinateSystem::Spherical);
/// let [r, theta, phi] = s.components();
/// assert!((r - 1.0).abs() < 1e-12);
/// assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// assert!((phi - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    system: CoordinateSystem,
    components: [f64; 3],
}

impl Point {
    /// A point from raw components in `system`.
    pub const fn new(system: CoordinateSystem, components: [f64; 3]) -> Self {
        Self { system, components }
    }

    /// A Cartesian point.
    pub const fn cartesian(x: f64, y: f64, z: f64) -> Self {
        Self::new(CoordinateSystem::Cartesian, [x, y, z])
    }

    /// A spherical point.
    pub const fn spherical(r: f64, theta: f64, phi: f64) -> Self {
        Self::new(CoordinateSystem::Spherical, [r, theta, phi])
    }

    /// A cylindrical point.
    pub const fn cylindrical(s: f64, phi: f64, z: f64) -> Self {
        Self::new(CoordinateSystem::Cylindrical, [s, phi, z])
    }

    /// The system the components are expressed in.
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    /// The raw components in [`system`](Self::system).
    pub fn components(&self) -> [f64; 3] {
        self.components
    }

    /// The point as Cartesian `(x, y, z)`.
    pub fn to_cartesian(&self) -> [f64; 3] {
        to_cartesian(self.system, self.components)
    }

    /// Express the same point in `target`.
    pub fn transform(&self, target: CoordinateSystem) -> Point {
        Point::new(target, convert(self.system, target, self.components))
    }
}

impl Default for Point {
    fn default() -> Self {
        Point::cartesian(0.0, 0.0, 0.0)
    }
}

/// Dense arrays of points sharing one coordinate system.
///
/// Element `i` of `u`, `v` and `w` together form one point. Grid meshes
/// store their points flattened in column-major order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordinates {
    system: CoordinateSystem,
    u: Vec<f64>,
    v: Vec<f64>,
    w: Vec<f64>,
}

impl Coordinates {
    /// Build from three component arrays of equal length.
    pub fn new(
        system: CoordinateSystem,
        u: Vec<f64>,
        v: Vec<f64>,
        w: Vec<f64>,
    ) -> Result<Self, CoordError> {
        for other in [&v, &w] {
            if other.len() != u.len() {
                return Err(CoordError::LengthMismatch {
                    expected: u.len(),
                    found: other.len(),
                });
            }
        }
        Ok(Self { system, u, v, w })
    }

    /// Collect a sequence of points, converting each into `system`.
    pub fn from_points<I>(system: CoordinateSystem, points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let mut out = Self {
            system,
            ..Self::default()
        };
        for p in points {
            let [a, b, c] = p.transform(system).components();
            out.u.push(a);
            out.v.push(b);
            out.w.push(c);
        }
        out
    }

    /// The system every point is expressed in.
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.u.len()
    }

    /// `true` when there are no points.
    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// First components.
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// Second components.
    pub fn v(&self) -> &[f64] {
        &self.v
    }

    /// Third components.
    pub fn w(&self) -> &[f64] {
        &self.w
    }

    /// The `i`-th point, or `None` past the end.
    pub fn point(&self, i: usize) -> Option<Point> {
        Some(Point::new(
            self.system,
            [*self.u.get(i)?, *self.v.get(i)?, *self.w.get(i)?],
        ))
    }

    /// Iterate over all points in storage order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.len()).map(move |i| Point::new(self.system, [self.u[i], self.v[i], self.w[i]]))
    }

    /// Express every point in `target`.
    pub fn transform(&self, target: CoordinateSystem) -> Coordinates {
        if target == self.system {
            return self.clone();
        }
        let n = self.len();
        let mut out = Coordinates {
            system: target,
            u: Vec::with_capacity(n),
            v: Vec::with_capacity(n),
            w: Vec::with_capacity(n),
        };
        for i in 0..n {
            let [a, b, c] = convert(self.system, target, [self.u[i], self.v[i], self.w[i]]);
            out.u.push(a);
            out.v.push(b);
            out.w.push(c);
        }
        out
    }
}
