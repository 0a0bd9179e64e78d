//! Vector quantities anchored at a point.
//!
//! Local basis vectors of curvilinear systems depend on position, so every
//! vector carries the point it lives at. Rotations use the polar and
//! azimuthal angles of that anchor, never of the vector itself.

use crate::coords::{CoordinateSystem, Coordinates, Point};
use crate::error::CoordError;

/// Polar and azimuthal angle of an anchor, as `(θ, φ)`.
fn anchor_angles(anchor: &Point) -> (f64, f64) {
    let [_, theta, phi] = anchor.transform(CoordinateSystem::Spherical).components();
    (theta, phi)
}

/// Rotate Cartesian components into the local basis of `target` at `(θ, φ)`.
fn rotate_from_cartesian(target: CoordinateSystem, v: [f64; 3], theta: f64, phi: f64) -> [f64; 3] {
    let [vx, vy, vz] = v;
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    match target {
        CoordinateSystem::Cartesian => v,
        CoordinateSystem::Spherical => [
            vx * st * cp + vy * st * sp + vz * ct,
            vx * ct * cp + vy * ct * sp - vz * st,
            -vx * sp + vy * cp,
        ],
        CoordinateSystem::Cylindrical => [vx * cp + vy * sp, -vx * sp + vy * cp, vz],
    }
}

/// Transposed rotation: local components of `source` back to Cartesian.
fn rotate_to_cartesian(source: CoordinateSystem, v: [f64; 3], theta: f64, phi: f64) -> [f64; 3] {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    match source {
        CoordinateSystem::Cartesian => v,
        CoordinateSystem::Spherical => {
            let [vr, vt, vp] = v;
            [
                vr * st * cp + vt * ct * cp - vp * sp,
                vr * st * sp + vt * ct * sp + vp * cp,
                vr * ct - vt * st,
            ]
        }
        CoordinateSystem::Cylindrical => {
            let [vs, vp, vz] = v;
            [vs * cp - vp * sp, vs * sp + vp * cp, vz]
        }
    }
}

fn rotate(
    from: CoordinateSystem,
    to: CoordinateSystem,
    v: [f64; 3],
    anchor: &Point,
) -> [f64; 3] {
    if from == to {
        return v;
    }
    let (theta, phi) = anchor_angles(anchor);
    rotate_from_cartesian(to, rotate_to_cartesian(from, v, theta, phi), theta, phi)
}

/// One vector sample: components in `basis`, anchored at a point.
///
/// # Examples
///
/// ```
/// use lumen_core::{CoordinateSystem, Point, VectorSample};
///
/// // A unit vector along +x, sitting on the +x axis, is purely radial.
/// let v = VectorSample::new(Point::cartesian(2.0, 0.0, 0.0), CoordinateSystem::Cartesian, [1.0, 0.0, 0.0]);
/// let [vr, vt, vp] = v.transform(CoordinateSystem::Spherical).components();
/// assert!((vr - 1.0).abs() < 1e-12);
/// assert!(vt.abs() < 1e-12 && vp.abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorSample {
    anchor: Point,
    basis: CoordinateSystem,
    components: [f64; 3],
}

impl VectorSample {
    /// Build a sample from components in `basis` at `anchor`.
    pub const fn new(anchor: Point, basis: CoordinateSystem, components: [f64; 3]) -> Self {
        Self {
            anchor,
            basis,
            components,
        }
    }

    /// The point the vector is attached to.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// The basis the components are expressed in.
    pub fn basis(&self) -> CoordinateSystem {
        self.basis
    }

    /// Raw components in [`basis`](Self::basis).
    pub fn components(&self) -> [f64; 3] {
        self.components
    }

    /// Re-express the components in the local basis of `target`.
    pub fn transform(&self, target: CoordinateSystem) -> VectorSample {
        VectorSample {
            anchor: self.anchor,
            basis: target,
            components: rotate(self.basis, target, self.components, &self.anchor),
        }
    }
}

/// A vector per point of a [`Coordinates`] array.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorField {
    anchors: Coordinates,
    basis: CoordinateSystem,
    components: [Vec<f64>; 3],
}

impl VectorField {
    /// Build from one component array per axis, each as long as `anchors`.
    pub fn new(
        anchors: Coordinates,
        basis: CoordinateSystem,
        components: [Vec<f64>; 3],
    ) -> Result<Self, CoordError> {
        for c in &components {
            if c.len() != anchors.len() {
                return Err(CoordError::LengthMismatch {
                    expected: anchors.len(),
                    found: c.len(),
                });
            }
        }
        Ok(Self {
            anchors,
            basis,
            components,
        })
    }

    /// Evaluate a Cartesian vector function at every anchor.
    pub fn from_fn<F>(anchors: Coordinates, mut f: F) -> Self
    where
        F: FnMut(Point) -> [f64; 3],
    {
        let n = anchors.len();
        let mut components = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];
        for p in anchors.iter() {
            let v = f(p);
            for (dst, x) in components.iter_mut().zip(v) {
                dst.push(x);
            }
        }
        Self {
            anchors,
            basis: CoordinateSystem::Cartesian,
            components,
        }
    }

    /// Anchor points.
    pub fn anchors(&self) -> &Coordinates {
        &self.anchors
    }

    /// Basis of the stored components.
    pub fn basis(&self) -> CoordinateSystem {
        self.basis
    }

    /// Component array `axis` (0, 1 or 2).
    pub fn component(&self, axis: usize) -> Option<&[f64]> {
        self.components.get(axis).map(Vec::as_slice)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// `true` when the field has no samples.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// The `i`-th sample.
    pub fn sample(&self, i: usize) -> Option<VectorSample> {
        let anchor = self.anchors.point(i)?;
        Some(VectorSample::new(
            anchor,
            self.basis,
            [
                self.components[0][i],
                self.components[1][i],
                self.components[2][i],
            ],
        ))
    }

    /// Rotate every sample into `target`.
    pub fn transform(&self, target: CoordinateSystem) -> VectorField {
        if target == self.basis {
            return self.clone();
        }
        let n = self.len();
        let mut components = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];
        for (i, anchor) in self.anchors.iter().enumerate() {
            let v = [
                self.components[0][i],
                self.components[1][i],
                self.components[2][i],
            ];
            let out = rotate(self.basis, target, v, &anchor);
            for (dst, x) in components.iter_mut().zip(out) {
                dst.push(x);
            }
        }
        VectorField {
            anchors: self.anchors.clone(),
            basis: target,
            components,
        }
    }

    /// Consume into the three component arrays.
    pub fn into_components(self) -> [Vec<f64>; 3] {
        self.components
    }
}
