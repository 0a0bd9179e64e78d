//! Regular three-axis grid and its derived meshes.

use std::fmt;

use lumen_core::{CoordinateSystem, Coordinates, Point};

use crate::error::GridError;
use crate::style::GridStyle;

/// One of the three grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First axis (x, r or s).
    U,
    /// Second axis (y, theta or phi).
    V,
    /// Third axis (z or phi).
    W,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::U, Axis::V, Axis::W];

    /// Position of this axis in `[u, v, w]`.
    pub const fn index(self) -> usize {
        match self {
            Self::U => 0,
            Self::V => 1,
            Self::W => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U => "u",
            Self::V => "v",
            Self::W => "w",
        };
        f.write_str(name)
    }
}

fn check_edges(axis: Axis, edges: &[f64]) -> Result<(), GridError> {
    let invalid = |reason: String| GridError::InvalidAxis { axis, reason };
    if edges.len() < 2 {
        return Err(invalid(format!(
            "{} edges given, at least 2 required",
            edges.len()
        )));
    }
    if let Some(i) = edges.iter().position(|e| !e.is_finite()) {
        return Err(invalid(format!("edge {i} is not finite")));
    }
    if let Some(i) = edges.windows(2).position(|p| p[1] <= p[0]) {
        return Err(invalid(format!(
            "edges not strictly increasing at index {}",
            i + 1
        )));
    }
    Ok(())
}

fn midpoints(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|p| 0.5 * (p[0] + p[1])).collect()
}

/// Outer product of three axes, first axis fastest.
fn mesh(system: CoordinateSystem, u: &[f64], v: &[f64], w: &[f64]) -> Coordinates {
    let points = w.iter().flat_map(|&c| {
        v.iter()
            .flat_map(move |&b| u.iter().map(move |&a| Point::new(system, [a, b, c])))
    });
    Coordinates::from_points(system, points)
}

/// A regular grid over three strictly increasing edge arrays.
///
/// Point coordinates (cell corners) and cell coordinates (cell midpoints)
/// are derived from the edges and kept current: every mutation of an axis
/// or of the coordinate system recomputes both meshes before returning.
/// Meshes are flattened column-major, `u` fastest.
///
/// # Examples
///
/// ```
/// use lumen_core::CoordinateSystem;
/// use lumen_grid::Grid;
///
/// let grid = Grid::new(
///     CoordinateSystem::Cartesian,
///     &[0.0, 1.0, 2.0],
///     &[0.0, 1.0],
///     &[0.0, 1.0],
/// )
/// .unwrap();
/// assert_eq!(grid.shape(), [2, 1, 1]);
/// assert_eq!(grid.nrcells(), 2);
/// assert_eq!(grid.cells().u(), &[0.5, 1.5]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    system: CoordinateSystem,
    style: GridStyle,
    edges: [Vec<f64>; 3],
    included: [bool; 3],
    points: Coordinates,
    cells: Coordinates,
}

impl Grid {
    /// Build a regular grid, copying the three edge arrays.
    pub fn new(
        system: CoordinateSystem,
        u: &[f64],
        v: &[f64],
        w: &[f64],
    ) -> Result<Self, GridError> {
        for (axis, edges) in Axis::ALL.into_iter().zip([u, v, w]) {
            check_edges(axis, edges)?;
        }
        let mut grid = Self {
            system,
            style: GridStyle::Regular,
            edges: [u.to_vec(), v.to_vec(), w.to_vec()],
            included: [true; 3],
            points: Coordinates::default(),
            cells: Coordinates::default(),
        };
        grid.recompute_coordinates();
        Ok(grid)
    }

    /// Coordinate system of the edges and both meshes.
    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.system
    }

    /// Switch the coordinate system the edges are interpreted in.
    ///
    /// The edge values are kept as they are; only their meaning changes.
    pub fn set_coordinate_system(&mut self, system: CoordinateSystem) {
        self.system = system;
        self.recompute_coordinates();
    }

    /// Grid style.
    pub fn style(&self) -> GridStyle {
        self.style
    }

    /// Set the grid style. Reserved styles make [`write`](Self::write)
    /// fail with [`GridError::UnsupportedGridStyle`].
    pub fn set_style(&mut self, style: GridStyle) {
        self.style = style;
    }

    /// Edge array of `axis`.
    pub fn edges(&self, axis: Axis) -> &[f64] {
        &self.edges[axis.index()]
    }

    /// Replace the edges of `axis` with a copy of `edges`.
    ///
    /// On error the grid is left unchanged.
    pub fn set_axis(&mut self, axis: Axis, edges: &[f64]) -> Result<(), GridError> {
        check_edges(axis, edges)?;
        self.edges[axis.index()] = edges.to_vec();
        self.recompute_coordinates();
        Ok(())
    }

    /// Inclusion flags of the three axes as stored in the geometry header.
    pub fn included(&self) -> [bool; 3] {
        self.included
    }

    pub(crate) fn set_included(&mut self, included: [bool; 3]) {
        self.included = included;
    }

    /// Cells along `axis`.
    pub fn n(&self, axis: Axis) -> usize {
        self.edges[axis.index()].len() - 1
    }

    /// `[nu, nv, nw]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.n(Axis::U), self.n(Axis::V), self.n(Axis::W)]
    }

    /// Total number of cells, `nu * nv * nw`.
    pub fn nrcells(&self) -> usize {
        self.shape().iter().product()
    }

    /// Number of cell corners, `(nu+1)(nv+1)(nw+1)`.
    pub fn nrpoints(&self) -> usize {
        self.edges.iter().map(Vec::len).product()
    }

    /// Corner coordinates, column-major over `(nu+1, nv+1, nw+1)`.
    pub fn points(&self) -> &Coordinates {
        &self.points
    }

    /// Cell-midpoint coordinates, column-major over `(nu, nv, nw)`.
    pub fn cells(&self) -> &Coordinates {
        &self.cells
    }

    /// Rebuild the point and cell meshes from the current edges.
    pub fn recompute_coordinates(&mut self) {
        let [u, v, w] = &self.edges;
        self.points = mesh(self.system, u, v, w);
        self.cells = mesh(self.system, &midpoints(u), &midpoints(v), &midpoints(w));
    }
}

impl Default for Grid {
    /// One Cartesian cell spanning `[0, 1]` on every axis.
    fn default() -> Self {
        let unit = vec![0.0, 1.0];
        let mut grid = Self {
            system: CoordinateSystem::Cartesian,
            style: GridStyle::Regular,
            edges: [unit.clone(), unit.clone(), unit],
            included: [true; 3],
            points: Coordinates::default(),
            cells: Coordinates::default(),
        };
        grid.recompute_coordinates();
        grid
    }
}
