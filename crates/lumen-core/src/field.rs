//! Column-major cell arrays.

use smallvec::SmallVec;

use crate::error::ShapeError;

/// Array dimensions. Cell fields use three, vector fields four.
pub type Dims = SmallVec<[usize; 4]>;

/// An n-dimensional `f64` array stored in column-major (Fortran) order.
///
/// The first axis varies fastest, matching the on-disk layout of every
/// solver field file. Scalar cell fields have dims `[nu, nv, nw]`; vector
/// fields carry a leading component axis, `[3, nu, nv, nw]`, so the three
/// components of one cell are adjacent.
///
/// # Examples
///
/// ```
/// use lumen_core::FieldArray;
///
/// let a = FieldArray::from_vec(&[2, 3], (0..6).map(f64::from).collect()).unwrap();
/// assert_eq!(a.get(&[1, 0]), Some(1.0));
/// assert_eq!(a.get(&[0, 1]), Some(2.0));
/// assert_eq!(a.get(&[2, 0]), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    dims: Dims,
    data: Vec<f64>,
}

impl FieldArray {
    /// A zero-filled array.
    pub fn zeros(dims: &[usize]) -> Self {
        Self {
            dims: dims.iter().copied().collect(),
            data: vec![0.0; dims.iter().product()],
        }
    }

    /// Wrap column-major `data` with the given dims.
    pub fn from_vec(dims: &[usize], data: Vec<f64>) -> Result<Self, ShapeError> {
        let expected: usize = dims.iter().product();
        if data.len() != expected {
            return Err(ShapeError::LengthMismatch {
                dims: dims.to_vec(),
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            dims: dims.iter().copied().collect(),
            data,
        })
    }

    /// Array dimensions.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when any dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values in column-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable values in column-major order.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume into the flat column-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Flat offset of a multi-index, or `None` when out of bounds.
    pub fn linear_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        let mut stride = 1;
        for (&i, &n) in index.iter().zip(self.dims.iter()) {
            if i >= n {
                return None;
            }
            offset += i * stride;
            stride *= n;
        }
        Some(offset)
    }

    /// Value at a multi-index.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.linear_index(index).map(|i| self.data[i])
    }

    /// Same values under new dims with the same element count.
    pub fn reshape(self, dims: &[usize]) -> Result<Self, ShapeError> {
        Self::from_vec(dims, self.data)
    }

    /// Extract component `c` of a field with a leading component axis.
    ///
    /// Returns `None` for arrays with fewer than two dims or when `c` is
    /// out of range.
    pub fn component(&self, c: usize) -> Option<FieldArray> {
        let (&ncomp, rest) = self.dims.split_first()?;
        if rest.is_empty() || c >= ncomp {
            return None;
        }
        let data = self.data.iter().skip(c).step_by(ncomp).copied().collect();
        Some(FieldArray {
            dims: rest.iter().copied().collect(),
            data,
        })
    }
}
