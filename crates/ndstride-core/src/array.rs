//! Abstract array type that backends implement

use crate::dtype::DType;
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};

/// Layout of an array over its element buffer (backend-agnostic).
///
/// `strides` and `offset` are measured in elements, not bytes. Strides may be
/// zero (broadcast / inserted axes) or negative (reversed slices).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayMeta {
    pub shape: Vec<usize>,
    pub dtype: DType,
    pub strides: Vec<isize>,
    pub offset: usize,
}

impl ArrayMeta {
    /// Row-major layout for a freshly allocated buffer.
    pub fn new(shape: Vec<usize>, dtype: DType) -> Self {
        let strides = Self::compute_strides(&shape);
        Self {
            shape,
            dtype,
            strides,
            offset: 0,
        }
    }

    pub fn with_layout(shape: Vec<usize>, strides: Vec<isize>, offset: usize, dtype: DType) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            shape,
            dtype,
            strides,
            offset,
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn nbytes(&self) -> usize {
        self.size() * self.dtype.size()
    }

    /// Strides in bytes, as reported by NumPy.
    pub fn byte_strides(&self) -> Vec<isize> {
        let item = self.dtype.size() as isize;
        self.strides.iter().map(|&s| s * item).collect()
    }

    /// Row-major (C order) element strides for `shape`.
    pub fn compute_strides(shape: &[usize]) -> Vec<isize> {
        let mut strides = vec![1isize; shape.len()];
        for i in (0..shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * shape[i + 1] as isize;
        }
        strides
    }

    /// Whether elements are laid out back-to-back in row-major order
    /// starting at `offset`. Axes of length 1 are ignored.
    pub fn is_contiguous(&self) -> bool {
        if self.size() == 0 {
            return true;
        }
        let mut expected = 1isize;
        for (&len, &stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            if len != 1 && stride != expected {
                return false;
            }
            expected *= len as isize;
        }
        true
    }

    /// Buffer offset of the element at `index`. The index must be in bounds.
    pub fn offset_of(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.ndim());
        let delta: isize = index
            .iter()
            .zip(self.strides.iter())
            .map(|(&i, &s)| i as isize * s)
            .sum();
        (self.offset as isize + delta) as usize
    }

    /// Buffer offsets of every element in row-major order.
    pub fn offsets(&self) -> Offsets {
        Offsets::new(&self.shape, &self.strides, self.offset)
    }
}

/// Row-major walk over the buffer offsets of a strided layout.
#[derive(Debug, Clone)]
pub struct Offsets {
    shape: Vec<usize>,
    strides: Vec<isize>,
    index: Vec<usize>,
    current: isize,
    remaining: usize,
}

impl Offsets {
    pub fn new(shape: &[usize], strides: &[isize], offset: usize) -> Self {
        Self {
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            index: vec![0; shape.len()],
            current: offset as isize,
            remaining: shape.iter().product(),
        }
    }
}

impl Iterator for Offsets {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.current as usize;
        self.remaining -= 1;

        if self.remaining > 0 {
            // Odometer: bump the last axis, carrying into earlier ones.
            for d in (0..self.shape.len()).rev() {
                self.index[d] += 1;
                self.current += self.strides[d];
                if self.index[d] < self.shape[d] {
                    break;
                }
                self.current -= self.strides[d] * self.shape[d] as isize;
                self.index[d] = 0;
            }
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets {}

/// Every multi-dimensional index of `shape` in row-major order.
pub fn ndindex(shape: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    let total: usize = shape.iter().product();
    let mut index = vec![0usize; shape.len()];
    (0..total).map(move |step| {
        if step > 0 {
            for d in (0..shape.len()).rev() {
                index[d] += 1;
                if index[d] < shape[d] {
                    break;
                }
                index[d] = 0;
            }
        }
        index.clone()
    })
}

/// Core array trait that all backends implement
///
/// This trait defines the abstract interface for N-dimensional arrays.
/// Element order in every method is logical row-major order, regardless of
/// the underlying strides.
pub trait Array: Clone + std::fmt::Debug {
    /// Get array metadata
    fn meta(&self) -> &ArrayMeta;

    /// Get shape
    fn shape(&self) -> &[usize] {
        &self.meta().shape
    }

    /// Get number of dimensions
    fn ndim(&self) -> usize {
        self.meta().ndim()
    }

    /// Get total number of elements
    fn size(&self) -> usize {
        self.meta().size()
    }

    /// Get data type
    fn dtype(&self) -> DType {
        self.meta().dtype
    }

    /// Element strides
    fn strides(&self) -> &[isize] {
        &self.meta().strides
    }

    /// All elements as values, in row-major order
    fn to_vec(&self) -> Vec<Scalar>;

    /// All elements as f64 (for testing/comparison); non-numeric values
    /// read as NaN
    fn as_f64_vec(&self) -> Vec<f64>;

    /// Create a `Float64` array from data and shape
    fn from_f64_vec(data: Vec<f64>, shape: Vec<usize>) -> crate::Result<Self>
    where
        Self: Sized;

    /// Get element at row-major position `index`
    fn get_flat(&self, index: usize) -> Option<Scalar>;

    /// Set element at row-major position `index`, writing through any view
    fn set_flat(&self, index: usize, value: Scalar) -> crate::Result<()>;
}
