//! CPU array: a strided view over a shared typed buffer

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::trace;
use ndarray::{ArrayD, IxDyn};
use ndstride_core::{Array, ArrayMeta, NdError, Result, Scalar};

use crate::storage::Buffer;

/// CPU-backed N-dimensional array
///
/// `Clone` produces another handle to the same buffer with the same layout;
/// use `ManipulationOps::copy` for an independent array. Views record the
/// layout of the array that owns the buffer in `base`.
///
/// Handles are `!Send`; callers must serialize mutation of a buffer across
/// the owner and every view of it.
#[derive(Debug, Clone)]
pub struct CpuArray {
    data: Rc<RefCell<Buffer>>,
    meta: ArrayMeta,
    base: Option<Rc<ArrayMeta>>,
}

impl CpuArray {
    /// Take ownership of a freshly built buffer laid out row-major.
    pub(crate) fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Self {
        debug_assert_eq!(buffer.len(), shape.iter().product::<usize>());
        trace!(
            "allocating {} buffer of {} elements for shape {:?}",
            buffer.dtype(),
            buffer.len(),
            shape
        );
        let meta = ArrayMeta::new(shape, buffer.dtype());
        Self {
            data: Rc::new(RefCell::new(buffer)),
            meta,
            base: None,
        }
    }

    /// New view over the same buffer. The base always points at the root
    /// owner, never at an intermediate view.
    pub(crate) fn view(&self, shape: Vec<usize>, strides: Vec<isize>, offset: usize) -> Self {
        trace!(
            "view shape {:?} strides {:?} offset {} over {:?}",
            shape,
            strides,
            offset,
            self.meta.shape
        );
        let base = match &self.base {
            Some(base) => Rc::clone(base),
            None => Rc::new(self.meta.clone()),
        };
        Self {
            data: Rc::clone(&self.data),
            meta: ArrayMeta::with_layout(shape, strides, offset, self.meta.dtype),
            base: Some(base),
        }
    }

    pub(crate) fn buffer(&self) -> Ref<'_, Buffer> {
        self.data.borrow()
    }

    pub(crate) fn buffer_mut(&self) -> RefMut<'_, Buffer> {
        self.data.borrow_mut()
    }

    /// Elements in row-major order packed into a new buffer.
    pub(crate) fn gather(&self) -> Buffer {
        self.buffer().gather(self.meta.offsets())
    }

    pub(crate) fn f64_values(&self) -> Vec<f64> {
        let buffer = self.buffer();
        self.meta.offsets().map(|o| buffer.get_f64(o)).collect()
    }

    pub(crate) fn i64_values(&self) -> Vec<i64> {
        let buffer = self.buffer();
        self.meta.offsets().map(|o| buffer.get_i64(o)).collect()
    }

    /// Whether this array borrows its buffer from another array
    pub fn is_view(&self) -> bool {
        self.base.is_some()
    }

    /// Handle to the array owning the buffer, `None` for owners
    pub fn base(&self) -> Option<CpuArray> {
        self.base.as_ref().map(|meta| Self {
            data: Rc::clone(&self.data),
            meta: (**meta).clone(),
            base: None,
        })
    }

    /// Whether both arrays read and write the same buffer
    pub fn shares_memory(&self, other: &CpuArray) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Element offset of the first element within the buffer
    pub fn offset(&self) -> usize {
        self.meta.offset
    }

    pub fn byte_strides(&self) -> Vec<isize> {
        self.meta.byte_strides()
    }

    pub fn is_contiguous(&self) -> bool {
        self.meta.is_contiguous()
    }

    pub fn nbytes(&self) -> usize {
        self.meta.nbytes()
    }

    /// Create an owning `Float64` array from ndarray
    pub fn from_ndarray(data: ArrayD<f64>) -> Self {
        let shape = data.shape().to_vec();
        let values: Vec<f64> = data.iter().cloned().collect();
        Self::from_buffer(Buffer::Float64(values), shape)
    }

    /// Copy into an ndarray (numeric dtypes only)
    pub fn to_ndarray(&self) -> Result<ArrayD<f64>> {
        if !self.dtype().is_numeric() {
            return Err(NdError::UnsupportedDType {
                op: "to_ndarray",
                dtype: self.dtype(),
            });
        }
        ArrayD::from_shape_vec(IxDyn(self.shape()), self.f64_values())
            .map_err(|e| NdError::InvalidShape(e.to_string()))
    }

    /// Buffer offset of the element at row-major position `index`
    fn flat_offset(&self, index: usize) -> usize {
        let mut rem = index;
        let mut delta = 0isize;
        for (&len, &stride) in self.meta.shape.iter().zip(self.meta.strides.iter()).rev() {
            delta += (rem % len) as isize * stride;
            rem /= len;
        }
        (self.meta.offset as isize + delta) as usize
    }
}

impl Array for CpuArray {
    fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    fn to_vec(&self) -> Vec<Scalar> {
        let buffer = self.buffer();
        self.meta.offsets().map(|o| buffer.get(o)).collect()
    }

    fn as_f64_vec(&self) -> Vec<f64> {
        self.f64_values()
    }

    fn from_f64_vec(data: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        let expected_size: usize = shape.iter().product();
        if data.len() != expected_size {
            return Err(NdError::ShapeMismatch {
                expected: shape,
                got: vec![data.len()],
            });
        }
        Ok(Self::from_buffer(Buffer::Float64(data), shape))
    }

    fn get_flat(&self, index: usize) -> Option<Scalar> {
        if index >= self.size() {
            return None;
        }
        Some(self.buffer().get(self.flat_offset(index)))
    }

    fn set_flat(&self, index: usize, value: Scalar) -> Result<()> {
        if index >= self.size() {
            return Err(NdError::IndexOutOfBounds {
                index: index as isize,
                axis: 0,
                size: self.size(),
            });
        }
        let offset = self.flat_offset(index);
        self.buffer_mut().set(offset, &value)
    }
}

// Implement PartialEq for testing
impl PartialEq for CpuArray {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndstride_core::DType;

    fn arange(n: usize, shape: Vec<usize>) -> CpuArray {
        CpuArray::from_f64_vec((0..n).map(|x| x as f64).collect(), shape).unwrap()
    }

    #[test]
    fn test_owner_metadata() {
        let arr = arange(6, vec![2, 3]);
        assert_eq!(arr.shape(), &[2, 3]);
        assert_eq!(arr.ndim(), 2);
        assert_eq!(arr.size(), 6);
        assert_eq!(arr.strides(), &[3, 1]);
        assert_eq!(arr.byte_strides(), vec![24, 8]);
        assert_eq!(arr.offset(), 0);
        assert_eq!(arr.nbytes(), 48);
        assert!(!arr.is_view());
        assert!(arr.base().is_none());
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        let result = CpuArray::from_f64_vec(vec![1.0, 2.0, 3.0], vec![2, 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_view_records_root_owner() {
        let arr = arange(6, vec![2, 3]);
        let v1 = arr.view(vec![3], vec![1], 3);
        let v2 = v1.view(vec![2], vec![1], 4);
        assert!(v2.is_view());
        assert_eq!(v2.base().unwrap().shape(), &[2, 3]);
        assert!(v2.shares_memory(&arr));
        assert_eq!(v2.to_vec(), vec![Scalar::Float(4.0), Scalar::Float(5.0)]);
        // only the viewed elements count
        assert_eq!(v2.nbytes(), 16);
    }

    #[test]
    fn test_write_through_view() {
        let arr = arange(4, vec![4]);
        let rev = arr.view(vec![4], vec![-1], 3);
        rev.set_flat(0, Scalar::Float(9.0)).unwrap();
        assert_eq!(arr.get_flat(3), Some(Scalar::Float(9.0)));
    }

    #[test]
    fn test_clone_is_handle() {
        let arr = arange(3, vec![3]);
        let alias = arr.clone();
        alias.set_flat(0, Scalar::Float(5.0)).unwrap();
        assert_eq!(arr.get_flat(0), Some(Scalar::Float(5.0)));
        assert!(!alias.is_view());
    }

    #[test]
    fn test_get_flat_strided() {
        // Transposed view of [[0, 1, 2], [3, 4, 5]]
        let arr = arange(6, vec![2, 3]);
        let t = arr.view(vec![3, 2], vec![1, 3], 0);
        let flat: Vec<_> = (0..6).map(|i| t.get_flat(i).unwrap()).collect();
        assert_eq!(flat, t.to_vec());
        assert_eq!(t.get_flat(1), Some(Scalar::Float(3.0)));
        assert_eq!(t.get_flat(6), None);
    }

    #[test]
    fn test_ndarray_interop() {
        let nd = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let arr = CpuArray::from_ndarray(nd.clone());
        assert_eq!(arr.dtype(), DType::Float64);
        let t = arr.view(vec![2, 2], vec![1, 2], 0);
        let back = t.to_ndarray().unwrap();
        assert_eq!(back, nd.t().to_owned());
    }

    #[test]
    fn test_to_ndarray_rejects_object() {
        let arr = CpuArray::from_buffer(Buffer::Object(vec![Scalar::from("a")]), vec![1]);
        assert!(arr.to_ndarray().is_err());
    }
}
