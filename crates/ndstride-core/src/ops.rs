//! Operation traits that backends implement

use crate::array::Array;
use crate::dtype::DType;
use crate::index::Idx;
use crate::scalar::{Nested, Scalar};
use crate::Result;

/// Array creation operations
///
/// Every constructor allocates a fresh buffer owned by the returned array.
pub trait CreationOps: Sized {
    type Array: Array;

    /// Build from a nested sequence, inferring shape and dtype
    fn from_nested(data: Nested) -> Result<Self::Array>;

    /// Build from flat row-major values and a shape, inferring dtype
    fn from_vec(data: Vec<Scalar>, shape: Vec<usize>) -> Result<Self::Array>;

    /// 0-dimensional array holding `value`
    fn scalar(value: Scalar) -> Self::Array;

    /// Create array of zeros (`Float64` unless `dtype` is given)
    fn zeros(shape: Vec<usize>, dtype: Option<DType>) -> Self::Array;

    /// Create array of ones (`Float64` unless `dtype` is given)
    fn ones(shape: Vec<usize>, dtype: Option<DType>) -> Self::Array;

    /// Create array filled with value cast to `dtype` (default `Float64`)
    fn full(shape: Vec<usize>, value: Scalar, dtype: Option<DType>) -> Result<Self::Array>;

    /// Create array whose element at each index is `f(index)`
    fn from_fn<F>(shape: Vec<usize>, dtype: Option<DType>, f: F) -> Result<Self::Array>
    where
        F: FnMut(&[usize]) -> Scalar;

    /// Create array from range [start, stop) with step
    fn arange<A, B, C>(start: A, stop: B, step: C, dtype: Option<DType>) -> Result<Self::Array>
    where
        A: Into<Scalar>,
        B: Into<Scalar>,
        C: Into<Scalar>;

    /// Create array of evenly spaced values
    fn linspace(start: f64, stop: f64, num: usize) -> Self::Array;

    /// Create identity matrix
    fn identity(n: usize, dtype: Option<DType>) -> Self::Array;
}

/// Element access, slicing and masking
pub trait IndexOps {
    type Array: Array;

    /// View selected by an index expression (never copies)
    fn slice(arr: &Self::Array, index: &[Idx]) -> Result<Self::Array>;

    /// Read one element; one index per axis
    fn get(arr: &Self::Array, index: &[isize]) -> Result<Scalar>;

    /// Write one element through the array (and every view sharing it)
    fn set(arr: &Self::Array, index: &[isize], value: Scalar) -> Result<()>;

    /// Write `value` into every element of `arr`
    fn fill(arr: &Self::Array, value: Scalar) -> Result<()>;

    /// Write `src`, broadcast to `dst`'s shape, into `dst`
    fn assign(dst: &Self::Array, src: &Self::Array) -> Result<()>;

    /// Copy out the elements where the boolean `mask` is true
    fn mask(arr: &Self::Array, mask: &Self::Array) -> Result<Self::Array>;

    /// The single element of a size-1 array
    fn item(arr: &Self::Array) -> Result<Scalar>;
}

/// Element-wise math operations
pub trait MathOps {
    type Array: Array;

    // Unary operations
    fn neg(arr: &Self::Array) -> Result<Self::Array>;
    fn abs(arr: &Self::Array) -> Result<Self::Array>;
    fn sqrt(arr: &Self::Array) -> Result<Self::Array>;
    fn exp(arr: &Self::Array) -> Result<Self::Array>;

    // Binary operations (element-wise, broadcasting)
    fn add(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn sub(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn mul(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn div(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn rem(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn pow(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn maximum(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn minimum(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;

    // Scalar operations
    fn add_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn sub_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn mul_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn div_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn rem_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn pow_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
}

/// Statistical/reduction operations
pub trait StatsOps {
    type Array: Array;

    // Full array reductions
    fn sum(arr: &Self::Array) -> Result<Scalar>;
    fn prod(arr: &Self::Array) -> Result<Scalar>;
    fn mean(arr: &Self::Array) -> Result<f64>;
    fn min(arr: &Self::Array) -> Result<Scalar>;
    fn max(arr: &Self::Array) -> Result<Scalar>;
    fn argmin(arr: &Self::Array) -> Result<usize>;
    fn argmax(arr: &Self::Array) -> Result<usize>;

    // Axis reductions
    fn sum_axis(arr: &Self::Array, axis: usize) -> Result<Self::Array>;
    fn mean_axis(arr: &Self::Array, axis: usize) -> Result<Self::Array>;
}

/// Linear algebra operations
pub trait LinalgOps {
    type Array: Array;

    /// Dot product (1D·1D), matrix-vector (2D·1D) or matrix multiply (2D·2D)
    fn dot(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
}

/// Array manipulation operations
pub trait ManipulationOps {
    type Array: Array;

    /// Independent row-major copy
    fn copy(arr: &Self::Array) -> Self::Array;

    /// Copy converted to `dtype`
    fn astype(arr: &Self::Array, dtype: DType) -> Result<Self::Array>;

    /// Reshape array (a view when the source is contiguous)
    fn reshape(arr: &Self::Array, shape: Vec<usize>) -> Result<Self::Array>;

    /// Flatten to 1D (always a copy)
    fn flatten(arr: &Self::Array) -> Self::Array;

    /// Ravel (flatten, but may return view)
    fn ravel(arr: &Self::Array) -> Self::Array;

    /// Squeeze (remove axes of length 1)
    fn squeeze(arr: &Self::Array) -> Self::Array;

    /// Expand dims
    fn expand_dims(arr: &Self::Array, axis: usize) -> Result<Self::Array>;

    /// Permute axes (reverse them when `axes` is `None`)
    fn transpose(arr: &Self::Array, axes: Option<&[usize]>) -> Result<Self::Array>;

    /// Concatenate arrays along axis
    fn concatenate(arrays: &[&Self::Array], axis: usize) -> Result<Self::Array>;

    /// Stack arrays along new axis
    fn stack(arrays: &[&Self::Array], axis: usize) -> Result<Self::Array>;
}

/// Comparison operations
///
/// Results always have dtype `Bool`, so they can be used as masks.
pub trait CompareOps {
    type Array: Array;

    fn eq(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn ne(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn lt(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn le(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn gt(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;
    fn ge(a: &Self::Array, b: &Self::Array) -> Result<Self::Array>;

    fn eq_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn ne_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn lt_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn le_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn gt_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
    fn ge_scalar(arr: &Self::Array, scalar: Scalar) -> Result<Self::Array>;
}
