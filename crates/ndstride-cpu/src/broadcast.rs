//! NumPy-style broadcasting utilities
//!
//! Broadcasting never copies: a stretched axis is expressed as a view whose
//! stride on that axis is 0, so every position along it reads the same
//! element.
//!
//! Broadcasting Rules (from NumPy):
//! 1. If arrays have different number of dimensions, prepend 1s to the smaller shape
//! 2. Arrays are compatible if for each dimension:
//!    - Dimensions are equal, OR
//!    - One of them is 1
//! 3. Result dimension = max(dim1, dim2) for each axis

use ndstride_core::{Array, NdError, Result};

use crate::storage::Buffer;
use crate::CpuArray;

/// Compute the broadcast shape of two input shapes.
///
/// Returns the resulting shape after broadcasting, or an error if shapes are incompatible.
///
/// # Examples
///
/// - `[3, 1] + [1, 4] → [3, 4]`
/// - `[3, 4] + [4] → [3, 4]`
/// - `[3, 4] + [2, 4] → Error (incompatible)`
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>> {
    let ndim_a = shape_a.len();
    let ndim_b = shape_b.len();
    let ndim_out = ndim_a.max(ndim_b);

    let mut result = vec![0; ndim_out];

    // Iterate from right to left (trailing dimensions)
    for i in 0..ndim_out {
        // Get dimension from right, defaulting to 1 if not present
        let dim_a = if i < ndim_a {
            shape_a[ndim_a - 1 - i]
        } else {
            1
        };
        let dim_b = if i < ndim_b {
            shape_b[ndim_b - 1 - i]
        } else {
            1
        };

        if dim_a == dim_b || dim_a == 1 || dim_b == 1 {
            // A length-0 axis against a length-1 axis stays empty.
            result[ndim_out - 1 - i] = if dim_a == 1 { dim_b } else { dim_a };
        } else {
            return Err(NdError::IncompatibleShapes(
                shape_a.to_vec(),
                shape_b.to_vec(),
            ));
        }
    }

    Ok(result)
}

/// Strides that read an array of `shape`/`strides` as if it had
/// `target_shape`: missing leading axes and stretched axes get stride 0.
pub fn broadcast_strides(
    shape: &[usize],
    strides: &[isize],
    target_shape: &[usize],
) -> Result<Vec<isize>> {
    let incompatible = || NdError::IncompatibleShapes(shape.to_vec(), target_shape.to_vec());
    if shape.len() > target_shape.len() {
        return Err(incompatible());
    }

    let lead = target_shape.len() - shape.len();
    let mut result = vec![0isize; target_shape.len()];
    for (i, (&len, &stride)) in shape.iter().zip(strides.iter()).enumerate() {
        let target = target_shape[lead + i];
        result[lead + i] = if len == target {
            stride
        } else if len == 1 {
            0
        } else {
            return Err(incompatible());
        };
    }
    Ok(result)
}

/// Broadcast an array to a target shape.
///
/// Returns a view over the same buffer; nothing is copied.
pub fn broadcast_to(arr: &CpuArray, target_shape: &[usize]) -> Result<CpuArray> {
    // Fast path: already the right shape
    if arr.shape() == target_shape {
        return Ok(arr.clone());
    }

    let strides = broadcast_strides(arr.shape(), arr.strides(), target_shape)?;
    Ok(arr.view(target_shape.to_vec(), strides, arr.offset()))
}

/// Walk two arrays over their broadcast shape, calling `op` with the buffer
/// offsets of each pair of elements.
///
/// Returns the output shape and the values in row-major order. The first
/// error from `op` aborts the walk.
pub fn broadcast_zip<T, F>(a: &CpuArray, b: &CpuArray, mut op: F) -> Result<(Vec<usize>, Vec<T>)>
where
    F: FnMut(&Buffer, usize, &Buffer, usize) -> Result<T>,
{
    // Compute the broadcast output shape
    let output_shape = broadcast_shapes(a.shape(), b.shape())?;
    let a_view = broadcast_to(a, &output_shape)?;
    let b_view = broadcast_to(b, &output_shape)?;

    let buf_a = a_view.buffer();
    let buf_b = b_view.buffer();
    let values = a_view
        .meta()
        .offsets()
        .zip(b_view.meta().offsets())
        .map(|(oa, ob)| op(&buf_a, oa, &buf_b, ob))
        .collect::<Result<Vec<T>>>()?;

    Ok((output_shape, values))
}

/// Apply a float binary operation with broadcasting.
pub fn broadcast_binary_op<F>(a: &CpuArray, b: &CpuArray, op: F) -> Result<(Vec<usize>, Vec<f64>)>
where
    F: Fn(f64, f64) -> f64,
{
    broadcast_zip(a, b, |buf_a, oa, buf_b, ob| {
        Ok(op(buf_a.get_f64(oa), buf_b.get_f64(ob)))
    })
}
