//! Matrix and vector products for CPU backend using faer

use faer::{Mat, MatRef};
use log::debug;
use ndstride_core::{ops::LinalgOps, Array, DType, NdError, Result};

use crate::storage::Buffer;
use crate::{CpuArray, CpuBackend};

/// Convert a 2-D CpuArray to a faer Mat, following its strides.
fn to_faer(arr: &CpuArray) -> Mat<f64> {
    let (m, n) = (arr.shape()[0], arr.shape()[1]);
    let data = arr.f64_values();

    // faer uses column-major, values come out row-major
    Mat::from_fn(m, n, |i, j| data[i * n + j])
}

/// Convert a faer Mat back to row-major values.
fn from_faer(mat: MatRef<'_, f64>) -> Vec<f64> {
    let (m, n) = (mat.nrows(), mat.ncols());
    let mut data = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            data.push(mat.read(i, j));
        }
    }
    data
}

/// Row-major product of an (m, k) and a (k, n) operand given as flat values.
fn matmul_i64(a: &[i64], b: &[i64], m: usize, k: usize, n: usize) -> Vec<i64> {
    let mut out = vec![0i64; m * n];
    for i in 0..m {
        for p in 0..k {
            let aip = a[i * k + p];
            for j in 0..n {
                out[i * n + j] = out[i * n + j].wrapping_add(aip.wrapping_mul(b[p * n + j]));
            }
        }
    }
    out
}

fn matmul_f64(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        for p in 0..k {
            let aip = a[i * k + p];
            for j in 0..n {
                out[i * n + j] += aip * b[p * n + j];
            }
        }
    }
    out
}

/// Shape-checked product. A 1-D right operand acts as a column vector and
/// drops out of the result shape.
fn product(a: &CpuArray, b: &CpuArray, dtype: DType) -> Result<(Vec<usize>, Buffer)> {
    let (a_shape, b_shape) = (a.shape(), b.shape());
    let mismatch = || NdError::IncompatibleShapes(a_shape.to_vec(), b_shape.to_vec());

    let (m, k, n, out_shape) = match (a_shape, b_shape) {
        (&[k1], &[k2]) if k1 == k2 => (1, k1, 1, vec![]),
        (&[m, k1], &[k2]) if k1 == k2 => (m, k1, 1, vec![m]),
        (&[m, k1], &[k2, n]) if k1 == k2 => (m, k1, n, vec![m, n]),
        _ => return Err(mismatch()),
    };

    let buffer = if !dtype.is_float() {
        Buffer::from_i64s(
            dtype,
            matmul_i64(&a.i64_values(), &b.i64_values(), m, k, n),
        )
    } else if a_shape.len() == 2 && b_shape.len() == 2 {
        debug!("dot {:?} x {:?}: dispatching to faer", a_shape, b_shape);
        let result = to_faer(a) * to_faer(b);
        Buffer::from_f64s(dtype, from_faer(result.as_ref()))
    } else {
        Buffer::from_f64s(
            dtype,
            matmul_f64(&a.f64_values(), &b.f64_values(), m, k, n),
        )
    };
    Ok((out_shape, buffer))
}

impl LinalgOps for CpuBackend {
    type Array = CpuArray;

    fn dot(a: &CpuArray, b: &CpuArray) -> Result<CpuArray> {
        let dtype = DType::arithmetic_result("dot", a.dtype(), b.dtype())?;
        let (shape, buffer) = product(a, b, dtype)?;
        Ok(CpuArray::from_buffer(buffer, shape))
    }
}
