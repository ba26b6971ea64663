//! Statistical operations for CPU backend

use ndstride_core::{ops::StatsOps, Array, DType, NdError, Offsets, Result, Scalar};

use crate::storage::Buffer;
use crate::{CpuArray, CpuBackend};

fn numeric_only(op: &'static str, arr: &CpuArray) -> Result<()> {
    if arr.dtype().is_numeric() {
        Ok(())
    } else {
        Err(NdError::UnsupportedDType {
            op,
            dtype: arr.dtype(),
        })
    }
}

fn non_empty(op: &'static str, arr: &CpuArray) -> Result<()> {
    if arr.size() == 0 {
        return Err(NdError::InvalidArgument(format!(
            "zero-size array to reduction operation {op} which has no identity"
        )));
    }
    Ok(())
}

/// Row-major position of the extreme element; the first NaN wins for floats.
fn arg_extreme(arr: &CpuArray, want: std::cmp::Ordering) -> usize {
    if arr.dtype().is_float() {
        let data = arr.f64_values();
        if let Some(pos) = data.iter().position(|x| x.is_nan()) {
            return pos;
        }
        let mut best = 0;
        for (i, x) in data.iter().enumerate().skip(1) {
            if x.partial_cmp(&data[best]) == Some(want) {
                best = i;
            }
        }
        best
    } else {
        let data = arr.i64_values();
        let mut best = 0;
        for (i, x) in data.iter().enumerate().skip(1) {
            if x.cmp(&data[best]) == want {
                best = i;
            }
        }
        best
    }
}

/// Reduce along `axis`, producing one value per remaining position.
///
/// The axis is moved last through a transposed view so each output element
/// is a run of `len` consecutive offsets.
fn reduce_axis<T, F>(arr: &CpuArray, axis: usize, mut fold: F) -> Result<(Vec<usize>, Vec<T>)>
where
    F: FnMut(&Buffer, &mut dyn Iterator<Item = usize>) -> T,
{
    let ndim = arr.ndim();
    if axis >= ndim {
        return Err(NdError::InvalidAxis { axis, ndim });
    }

    let mut perm: Vec<usize> = (0..ndim).filter(|&d| d != axis).collect();
    perm.push(axis);
    let shape: Vec<usize> = perm[..ndim - 1].iter().map(|&d| arr.shape()[d]).collect();
    let strides: Vec<isize> = perm.iter().map(|&d| arr.strides()[d]).collect();
    let mut moved_shape = shape.clone();
    moved_shape.push(arr.shape()[axis]);

    let len = arr.shape()[axis];
    let out_size: usize = shape.iter().product();
    let buffer = arr.buffer();
    let mut offsets = Offsets::new(&moved_shape, &strides, arr.offset());
    let values = (0..out_size)
        .map(|_| fold(&buffer, &mut offsets.by_ref().take(len)))
        .collect();
    Ok((shape, values))
}

impl StatsOps for CpuBackend {
    type Array = CpuArray;

    fn sum(arr: &CpuArray) -> Result<Scalar> {
        numeric_only("sum", arr)?;
        Ok(if arr.dtype().is_float() {
            Scalar::Float(arr.f64_values().iter().sum())
        } else {
            Scalar::Int(arr.i64_values().iter().fold(0i64, |acc, &x| acc.wrapping_add(x)))
        })
    }

    fn prod(arr: &CpuArray) -> Result<Scalar> {
        numeric_only("prod", arr)?;
        Ok(if arr.dtype().is_float() {
            Scalar::Float(arr.f64_values().iter().product())
        } else {
            Scalar::Int(arr.i64_values().iter().fold(1i64, |acc, &x| acc.wrapping_mul(x)))
        })
    }

    fn mean(arr: &CpuArray) -> Result<f64> {
        numeric_only("mean", arr)?;
        let data = arr.f64_values();
        if data.is_empty() {
            return Ok(f64::NAN);
        }
        Ok(data.iter().sum::<f64>() / data.len() as f64)
    }

    fn min(arr: &CpuArray) -> Result<Scalar> {
        let pos = Self::argmin(arr)?;
        arr.get_flat(pos).ok_or(NdError::IndexOutOfBounds {
            index: pos as isize,
            axis: 0,
            size: arr.size(),
        })
    }

    fn max(arr: &CpuArray) -> Result<Scalar> {
        let pos = Self::argmax(arr)?;
        arr.get_flat(pos).ok_or(NdError::IndexOutOfBounds {
            index: pos as isize,
            axis: 0,
            size: arr.size(),
        })
    }

    fn argmin(arr: &CpuArray) -> Result<usize> {
        numeric_only("argmin", arr)?;
        non_empty("argmin", arr)?;
        Ok(arg_extreme(arr, std::cmp::Ordering::Less))
    }

    fn argmax(arr: &CpuArray) -> Result<usize> {
        numeric_only("argmax", arr)?;
        non_empty("argmax", arr)?;
        Ok(arg_extreme(arr, std::cmp::Ordering::Greater))
    }

    fn sum_axis(arr: &CpuArray, axis: usize) -> Result<CpuArray> {
        numeric_only("sum", arr)?;
        let dtype = arr.dtype();
        if dtype.is_float() {
            let (shape, values) =
                reduce_axis(arr, axis, |buf, run| run.map(|o| buf.get_f64(o)).sum::<f64>())?;
            Ok(CpuArray::from_buffer(Buffer::from_f64s(dtype, values), shape))
        } else {
            let (shape, values) = reduce_axis(arr, axis, |buf, run| {
                run.fold(0i64, |acc, o| acc.wrapping_add(buf.get_i64(o)))
            })?;
            Ok(CpuArray::from_buffer(Buffer::Int64(values), shape))
        }
    }

    fn mean_axis(arr: &CpuArray, axis: usize) -> Result<CpuArray> {
        numeric_only("mean", arr)?;
        let dtype = match arr.dtype() {
            DType::Float32 => DType::Float32,
            _ => DType::Float64,
        };
        let (shape, values) = reduce_axis(arr, axis, |buf, run| {
            let (total, count) = run.fold((0.0, 0usize), |(t, n), o| (t + buf.get_f64(o), n + 1));
            if count == 0 {
                f64::NAN
            } else {
                total / count as f64
            }
        })?;
        Ok(CpuArray::from_buffer(Buffer::from_f64s(dtype, values), shape))
    }
}
