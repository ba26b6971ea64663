//! Element-wise math operations for CPU backend
//!
//! Kernels run in one of two lanes chosen by the result dtype: floats are
//! computed in `f64`, integers (and booleans) in wrapping `i64`. Narrow
//! dtypes are restored when the output buffer is built.

use log::trace;
use ndstride_core::{ops::MathOps, Array, DType, NdError, Result, Scalar};

use crate::broadcast::{broadcast_binary_op, broadcast_zip};
use crate::storage::Buffer;
use crate::{CpuArray, CpuBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Maximum,
    Minimum,
}

impl BinaryOp {
    fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "subtract",
            BinaryOp::Mul => "multiply",
            BinaryOp::Div => "divide",
            BinaryOp::Rem => "remainder",
            BinaryOp::Pow => "power",
            BinaryOp::Maximum => "maximum",
            BinaryOp::Minimum => "minimum",
        }
    }

    fn result_dtype(self, a: DType, b: DType) -> Result<DType> {
        match self {
            BinaryOp::Div => DType::division_result(a, b),
            _ => DType::arithmetic_result(self.name(), a, b),
        }
    }

    fn apply_f64(self, x: f64, y: f64) -> f64 {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
            BinaryOp::Rem => {
                // Result takes the sign of the divisor
                let r = x % y;
                if r != 0.0 && (r < 0.0) != (y < 0.0) {
                    r + y
                } else {
                    r
                }
            }
            BinaryOp::Pow => x.powf(y),
            // NaN propagates
            BinaryOp::Maximum => {
                if x.is_nan() || y.is_nan() {
                    f64::NAN
                } else {
                    x.max(y)
                }
            }
            BinaryOp::Minimum => {
                if x.is_nan() || y.is_nan() {
                    f64::NAN
                } else {
                    x.min(y)
                }
            }
        }
    }

    fn apply_i64(self, x: i64, y: i64) -> Result<i64> {
        Ok(match self {
            BinaryOp::Add => x.wrapping_add(y),
            BinaryOp::Sub => x.wrapping_sub(y),
            BinaryOp::Mul => x.wrapping_mul(y),
            BinaryOp::Div | BinaryOp::Rem if y == 0 => return Err(NdError::DivisionByZero),
            BinaryOp::Div => x.wrapping_div(y),
            BinaryOp::Rem => {
                let r = x.wrapping_rem(y);
                if r != 0 && (r < 0) != (y < 0) {
                    r + y
                } else {
                    r
                }
            }
            BinaryOp::Pow => {
                if y < 0 {
                    return Err(NdError::InvalidArgument(
                        "Integers to negative integer powers are not allowed".to_string(),
                    ));
                }
                let exp = u32::try_from(y).map_err(|_| {
                    NdError::InvalidArgument(format!("Integer exponent {y} is too large"))
                })?;
                x.wrapping_pow(exp)
            }
            BinaryOp::Maximum => x.max(y),
            BinaryOp::Minimum => x.min(y),
        })
    }
}

/// Broadcast `a ⊗ b` into a freshly allocated array.
fn binary(op: BinaryOp, a: &CpuArray, b: &CpuArray) -> Result<CpuArray> {
    let dtype = op.result_dtype(a.dtype(), b.dtype())?;
    trace!(
        "{} {:?}:{} with {:?}:{} -> {}",
        op.name(),
        a.shape(),
        a.dtype(),
        b.shape(),
        b.dtype(),
        dtype
    );

    if op == BinaryOp::Div && !a.dtype().is_float() && !b.dtype().is_float() {
        // Integer operands raise on a zero divisor even though the
        // quotient is a float.
        let (shape, values) = broadcast_zip(a, b, |buf_a, oa, buf_b, ob| {
            let y = buf_b.get_i64(ob);
            if y == 0 {
                return Err(NdError::DivisionByZero);
            }
            Ok(buf_a.get_i64(oa) as f64 / y as f64)
        })?;
        Ok(CpuArray::from_buffer(Buffer::from_f64s(dtype, values), shape))
    } else if dtype.is_float() {
        let (shape, values) = broadcast_binary_op(a, b, |x, y| op.apply_f64(x, y))?;
        Ok(CpuArray::from_buffer(Buffer::from_f64s(dtype, values), shape))
    } else {
        let (shape, values) = broadcast_zip(a, b, |buf_a, oa, buf_b, ob| {
            op.apply_i64(buf_a.get_i64(oa), buf_b.get_i64(ob))
        })?;
        Ok(CpuArray::from_buffer(Buffer::from_i64s(dtype, values), shape))
    }
}

/// Wrap a bare scalar as a 0-d operand for `arr`.
///
/// The scalar only widens the dtype when its kind is above the array's
/// kind, so an `Int32` array plus `1` stays `Int32`.
pub(crate) fn scalar_operand(arr: &CpuArray, scalar: &Scalar) -> Result<CpuArray> {
    let dtype = DType::weak_promote(arr.dtype(), scalar.kind());
    let buffer = Buffer::filled(dtype, 1, scalar)?;
    Ok(CpuArray::from_buffer(buffer, vec![]))
}

fn binary_scalar(op: BinaryOp, arr: &CpuArray, scalar: Scalar) -> Result<CpuArray> {
    if !scalar.is_numeric() {
        return Err(NdError::UnsupportedDType {
            op: op.name(),
            dtype: DType::Object,
        });
    }
    let rhs = scalar_operand(arr, &scalar)?;
    binary(op, arr, &rhs)
}

/// Unary op that keeps the dtype; booleans and objects are rejected.
fn signed_unary<F, G>(name: &'static str, arr: &CpuArray, on_float: F, on_int: G) -> Result<CpuArray>
where
    F: Fn(f64) -> f64,
    G: Fn(i64) -> i64,
{
    let dtype = arr.dtype();
    if matches!(dtype, DType::Bool | DType::Object) {
        return Err(NdError::UnsupportedDType { op: name, dtype });
    }
    let shape = arr.shape().to_vec();
    let buffer = if dtype.is_float() {
        Buffer::from_f64s(dtype, arr.f64_values().into_iter().map(on_float).collect())
    } else {
        Buffer::from_i64s(dtype, arr.i64_values().into_iter().map(on_int).collect())
    };
    Ok(CpuArray::from_buffer(buffer, shape))
}

/// Unary op with a float result; `Float32` input stays `Float32`.
fn float_unary<F>(name: &'static str, arr: &CpuArray, op: F) -> Result<CpuArray>
where
    F: Fn(f64) -> f64,
{
    let dtype = match arr.dtype() {
        DType::Object => {
            return Err(NdError::UnsupportedDType {
                op: name,
                dtype: DType::Object,
            })
        }
        DType::Float32 => DType::Float32,
        _ => DType::Float64,
    };
    let values = arr.f64_values().into_iter().map(op).collect();
    Ok(CpuArray::from_buffer(
        Buffer::from_f64s(dtype, values),
        arr.shape().to_vec(),
    ))
}

macro_rules! impl_binary_op_broadcast {
    ($name:ident, $op:expr) => {
        fn $name(a: &CpuArray, b: &CpuArray) -> Result<CpuArray> {
            binary($op, a, b)
        }
    };
}

macro_rules! impl_scalar_op {
    ($name:ident, $op:expr) => {
        fn $name(arr: &CpuArray, scalar: Scalar) -> Result<CpuArray> {
            binary_scalar($op, arr, scalar)
        }
    };
}

impl MathOps for CpuBackend {
    type Array = CpuArray;

    fn neg(arr: &CpuArray) -> Result<CpuArray> {
        signed_unary("negative", arr, |x| -x, i64::wrapping_neg)
    }

    fn abs(arr: &CpuArray) -> Result<CpuArray> {
        signed_unary("absolute", arr, f64::abs, i64::wrapping_abs)
    }

    fn sqrt(arr: &CpuArray) -> Result<CpuArray> {
        float_unary("sqrt", arr, f64::sqrt)
    }

    fn exp(arr: &CpuArray) -> Result<CpuArray> {
        float_unary("exp", arr, f64::exp)
    }

    // Binary operations with broadcasting support
    impl_binary_op_broadcast!(add, BinaryOp::Add);
    impl_binary_op_broadcast!(sub, BinaryOp::Sub);
    impl_binary_op_broadcast!(mul, BinaryOp::Mul);
    impl_binary_op_broadcast!(div, BinaryOp::Div);
    impl_binary_op_broadcast!(rem, BinaryOp::Rem);
    impl_binary_op_broadcast!(pow, BinaryOp::Pow);
    impl_binary_op_broadcast!(maximum, BinaryOp::Maximum);
    impl_binary_op_broadcast!(minimum, BinaryOp::Minimum);

    // Scalar operations
    impl_scalar_op!(add_scalar, BinaryOp::Add);
    impl_scalar_op!(sub_scalar, BinaryOp::Sub);
    impl_scalar_op!(mul_scalar, BinaryOp::Mul);
    impl_scalar_op!(div_scalar, BinaryOp::Div);
    impl_scalar_op!(rem_scalar, BinaryOp::Rem);
    impl_scalar_op!(pow_scalar, BinaryOp::Pow);
}
