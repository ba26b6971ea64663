//! Comparison operations for CPU backend
//!
//! Every comparison broadcasts its operands and yields a `Bool` array,
//! ready to be used as a mask.

use std::cmp::Ordering;

use ndstride_core::{ops::CompareOps, Array, DType, Kind, NdError, Result, Scalar};

use crate::broadcast::broadcast_zip;
use crate::storage::Buffer;
use crate::{CpuArray, CpuBackend};

/// How a pair of elements is ordered, `None` when unordered (NaN, or
/// unequal non-numeric values).
fn element_ordering(
    lane: Kind,
    buf_a: &Buffer,
    oa: usize,
    buf_b: &Buffer,
    ob: usize,
) -> Option<Ordering> {
    match lane {
        Kind::Bool | Kind::Int => Some(buf_a.get_i64(oa).cmp(&buf_b.get_i64(ob))),
        Kind::Float => buf_a.get_f64(oa).partial_cmp(&buf_b.get_f64(ob)),
        Kind::Object => {
            let (x, y) = (buf_a.get(oa), buf_b.get(ob));
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ if x == y => Some(Ordering::Equal),
                _ => None,
            }
        }
    }
}

fn compare<F>(
    name: &'static str,
    ordered: bool,
    a: &CpuArray,
    b: &CpuArray,
    accept: F,
) -> Result<CpuArray>
where
    F: Fn(Option<Ordering>) -> bool,
{
    let lane = DType::promote(a.dtype(), b.dtype()).kind();
    if ordered && lane == Kind::Object {
        return Err(NdError::UnsupportedDType {
            op: name,
            dtype: DType::Object,
        });
    }
    let (shape, values) = broadcast_zip(a, b, |buf_a, oa, buf_b, ob| {
        Ok(accept(element_ordering(lane, buf_a, oa, buf_b, ob)))
    })?;
    Ok(CpuArray::from_buffer(Buffer::Bool(values), shape))
}

fn scalar_array(scalar: Scalar) -> CpuArray {
    CpuArray::from_buffer(Buffer::from_scalar(scalar), vec![])
}

macro_rules! impl_compare_op {
    ($name:ident, $scalar_name:ident, $ordered:expr, $accept:expr) => {
        fn $name(a: &CpuArray, b: &CpuArray) -> Result<CpuArray> {
            compare(stringify!($name), $ordered, a, b, $accept)
        }

        fn $scalar_name(arr: &CpuArray, scalar: Scalar) -> Result<CpuArray> {
            compare(stringify!($name), $ordered, arr, &scalar_array(scalar), $accept)
        }
    };
}

impl CompareOps for CpuBackend {
    type Array = CpuArray;

    impl_compare_op!(eq, eq_scalar, false, |o| o == Some(Ordering::Equal));
    impl_compare_op!(ne, ne_scalar, false, |o| o != Some(Ordering::Equal));
    impl_compare_op!(lt, lt_scalar, true, |o| o == Some(Ordering::Less));
    impl_compare_op!(le, le_scalar, true, |o| matches!(
        o,
        Some(Ordering::Less | Ordering::Equal)
    ));
    impl_compare_op!(gt, gt_scalar, true, |o| o == Some(Ordering::Greater));
    impl_compare_op!(ge, ge_scalar, true, |o| matches!(
        o,
        Some(Ordering::Greater | Ordering::Equal)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndstride_core::ErrorKind;

    fn arr(data: Vec<f64>) -> CpuArray {
        CpuArray::from_f64_vec(data.clone(), vec![data.len()]).unwrap()
    }

    fn bools(a: &CpuArray) -> Vec<bool> {
        assert_eq!(a.dtype(), DType::Bool);
        a.to_vec()
            .into_iter()
            .map(|s| s.as_bool().unwrap())
            .collect()
    }

    #[test]
    fn test_eq() {
        let a = arr(vec![1.0, 2.0, 3.0]);
        let b = arr(vec![1.0, 5.0, 3.0]);
        let result = CpuBackend::eq(&a, &b).unwrap();
        assert_eq!(bools(&result), vec![true, false, true]);
    }

    #[test]
    fn test_ne() {
        let a = arr(vec![1.0, 2.0, 3.0]);
        let b = arr(vec![1.0, 5.0, 3.0]);
        let result = CpuBackend::ne(&a, &b).unwrap();
        assert_eq!(bools(&result), vec![false, true, false]);
    }

    #[test]
    fn test_ordering() {
        let a = arr(vec![1.0, 2.0, 3.0]);
        let b = arr(vec![2.0, 2.0, 2.0]);
        assert_eq!(bools(&CpuBackend::lt(&a, &b).unwrap()), vec![true, false, false]);
        assert_eq!(bools(&CpuBackend::le(&a, &b).unwrap()), vec![true, true, false]);
        assert_eq!(bools(&CpuBackend::gt(&a, &b).unwrap()), vec![false, false, true]);
        assert_eq!(bools(&CpuBackend::ge(&a, &b).unwrap()), vec![false, true, true]);
    }

    #[test]
    fn test_nan_is_unordered() {
        let a = arr(vec![f64::NAN]);
        assert_eq!(bools(&CpuBackend::eq(&a, &a).unwrap()), vec![false]);
        assert_eq!(bools(&CpuBackend::ne(&a, &a).unwrap()), vec![true]);
        assert_eq!(bools(&CpuBackend::lt_scalar(&a, 1.0.into()).unwrap()), vec![false]);
    }

    #[test]
    fn test_scalar_compare_mixed_kinds() {
        let a = CpuArray::from_buffer(Buffer::Int64(vec![1, 2, 3]), vec![3]);
        let result = CpuBackend::gt_scalar(&a, Scalar::Float(1.5)).unwrap();
        assert_eq!(bools(&result), vec![false, true, true]);
        let result = CpuBackend::eq_scalar(&a, Scalar::Int(2)).unwrap();
        assert_eq!(bools(&result), vec![false, true, false]);
    }

    #[test]
    fn test_broadcast_compare() {
        let col = CpuArray::from_f64_vec(vec![1.0, 3.0], vec![2, 1]).unwrap();
        let row = arr(vec![2.0, 3.0]);
        let result = CpuBackend::ge(&col, &row).unwrap();
        assert_eq!(result.shape(), &[2, 2]);
        assert_eq!(bools(&result), vec![false, false, true, true]);
    }

    #[test]
    fn test_object_compare() {
        let a = CpuArray::from_buffer(
            Buffer::Object(vec![Scalar::from("a"), Scalar::Int(1)]),
            vec![2],
        );
        let result = CpuBackend::eq_scalar(&a, Scalar::from("a")).unwrap();
        assert_eq!(bools(&result), vec![true, false]);
        let err = CpuBackend::lt(&a, &a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = arr(vec![1.0, 2.0, 3.0]);
        let b = arr(vec![1.0, 2.0]);
        let err = CpuBackend::eq(&a, &b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }
}
