//! Array creation operations for CPU backend

use ndstride_core::array::ndindex;
use ndstride_core::{ops::CreationOps, DType, Nested, NdError, Result, Scalar};

use crate::storage::Buffer;
use crate::{CpuArray, CpuBackend};

/// Dtype for a set of values: the widest kind present, `Float64` when empty.
fn infer_dtype(values: &[Scalar]) -> DType {
    values
        .iter()
        .map(Scalar::kind)
        .max()
        .map_or(DType::Float64, DType::default_for)
}

/// Shape implied by following the first element at every depth.
fn nested_shape(data: &Nested) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut node = data;
    while let Nested::List(items) = node {
        shape.push(items.len());
        match items.first() {
            Some(first) => node = first,
            None => break,
        }
    }
    shape
}

/// Collect leaves in row-major order, checking every node against `shape`.
fn collect_leaves(node: &Nested, shape: &[usize], depth: usize, out: &mut Vec<Scalar>) -> Result<()> {
    match (node, shape.get(depth)) {
        (Nested::Leaf(value), None) => {
            out.push(value.clone());
            Ok(())
        }
        (Nested::Leaf(_), Some(_)) => Err(NdError::RaggedNesting {
            depth,
            detail: "found a scalar where a sequence was expected".to_string(),
        }),
        (Nested::List(_), None) => Err(NdError::RaggedNesting {
            depth,
            detail: "found a sequence where a scalar was expected".to_string(),
        }),
        (Nested::List(items), Some(&len)) => {
            if items.len() != len {
                return Err(NdError::RaggedNesting {
                    depth,
                    detail: format!("expected {len} elements, got {}", items.len()),
                });
            }
            items
                .iter()
                .try_for_each(|item| collect_leaves(item, shape, depth + 1, out))
        }
    }
}

fn build(values: Vec<Scalar>, shape: Vec<usize>, dtype: Option<DType>) -> Result<CpuArray> {
    let dtype = dtype.unwrap_or_else(|| infer_dtype(&values));
    let buffer = Buffer::from_values(dtype, &values)?;
    Ok(CpuArray::from_buffer(buffer, shape))
}

impl CreationOps for CpuBackend {
    type Array = CpuArray;

    fn from_nested(data: Nested) -> Result<CpuArray> {
        let shape = nested_shape(&data);
        let mut leaves = Vec::with_capacity(shape.iter().product());
        collect_leaves(&data, &shape, 0, &mut leaves)?;
        build(leaves, shape, None)
    }

    fn from_vec(data: Vec<Scalar>, shape: Vec<usize>) -> Result<CpuArray> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(NdError::ShapeMismatch {
                expected: shape,
                got: vec![data.len()],
            });
        }
        build(data, shape, None)
    }

    fn scalar(value: Scalar) -> CpuArray {
        CpuArray::from_buffer(Buffer::from_scalar(value), vec![])
    }

    fn zeros(shape: Vec<usize>, dtype: Option<DType>) -> CpuArray {
        let size = shape.iter().product();
        CpuArray::from_buffer(Buffer::zeros(dtype.unwrap_or_default(), size), shape)
    }

    fn ones(shape: Vec<usize>, dtype: Option<DType>) -> CpuArray {
        let size = shape.iter().product();
        CpuArray::from_buffer(Buffer::ones(dtype.unwrap_or_default(), size), shape)
    }

    fn full(shape: Vec<usize>, value: Scalar, dtype: Option<DType>) -> Result<CpuArray> {
        let size = shape.iter().product();
        let buffer = Buffer::filled(dtype.unwrap_or_default(), size, &value)?;
        Ok(CpuArray::from_buffer(buffer, shape))
    }

    fn from_fn<F>(shape: Vec<usize>, dtype: Option<DType>, mut f: F) -> Result<CpuArray>
    where
        F: FnMut(&[usize]) -> Scalar,
    {
        let values: Vec<Scalar> = ndindex(&shape).map(|index| f(&index)).collect();
        build(values, shape, dtype)
    }

    fn arange<A, B, C>(start: A, stop: B, step: C, dtype: Option<DType>) -> Result<CpuArray>
    where
        A: Into<Scalar>,
        B: Into<Scalar>,
        C: Into<Scalar>,
    {
        let (start, stop, step) = (start.into(), stop.into(), step.into());
        for bound in [&start, &stop, &step] {
            if !bound.is_numeric() {
                return Err(NdError::InvalidArgument(format!(
                    "arange bounds must be numeric, got {bound}"
                )));
            }
        }

        let values: Vec<Scalar> = if [&start, &stop, &step].iter().all(|s| s.is_integral()) {
            let (start, stop, step) = (
                start.as_i64().unwrap_or_default(),
                stop.as_i64().unwrap_or_default(),
                step.as_i64().unwrap_or_default(),
            );
            if step == 0 {
                return Err(NdError::InvalidArgument("Step cannot be zero".to_string()));
            }
            let span = i128::from(stop) - i128::from(start);
            let step_wide = i128::from(step);
            // Ceiling division, clamped at zero for empty ranges.
            let n = if (span > 0) == (step > 0) && span != 0 {
                (span.abs() + step_wide.abs() - 1) / step_wide.abs()
            } else {
                0
            };
            (0..n as i64)
                .map(|i| Scalar::Int(start.wrapping_add(i.wrapping_mul(step))))
                .collect()
        } else {
            let (start, stop, step) = (
                start.as_f64().unwrap_or(f64::NAN),
                stop.as_f64().unwrap_or(f64::NAN),
                step.as_f64().unwrap_or(f64::NAN),
            );
            if step == 0.0 {
                return Err(NdError::InvalidArgument("Step cannot be zero".to_string()));
            }
            let n = ((stop - start) / step).ceil();
            let n = if n.is_finite() && n > 0.0 { n as usize } else { 0 };
            (0..n)
                .map(|i| Scalar::Float(start + (i as f64) * step))
                .collect()
        };

        let len = values.len();
        build(values, vec![len], dtype)
    }

    fn linspace(start: f64, stop: f64, num: usize) -> CpuArray {
        let values: Vec<f64> = match num {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (num - 1) as f64;
                let mut values: Vec<f64> = (0..num).map(|i| start + (i as f64) * step).collect();
                // End point is exact
                values[num - 1] = stop;
                values
            }
        };
        CpuArray::from_buffer(Buffer::Float64(values), vec![num])
    }

    fn identity(n: usize, dtype: Option<DType>) -> CpuArray {
        let mut buffer = Buffer::zeros(dtype.unwrap_or_default(), n * n);
        for i in 0..n {
            buffer.put(i * (n + 1), Scalar::Int(1));
        }
        CpuArray::from_buffer(buffer, vec![n, n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndstride_core::{Array, ErrorKind};

    #[test]
    fn test_zeros() {
        let arr = CpuBackend::zeros(vec![3, 4], None);
        assert_eq!(arr.shape(), &[3, 4]);
        assert_eq!(arr.dtype(), DType::Float64);
        assert!(arr.as_f64_vec().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_ones_with_dtype() {
        let arr = CpuBackend::ones(vec![2, 3], Some(DType::Int32));
        assert_eq!(arr.dtype(), DType::Int32);
        assert_eq!(arr.strides(), &[3, 1]);
        assert_eq!(arr.byte_strides(), vec![12, 4]);
        assert!(arr.as_f64_vec().iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_full() {
        let arr = CpuBackend::full(vec![2, 2], Scalar::Float(5.0), None).unwrap();
        assert!(arr.as_f64_vec().iter().all(|&x| x == 5.0));
        let truncated = CpuBackend::full(vec![2], 2.9.into(), Some(DType::Int64)).unwrap();
        assert_eq!(truncated.to_vec(), vec![Scalar::Int(2), Scalar::Int(2)]);
    }

    #[test]
    fn test_full_invalid_value() {
        let err = CpuBackend::full(vec![2], "abc".into(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_from_nested_infers_shape_and_dtype() {
        let arr = CpuBackend::from_nested(vec![vec![1, 2, 3], vec![4, 5, 6]].into()).unwrap();
        assert_eq!(arr.shape(), &[2, 3]);
        assert_eq!(arr.dtype(), DType::Int64);

        let mixed = CpuBackend::from_nested(Nested::list([
            Nested::from(1),
            Nested::from(2.5),
            Nested::from(true),
        ]))
        .unwrap();
        assert_eq!(mixed.dtype(), DType::Float64);
        assert_eq!(mixed.as_f64_vec(), vec![1.0, 2.5, 1.0]);
    }

    #[test]
    fn test_from_nested_object() {
        let arr = CpuBackend::from_nested(Nested::list([Nested::from(1), Nested::from("a")]))
            .unwrap();
        assert_eq!(arr.dtype(), DType::Object);
        assert_eq!(arr.to_vec(), vec![Scalar::Int(1), Scalar::from("a")]);
    }

    #[test]
    fn test_from_nested_empty_and_scalar() {
        let empty = CpuBackend::from_nested(Nested::List(vec![])).unwrap();
        assert_eq!(empty.shape(), &[0]);
        assert_eq!(empty.dtype(), DType::Float64);

        let scalar = CpuBackend::from_nested(Nested::from(7)).unwrap();
        assert_eq!(scalar.ndim(), 0);
        assert_eq!(scalar.size(), 1);
    }

    #[test]
    fn test_from_nested_ragged() {
        let ragged = Nested::from(vec![vec![1, 2], vec![3]]);
        let err = CpuBackend::from_nested(ragged).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let mixed_depth = Nested::list([Nested::from(vec![1, 2]), Nested::from(3)]);
        let err = CpuBackend::from_nested(mixed_depth).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_from_vec() {
        let arr = CpuBackend::from_vec(vec![1.into(), 2.into()], vec![2, 1]).unwrap();
        assert_eq!(arr.shape(), &[2, 1]);
        assert!(CpuBackend::from_vec(vec![1.into()], vec![2]).is_err());
    }

    #[test]
    fn test_from_fn() {
        let arr =
            CpuBackend::from_fn(vec![2, 3], None, |idx| Scalar::Int((idx[0] * 10 + idx[1]) as i64))
                .unwrap();
        assert_eq!(arr.dtype(), DType::Int64);
        assert_eq!(
            arr.to_vec(),
            [0, 1, 2, 10, 11, 12].map(Scalar::Int).to_vec()
        );
    }

    #[test]
    fn test_arange() {
        let arr = CpuBackend::arange(0, 5, 1, None).unwrap();
        assert_eq!(arr.dtype(), DType::Int64);
        assert_eq!(arr.as_f64_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_arange_step() {
        let arr = CpuBackend::arange(0, 10, 3, None).unwrap();
        assert_eq!(arr.as_f64_vec(), vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_arange_negative_step() {
        let arr = CpuBackend::arange(5, 0, -1, None).unwrap();
        assert_eq!(arr.as_f64_vec(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_arange_float() {
        let arr = CpuBackend::arange(0.0, 1.0, 0.25, None).unwrap();
        assert_eq!(arr.dtype(), DType::Float64);
        assert_eq!(arr.as_f64_vec(), vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_arange_empty_and_dtype() {
        assert_eq!(CpuBackend::arange(5, 5, 1, None).unwrap().size(), 0);
        assert_eq!(CpuBackend::arange(5, 0, 1, None).unwrap().size(), 0);
        let f = CpuBackend::arange(0, 3, 1, Some(DType::Float32)).unwrap();
        assert_eq!(f.dtype(), DType::Float32);
    }

    #[test]
    fn test_arange_zero_step() {
        let err = CpuBackend::arange(0, 5, 0, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(CpuBackend::arange(0.0, 5.0, 0.0, None).is_err());
    }

    #[test]
    fn test_linspace() {
        let arr = CpuBackend::linspace(0.0, 1.0, 5);
        let data = arr.as_f64_vec();
        assert_eq!(data.len(), 5);
        assert!((data[0] - 0.0).abs() < 1e-10);
        assert!((data[2] - 0.5).abs() < 1e-10);
        assert_eq!(data[4], 1.0);
        assert_eq!(CpuBackend::linspace(3.0, 9.0, 1).as_f64_vec(), vec![3.0]);
        assert_eq!(CpuBackend::linspace(3.0, 9.0, 0).size(), 0);
    }

    #[test]
    fn test_identity() {
        let arr = CpuBackend::identity(3, None);
        assert_eq!(arr.shape(), &[3, 3]);
        let data = arr.as_f64_vec();
        assert_eq!(data[0], 1.0); // [0,0]
        assert_eq!(data[1], 0.0); // [0,1]
        assert_eq!(data[4], 1.0); // [1,1]
        assert_eq!(data[8], 1.0); // [2,2]
        let ints = CpuBackend::identity(2, Some(DType::Int64));
        assert_eq!(ints.to_vec(), [1, 0, 0, 1].map(Scalar::Int).to_vec());
    }

    #[test]
    fn test_scalar() {
        let s = CpuBackend::scalar(Scalar::Float(2.5));
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.dtype(), DType::Float64);
        assert!(!s.is_view());
    }
}
