//! Array creation tests - NumPy compatible

#[cfg(test)]
mod tests {
    use crate::utils::*;
    use ndstride_core::{ops::CreationOps, Array, DType, ErrorKind, Nested, Scalar};
    use ndstride_cpu::CpuBackend;

    // ============ From nested literals ============

    #[test]
    fn test_from_nested_infers_dtype() {
        init_logging();
        let ints = CpuBackend::from_nested(Nested::from(vec![1, 2, 3])).unwrap();
        assert_eq!(ints.dtype(), DType::Int64);

        let floats = CpuBackend::from_nested(Nested::from(vec![1.0, 2.5])).unwrap();
        assert_eq!(floats.dtype(), DType::Float64);

        let bools = CpuBackend::from_nested(Nested::from(vec![true, false])).unwrap();
        assert_eq!(bools.dtype(), DType::Bool);

        let text = CpuBackend::from_nested(Nested::from(vec!["a", "b"])).unwrap();
        assert_eq!(text.dtype(), DType::Object);
    }

    #[test]
    fn test_from_nested_mixed_kinds_promote() {
        let mixed = CpuBackend::from_nested(Nested::list(vec![
            Nested::from(1),
            Nested::from(2.5),
            Nested::from(true),
        ]))
        .unwrap();
        assert_eq!(mixed.dtype(), DType::Float64);
        assert_eq!(mixed.as_f64_vec(), vec![1.0, 2.5, 1.0]);
    }

    #[test]
    fn test_from_nested_2d() {
        let a = CpuBackend::from_nested(Nested::from(vec![vec![1, 2, 3], vec![4, 5, 6]])).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a.strides(), &[3, 1]);
        assert_eq!(a.get_flat(4), Some(Scalar::Int(5)));
    }

    #[test]
    fn test_from_nested_scalar_is_0d() {
        let a = CpuBackend::from_nested(Nested::from(7)).unwrap();
        assert_eq!(a.ndim(), 0);
        assert_eq!(a.size(), 1);
    }

    #[test]
    fn test_from_nested_empty() {
        let a = CpuBackend::from_nested(Nested::list(Vec::<Nested>::new())).unwrap();
        assert_eq!(a.shape(), &[0]);
        assert_eq!(a.dtype(), DType::Float64);
    }

    #[test]
    fn test_ragged_is_shape_error() {
        let ragged = Nested::list(vec![Nested::from(vec![1, 2]), Nested::from(vec![3])]);
        let err = CpuBackend::from_nested(ragged).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let mixed_depth = Nested::list(vec![Nested::from(vec![1, 2]), Nested::from(3)]);
        let err = CpuBackend::from_nested(mixed_depth).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_from_vec() {
        let a = CpuBackend::from_vec(vec![Scalar::Int(1), Scalar::Float(0.5)], vec![2]).unwrap();
        assert_eq!(a.dtype(), DType::Float64);
        let err = CpuBackend::from_vec(vec![Scalar::Int(1)], vec![2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    // ============ Filled arrays ============

    #[test]
    fn test_zeros_ones_full() {
        let z = CpuBackend::zeros(vec![2, 3], None);
        assert_eq!(z.dtype(), DType::Float64);
        assert_eq!(z.as_f64_vec(), vec![0.0; 6]);

        let o = CpuBackend::ones(vec![4], Some(DType::Int32));
        assert_eq!(o.dtype(), DType::Int32);
        assert_eq!(o.to_vec(), vec![Scalar::Int(1); 4]);

        let f = CpuBackend::full(vec![2, 2], Scalar::Float(7.5), None).unwrap();
        assert_eq!(f.as_f64_vec(), vec![7.5; 4]);

        let err = CpuBackend::full(vec![2], Scalar::from("x"), Some(DType::Int64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_from_fn() {
        let a = CpuBackend::from_fn(vec![2, 3], None, |idx| Scalar::Int((idx[0] * 10 + idx[1]) as i64))
            .unwrap();
        assert_eq!(a.dtype(), DType::Int64);
        assert_eq!(
            a.to_vec(),
            [0, 1, 2, 10, 11, 12].map(Scalar::Int).to_vec()
        );
    }

    // ============ Ranges ============

    #[test]
    fn test_arange_int() {
        let a = CpuBackend::arange(0, 5, 1, None).unwrap();
        assert_eq!(a.dtype(), DType::Int64);
        assert_eq!(a.to_vec(), (0..5).map(Scalar::Int).collect::<Vec<_>>());

        let b = CpuBackend::arange(10, 0, -3, None).unwrap();
        assert_eq!(b.to_vec(), [10, 7, 4, 1].map(Scalar::Int).to_vec());
    }

    #[test]
    fn test_arange_float() {
        let a = CpuBackend::arange(0.0, 1.0, 0.25, None).unwrap();
        assert_eq!(a.dtype(), DType::Float64);
        assert!(arrays_approx_eq(
            &a,
            &CpuBackend::from_nested(Nested::from(vec![0.0, 0.25, 0.5, 0.75])).unwrap(),
            DEFAULT_TOL
        ));
    }

    #[test]
    fn test_arange_zero_step() {
        let err = CpuBackend::arange(0, 10, 0, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_linspace() {
        let a = CpuBackend::linspace(0.0, 1.0, 5);
        assert_eq!(a.as_f64_vec(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        let third = CpuBackend::linspace(0.0, 1.0, 4);
        let data = third.as_f64_vec();
        assert!(approx_eq(data[1], 1.0 / 3.0, DEFAULT_TOL));
        assert_eq!(data[3], 1.0);

        assert_eq!(CpuBackend::linspace(2.0, 3.0, 1).as_f64_vec(), vec![2.0]);
        assert_eq!(CpuBackend::linspace(2.0, 3.0, 0).size(), 0);
    }

    #[test]
    fn test_identity() {
        let eye = CpuBackend::identity(3, None);
        assert_eq!(eye.shape(), &[3, 3]);
        assert_eq!(
            eye.as_f64_vec(),
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }
}
