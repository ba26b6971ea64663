//! Array manipulation operations for CPU backend
//!
//! Everything that only rearranges metadata (transpose, squeeze,
//! expand_dims, reshape/ravel of contiguous data) returns a view. The rest
//! allocates.

use log::debug;
use ndstride_core::{
    ops::{CreationOps, IndexOps, ManipulationOps},
    Array, ArrayMeta, DType, Idx, NdError, Result,
};

use crate::storage::Buffer;
use crate::{CpuArray, CpuBackend};

impl ManipulationOps for CpuBackend {
    type Array = CpuArray;

    fn copy(arr: &CpuArray) -> CpuArray {
        CpuArray::from_buffer(arr.gather(), arr.shape().to_vec())
    }

    fn astype(arr: &CpuArray, dtype: DType) -> Result<CpuArray> {
        let buffer = if arr.dtype() == dtype {
            arr.gather()
        } else {
            Buffer::from_values(dtype, &arr.to_vec())?
        };
        Ok(CpuArray::from_buffer(buffer, arr.shape().to_vec()))
    }

    fn reshape(arr: &CpuArray, shape: Vec<usize>) -> Result<CpuArray> {
        let expected_size: usize = shape.iter().product();
        if arr.size() != expected_size {
            return Err(NdError::InvalidShape(format!(
                "Cannot reshape array of size {} into shape {:?}",
                arr.size(),
                shape
            )));
        }

        if arr.is_contiguous() {
            let strides = ArrayMeta::compute_strides(&shape);
            return Ok(arr.view(shape, strides, arr.offset()));
        }

        debug!(
            "reshape {:?} -> {:?}: source strides {:?} are not contiguous, copying",
            arr.shape(),
            shape,
            arr.strides()
        );
        Ok(CpuArray::from_buffer(arr.gather(), shape))
    }

    fn flatten(arr: &CpuArray) -> CpuArray {
        CpuArray::from_buffer(arr.gather(), vec![arr.size()])
    }

    fn ravel(arr: &CpuArray) -> CpuArray {
        if arr.is_contiguous() {
            return arr.view(vec![arr.size()], vec![1], arr.offset());
        }
        debug!("ravel {:?}: non-contiguous source, copying", arr.shape());
        Self::flatten(arr)
    }

    fn squeeze(arr: &CpuArray) -> CpuArray {
        let (shape, strides): (Vec<usize>, Vec<isize>) = arr
            .shape()
            .iter()
            .zip(arr.strides().iter())
            .filter(|(&len, _)| len != 1)
            .map(|(&len, &stride)| (len, stride))
            .unzip();
        arr.view(shape, strides, arr.offset())
    }

    fn expand_dims(arr: &CpuArray, axis: usize) -> Result<CpuArray> {
        let mut shape = arr.shape().to_vec();
        if axis > shape.len() {
            return Err(NdError::InvalidAxis {
                axis,
                ndim: shape.len(),
            });
        }
        let mut strides = arr.strides().to_vec();
        shape.insert(axis, 1);
        strides.insert(axis, 0);
        Ok(arr.view(shape, strides, arr.offset()))
    }

    fn transpose(arr: &CpuArray, axes: Option<&[usize]>) -> Result<CpuArray> {
        let ndim = arr.ndim();
        let perm: Vec<usize> = match axes {
            Some(axes) => {
                let mut seen = vec![false; ndim];
                let valid = axes.len() == ndim
                    && axes
                        .iter()
                        .all(|&a| a < ndim && !std::mem::replace(&mut seen[a], true));
                if !valid {
                    return Err(NdError::InvalidArgument(format!(
                        "axes {axes:?} are not a permutation of {ndim} dimensions"
                    )));
                }
                axes.to_vec()
            }
            None => (0..ndim).rev().collect(),
        };

        let shape = perm.iter().map(|&a| arr.shape()[a]).collect();
        let strides = perm.iter().map(|&a| arr.strides()[a]).collect();
        Ok(arr.view(shape, strides, arr.offset()))
    }

    fn concatenate(arrays: &[&CpuArray], axis: usize) -> Result<CpuArray> {
        let first = arrays.first().ok_or_else(|| {
            NdError::InvalidArgument("Cannot concatenate empty array list".to_string())
        })?;

        let first_shape = first.shape();
        if first_shape.is_empty() {
            return Err(NdError::InvalidArgument(
                "zero-dimensional arrays cannot be concatenated".to_string(),
            ));
        }
        if axis >= first_shape.len() {
            return Err(NdError::InvalidAxis {
                axis,
                ndim: first_shape.len(),
            });
        }

        // Verify all arrays have compatible shapes
        for arr in arrays.iter().skip(1) {
            let shape = arr.shape();
            let compatible = shape.len() == first_shape.len()
                && first_shape
                    .iter()
                    .zip(shape.iter())
                    .enumerate()
                    .all(|(i, (&s1, &s2))| i == axis || s1 == s2);
            if !compatible {
                return Err(NdError::IncompatibleShapes(
                    first_shape.to_vec(),
                    shape.to_vec(),
                ));
            }
        }

        let dtype = arrays
            .iter()
            .map(|a| a.dtype())
            .reduce(DType::promote)
            .unwrap_or_default();
        let mut shape = first_shape.to_vec();
        shape[axis] = arrays.iter().map(|a| a.shape()[axis]).sum();
        let out = CpuBackend::zeros(shape, Some(dtype));

        // Copy each input into its band of the output
        let mut start = 0;
        for arr in arrays {
            let len = arr.shape()[axis];
            let mut index = vec![Idx::FULL; axis + 1];
            index[axis] = Idx::range(start as isize, (start + len) as isize);
            let band = CpuBackend::slice(&out, &index)?;
            CpuBackend::assign(&band, arr)?;
            start += len;
        }

        Ok(out)
    }

    fn stack(arrays: &[&CpuArray], axis: usize) -> Result<CpuArray> {
        let first = arrays.first().ok_or_else(|| {
            NdError::InvalidArgument("Cannot stack empty array list".to_string())
        })?;

        let first_shape = first.shape();
        for arr in arrays.iter().skip(1) {
            if arr.shape() != first_shape {
                return Err(NdError::IncompatibleShapes(
                    first_shape.to_vec(),
                    arr.shape().to_vec(),
                ));
            }
        }

        // Expand dims then concatenate
        let expanded = arrays
            .iter()
            .map(|a| Self::expand_dims(a, axis))
            .collect::<Result<Vec<CpuArray>>>()?;
        let refs: Vec<&CpuArray> = expanded.iter().collect();
        Self::concatenate(&refs, axis)
    }
}
