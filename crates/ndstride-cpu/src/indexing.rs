//! Indexing, slicing and masking for CPU backend

use ndstride_core::{ops::IndexOps, Array, AxisSelection, DType, Idx, NdError, Result, Scalar};

use crate::broadcast::broadcast_to;
use crate::{CpuArray, CpuBackend};

/// Buffer offset of the element at `index`, one entry per axis.
fn element_offset(arr: &CpuArray, index: &[isize]) -> Result<usize> {
    let ndim = arr.ndim();
    if index.len() > ndim {
        return Err(NdError::TooManyIndices {
            ndim,
            given: index.len(),
        });
    }
    if index.len() < ndim {
        return Err(NdError::InvalidArgument(format!(
            "expected {ndim} indices for element access, got {}",
            index.len()
        )));
    }

    let mut offset = arr.offset() as isize;
    for (axis, (&i, (&len, &stride))) in index
        .iter()
        .zip(arr.shape().iter().zip(arr.strides().iter()))
        .enumerate()
    {
        if let AxisSelection::Single(pos) = Idx::At(i).resolve(axis, len)? {
            offset += pos as isize * stride;
        }
    }
    Ok(offset as usize)
}

impl IndexOps for CpuBackend {
    type Array = CpuArray;

    fn slice(arr: &CpuArray, index: &[Idx]) -> Result<CpuArray> {
        let ndim = arr.ndim();
        if index.len() > ndim {
            return Err(NdError::TooManyIndices {
                ndim,
                given: index.len(),
            });
        }

        let mut shape = Vec::with_capacity(ndim);
        let mut strides = Vec::with_capacity(ndim);
        let mut offset = arr.offset() as isize;
        for axis in 0..ndim {
            let (len, stride) = (arr.shape()[axis], arr.strides()[axis]);
            let idx = index.get(axis).copied().unwrap_or(Idx::FULL);
            match idx.resolve(axis, len)? {
                AxisSelection::Single(pos) => offset += pos as isize * stride,
                AxisSelection::Slice { start, step, len } => {
                    offset += start as isize * stride;
                    shape.push(len);
                    strides.push(stride * step);
                }
            }
        }

        Ok(arr.view(shape, strides, offset as usize))
    }

    fn get(arr: &CpuArray, index: &[isize]) -> Result<Scalar> {
        let offset = element_offset(arr, index)?;
        Ok(arr.buffer().get(offset))
    }

    fn set(arr: &CpuArray, index: &[isize], value: Scalar) -> Result<()> {
        let offset = element_offset(arr, index)?;
        arr.buffer_mut().set(offset, &value)
    }

    fn fill(arr: &CpuArray, value: Scalar) -> Result<()> {
        let value = value.cast(arr.dtype())?;
        let mut buffer = arr.buffer_mut();
        for offset in arr.meta().offsets() {
            buffer.put(offset, value.clone());
        }
        Ok(())
    }

    fn assign(dst: &CpuArray, src: &CpuArray) -> Result<()> {
        let src = broadcast_to(src, dst.shape())?;
        // Read everything first: `src` may overlap `dst`.
        let values = src
            .to_vec()
            .iter()
            .map(|v| v.cast(dst.dtype()))
            .collect::<Result<Vec<_>>>()?;

        let mut buffer = dst.buffer_mut();
        for (offset, value) in dst.meta().offsets().zip(values) {
            buffer.put(offset, value);
        }
        Ok(())
    }

    fn mask(arr: &CpuArray, mask: &CpuArray) -> Result<CpuArray> {
        if mask.dtype() != DType::Bool {
            return Err(NdError::InvalidArgument(format!(
                "mask must have dtype bool, got {}",
                mask.dtype()
            )));
        }
        if mask.shape() != arr.shape() {
            return Err(NdError::ShapeMismatch {
                expected: arr.shape().to_vec(),
                got: mask.shape().to_vec(),
            });
        }

        let selected: Vec<usize> = {
            let mask_buffer = mask.buffer();
            arr.meta()
                .offsets()
                .zip(mask.meta().offsets())
                .filter(|&(_, mo)| mask_buffer.get_bool(mo))
                .map(|(o, _)| o)
                .collect()
        };
        let len = selected.len();
        let buffer = arr.buffer().gather(selected.into_iter());
        Ok(CpuArray::from_buffer(buffer, vec![len]))
    }

    fn item(arr: &CpuArray) -> Result<Scalar> {
        if arr.size() != 1 {
            return Err(NdError::InvalidArgument(format!(
                "can only convert an array of size 1 to a scalar, got size {}",
                arr.size()
            )));
        }
        arr.get_flat(0).ok_or(NdError::IndexOutOfBounds {
            index: 0,
            axis: 0,
            size: arr.size(),
        })
    }
}
