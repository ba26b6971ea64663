//! Typed element buffers
//!
//! A [`Buffer`] is the flat, contiguous allocation shared by an owning
//! array and all of its views. Positions are raw buffer offsets; the strided
//! layout that maps logical indices to offsets lives in `ArrayMeta`.

use ndstride_core::{DType, Result, Scalar};

#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Object(Vec<Scalar>),
}

impl Buffer {
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::Bool(_) => DType::Bool,
            Buffer::Int32(_) => DType::Int32,
            Buffer::Int64(_) => DType::Int64,
            Buffer::Float32(_) => DType::Float32,
            Buffer::Float64(_) => DType::Float64,
            Buffer::Object(_) => DType::Object,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Buffer::Bool(v) => v.len(),
            Buffer::Int32(v) => v.len(),
            Buffer::Int64(v) => v.len(),
            Buffer::Float32(v) => v.len(),
            Buffer::Float64(v) => v.len(),
            Buffer::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn zeros(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::Bool => Buffer::Bool(vec![false; len]),
            DType::Int32 => Buffer::Int32(vec![0; len]),
            DType::Int64 => Buffer::Int64(vec![0; len]),
            DType::Float32 => Buffer::Float32(vec![0.0; len]),
            DType::Float64 => Buffer::Float64(vec![0.0; len]),
            DType::Object => Buffer::Object(vec![Scalar::Int(0); len]),
        }
    }

    pub fn ones(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::Bool => Buffer::Bool(vec![true; len]),
            DType::Int32 => Buffer::Int32(vec![1; len]),
            DType::Int64 => Buffer::Int64(vec![1; len]),
            DType::Float32 => Buffer::Float32(vec![1.0; len]),
            DType::Float64 => Buffer::Float64(vec![1.0; len]),
            DType::Object => Buffer::Object(vec![Scalar::Int(1); len]),
        }
    }

    /// `len` copies of `value` cast to `dtype`.
    pub fn filled(dtype: DType, len: usize, value: &Scalar) -> Result<Self> {
        let mut buffer = Buffer::zeros(dtype, len);
        let value = value.cast(dtype)?;
        for offset in 0..len {
            buffer.put(offset, value.clone());
        }
        Ok(buffer)
    }

    /// Single-element buffer in the value's natural dtype.
    pub fn from_scalar(value: Scalar) -> Self {
        match value {
            Scalar::Bool(b) => Buffer::Bool(vec![b]),
            Scalar::Int(i) => Buffer::Int64(vec![i]),
            Scalar::Float(f) => Buffer::Float64(vec![f]),
            Scalar::Text(_) => Buffer::Object(vec![value]),
        }
    }

    /// Cast every value to `dtype`. Fails on the first value that cannot be
    /// represented.
    pub fn from_values(dtype: DType, values: &[Scalar]) -> Result<Self> {
        let mut buffer = Buffer::zeros(dtype, values.len());
        for (offset, value) in values.iter().enumerate() {
            buffer.put(offset, value.cast(dtype)?);
        }
        Ok(buffer)
    }

    /// Float kernel output; `Float32` rounds each value.
    pub fn from_f64s(dtype: DType, values: Vec<f64>) -> Self {
        match dtype {
            DType::Float32 => Buffer::Float32(values.into_iter().map(|x| x as f32).collect()),
            DType::Float64 => Buffer::Float64(values),
            other => {
                let mut buffer = Buffer::zeros(other, values.len());
                for (offset, x) in values.into_iter().enumerate() {
                    buffer.put(offset, Scalar::Float(x));
                }
                buffer
            }
        }
    }

    /// Integer kernel output; `Int32` wraps each value.
    pub fn from_i64s(dtype: DType, values: Vec<i64>) -> Self {
        match dtype {
            DType::Int32 => Buffer::Int32(values.into_iter().map(|x| x as i32).collect()),
            DType::Int64 => Buffer::Int64(values),
            DType::Bool => Buffer::Bool(values.into_iter().map(|x| x != 0).collect()),
            other => {
                let mut buffer = Buffer::zeros(other, values.len());
                for (offset, x) in values.into_iter().enumerate() {
                    buffer.put(offset, Scalar::Int(x));
                }
                buffer
            }
        }
    }

    pub fn get(&self, offset: usize) -> Scalar {
        match self {
            Buffer::Bool(v) => Scalar::Bool(v[offset]),
            Buffer::Int32(v) => Scalar::Int(i64::from(v[offset])),
            Buffer::Int64(v) => Scalar::Int(v[offset]),
            Buffer::Float32(v) => Scalar::Float(f64::from(v[offset])),
            Buffer::Float64(v) => Scalar::Float(v[offset]),
            Buffer::Object(v) => v[offset].clone(),
        }
    }

    /// Numeric read; text reads as NaN.
    pub fn get_f64(&self, offset: usize) -> f64 {
        match self {
            Buffer::Bool(v) => f64::from(u8::from(v[offset])),
            Buffer::Int32(v) => f64::from(v[offset]),
            Buffer::Int64(v) => v[offset] as f64,
            Buffer::Float32(v) => f64::from(v[offset]),
            Buffer::Float64(v) => v[offset],
            Buffer::Object(v) => v[offset].as_f64().unwrap_or(f64::NAN),
        }
    }

    /// Integer read; floats truncate, text reads as 0.
    pub fn get_i64(&self, offset: usize) -> i64 {
        match self {
            Buffer::Bool(v) => i64::from(v[offset]),
            Buffer::Int32(v) => i64::from(v[offset]),
            Buffer::Int64(v) => v[offset],
            Buffer::Float32(v) => v[offset] as i64,
            Buffer::Float64(v) => v[offset] as i64,
            Buffer::Object(v) => v[offset].as_i64().unwrap_or_default(),
        }
    }

    pub fn get_bool(&self, offset: usize) -> bool {
        match self {
            Buffer::Bool(v) => v[offset],
            _ => self.get(offset).as_bool().unwrap_or(false),
        }
    }

    /// Cast `value` to this buffer's dtype and store it. Nothing is written
    /// when the cast fails.
    pub fn set(&mut self, offset: usize, value: &Scalar) -> Result<()> {
        let value = value.cast(self.dtype())?;
        self.put(offset, value);
        Ok(())
    }

    /// Store a value already representable in this buffer's dtype.
    pub(crate) fn put(&mut self, offset: usize, value: Scalar) {
        match self {
            Buffer::Bool(v) => v[offset] = value.as_bool().unwrap_or(false),
            Buffer::Int32(v) => v[offset] = value.as_i64().unwrap_or_default() as i32,
            Buffer::Int64(v) => v[offset] = value.as_i64().unwrap_or_default(),
            Buffer::Float32(v) => v[offset] = value.as_f64().unwrap_or(f64::NAN) as f32,
            Buffer::Float64(v) => v[offset] = value.as_f64().unwrap_or(f64::NAN),
            Buffer::Object(v) => v[offset] = value,
        }
    }

    /// New buffer holding the elements at `offsets`, in iteration order.
    pub fn gather(&self, offsets: impl Iterator<Item = usize>) -> Self {
        match self {
            Buffer::Bool(v) => Buffer::Bool(offsets.map(|o| v[o]).collect()),
            Buffer::Int32(v) => Buffer::Int32(offsets.map(|o| v[o]).collect()),
            Buffer::Int64(v) => Buffer::Int64(offsets.map(|o| v[o]).collect()),
            Buffer::Float32(v) => Buffer::Float32(offsets.map(|o| v[o]).collect()),
            Buffer::Float64(v) => Buffer::Float64(offsets.map(|o| v[o]).collect()),
            Buffer::Object(v) => Buffer::Object(offsets.map(|o| v[o].clone()).collect()),
        }
    }
}
