//! Error types for ndstride

use thiserror::Error;

use crate::dtype::DType;

/// Coarse classification of every [`NdError`].
///
/// Callers that only care about *what went wrong* (rather than the exact
/// variant) can match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operand or result shapes are incompatible.
    Shape,
    /// A structurally invalid argument.
    Value,
    /// An index or slice bound outside the axis.
    Index,
    /// Integer division by zero.
    Arithmetic,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NdError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Incompatible shapes for operation: {0:?} and {1:?}")]
    IncompatibleShapes(Vec<usize>, Vec<usize>),

    #[error("Inhomogeneous nested sequence at depth {depth}: {detail}")]
    RaggedNesting { depth: usize, detail: String },

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Index {index} out of bounds for axis {axis} of size {size}")]
    IndexOutOfBounds {
        index: isize,
        axis: usize,
        size: usize,
    },

    #[error("Too many indices: array is {ndim}-dimensional, but {given} were indexed")]
    TooManyIndices { ndim: usize, given: usize },

    #[error("Invalid axis: {axis} for array with {ndim} dimensions")]
    InvalidAxis { axis: usize, ndim: usize },

    #[error("Operation {op} is not supported for dtype {dtype}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    #[error("Cannot cast {value} to dtype {dtype}")]
    InvalidCast { value: String, dtype: DType },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Integer division by zero")]
    DivisionByZero,
}

impl NdError {
    /// The coarse kind this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NdError::ShapeMismatch { .. }
            | NdError::IncompatibleShapes(..)
            | NdError::RaggedNesting { .. } => ErrorKind::Shape,
            NdError::IndexOutOfBounds { .. } | NdError::TooManyIndices { .. } => ErrorKind::Index,
            NdError::DivisionByZero => ErrorKind::Arithmetic,
            NdError::InvalidShape(_)
            | NdError::InvalidAxis { .. }
            | NdError::UnsupportedDType { .. }
            | NdError::InvalidCast { .. }
            | NdError::InvalidArgument(_) => ErrorKind::Value,
        }
    }
}

pub type Result<T> = std::result::Result<T, NdError>;
