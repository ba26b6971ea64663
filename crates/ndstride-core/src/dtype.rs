//! Data types supported by ndstride
//!
//! Element kinds form a closed set. Mixing kinds goes through an explicit
//! promotion table ([`DType::promote`]) rather than dynamic typing:
//!
//! ```text
//! Bool < Int32 < Int64 < Float32 < Float64      Object absorbs everything
//! ```
//!
//! with the one irregularity that any integer combined with `Float32` yields
//! `Float64`, since `Float32` cannot represent every 32/64-bit integer.

use serde::{Deserialize, Serialize};

use crate::error::{NdError, Result};

/// Supported data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Opaque values that could not be unified numerically. Arithmetic is
    /// disabled for this kind.
    Object,
}

/// The element kind lattice used for promotion: `Bool < Int < Float < Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Bool,
    Int,
    Float,
    Object,
}

impl DType {
    /// Size in bytes
    pub fn size(&self) -> usize {
        match self {
            DType::Bool => 1,
            DType::Int32 | DType::Float32 => 4,
            DType::Int64 | DType::Float64 => 8,
            DType::Object => std::mem::size_of::<usize>(),
        }
    }

    /// String representation (NumPy compatible)
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Object => "object",
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            DType::Bool => Kind::Bool,
            DType::Int32 | DType::Int64 => Kind::Int,
            DType::Float32 | DType::Float64 => Kind::Float,
            DType::Object => Kind::Object,
        }
    }

    /// The default dtype chosen for a kind when nothing narrower is implied.
    pub fn default_for(kind: Kind) -> DType {
        match kind {
            Kind::Bool => DType::Bool,
            Kind::Int => DType::Int64,
            Kind::Float => DType::Float64,
            Kind::Object => DType::Object,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.kind() == Kind::Int
    }

    pub fn is_float(&self) -> bool {
        self.kind() == Kind::Float
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() != Kind::Object
    }

    /// Smallest dtype both operands can be represented in.
    pub fn promote(a: DType, b: DType) -> DType {
        use DType::*;

        match (a, b) {
            (Object, _) | (_, Object) => Object,
            (x, y) if x == y => x,
            (Bool, x) | (x, Bool) => x,
            (Int32, Int64) | (Int64, Int32) => Int64,
            (Float32, Float64) | (Float64, Float32) => Float64,
            // Any remaining pair mixes an integer with a float.
            _ => Float64,
        }
    }

    /// Result dtype of `+`, `-`, `*`, `%`, `pow`, `maximum`, `minimum`.
    ///
    /// Booleans are treated as integers, so `Bool ⊗ Bool` yields `Int64`.
    pub fn arithmetic_result(op: &'static str, a: DType, b: DType) -> Result<DType> {
        for dtype in [a, b] {
            if dtype == DType::Object {
                return Err(NdError::UnsupportedDType { op, dtype });
            }
        }
        Ok(match DType::promote(a, b) {
            DType::Bool => DType::Int64,
            other => other,
        })
    }

    /// Result dtype of true division: always a float kind.
    pub fn division_result(a: DType, b: DType) -> Result<DType> {
        let dtype = DType::arithmetic_result("divide", a, b)?;
        Ok(if dtype.is_float() {
            dtype
        } else {
            DType::Float64
        })
    }

    /// Result dtype when combining an array with a bare scalar of `kind`.
    ///
    /// Scalars are "weak": they never widen the array within its own kind,
    /// e.g. an `Int32` array plus `5` stays `Int32`, while an `Int32` array
    /// plus `2.5` becomes `Float64`.
    pub fn weak_promote(array: DType, scalar: Kind) -> DType {
        if scalar <= array.kind() {
            array
        } else {
            DType::promote(array, DType::default_for(scalar))
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for DType {
    fn default() -> Self {
        DType::Float64
    }
}
