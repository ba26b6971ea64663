//! Element values and nested-sequence literals
//!
//! [`Scalar`] is the dtype-erased value of a single element: it is what
//! element reads return and what fill values, arithmetic operands and
//! `arange` bounds are expressed in. [`Nested`] describes the nested-list
//! input accepted by `from_nested`.

use crate::dtype::{DType, Kind};
use crate::error::{NdError, Result};

/// A single element value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A non-numeric value; arrays holding one get the `Object` dtype.
    Text(String),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Bool(_) => Kind::Bool,
            Scalar::Int(_) => Kind::Int,
            Scalar::Float(_) => Kind::Float,
            Scalar::Text(_) => Kind::Object,
        }
    }

    /// The dtype an array built from this value alone would get.
    pub fn dtype(&self) -> DType {
        DType::default_for(self.kind())
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Scalar::Text(_))
    }

    /// Numeric value as `f64` (`Bool` as 0/1). `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Scalar::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Scalar::Int(i) => Some(i as f64),
            Scalar::Float(f) => Some(f),
            Scalar::Text(_) => None,
        }
    }

    /// Numeric value as `i64`; floats truncate toward zero. `None` for text.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Scalar::Bool(b) => Some(i64::from(b)),
            Scalar::Int(i) => Some(i),
            Scalar::Float(f) => Some(f as i64),
            Scalar::Text(_) => None,
        }
    }

    /// Truthiness of a numeric value. `None` for text.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Scalar::Bool(b) => Some(b),
            Scalar::Int(i) => Some(i != 0),
            Scalar::Float(f) => Some(f != 0.0),
            Scalar::Text(_) => None,
        }
    }

    /// Whether the value is a whole number (used by `arange` dtype inference).
    pub fn is_integral(&self) -> bool {
        matches!(self, Scalar::Bool(_) | Scalar::Int(_))
    }

    /// Convert to the representation stored by `dtype`.
    ///
    /// `Int32` wraps, `Float32` rounds through `f32`, floats truncate into
    /// integers and text is parsed. Anything unparseable is an
    /// [`NdError::InvalidCast`].
    pub fn cast(&self, dtype: DType) -> Result<Scalar> {
        let invalid = || NdError::InvalidCast {
            value: self.to_string(),
            dtype,
        };

        if let Scalar::Text(text) = self {
            return match dtype {
                DType::Object => Ok(self.clone()),
                DType::Bool => match text.trim() {
                    "true" | "True" => Ok(Scalar::Bool(true)),
                    "false" | "False" => Ok(Scalar::Bool(false)),
                    _ => Err(invalid()),
                },
                _ => {
                    let text = text.trim();
                    let parsed = text
                        .parse::<i64>()
                        .map(Scalar::Int)
                        .or_else(|_| text.parse::<f64>().map(Scalar::Float))
                        .map_err(|_| invalid())?;
                    parsed.cast(dtype)
                }
            };
        }

        Ok(match dtype {
            DType::Object => self.clone(),
            DType::Bool => Scalar::Bool(self.as_bool().ok_or_else(invalid)?),
            DType::Int32 => Scalar::Int(i64::from(self.as_i64().ok_or_else(invalid)? as i32)),
            DType::Int64 => Scalar::Int(self.as_i64().ok_or_else(invalid)?),
            DType::Float32 => Scalar::Float(f64::from(self.as_f64().ok_or_else(invalid)? as f32)),
            DType::Float64 => Scalar::Float(self.as_f64().ok_or_else(invalid)?),
        })
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Text(s) => write!(f, "'{s}'"),
        }
    }
}

macro_rules! impl_scalar_from {
    ($variant:ident, $conv:expr, $($ty:ty),+) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant($conv(v))
                }
            }
        )+
    };
}

impl_scalar_from!(Bool, |v| v, bool);
impl_scalar_from!(Int, i64::from, i8, i16, i32, i64, u8, u16, u32);
impl_scalar_from!(Float, f64::from, f32, f64);
impl_scalar_from!(Text, String::from, &str, String);

impl From<usize> for Scalar {
    fn from(v: usize) -> Self {
        Scalar::Int(v as i64)
    }
}

/// A nested sequence literal: either a leaf value or a list of sub-sequences.
///
/// Built most conveniently through the `From` impls:
///
/// ```
/// use ndstride_core::Nested;
///
/// let rows = Nested::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
/// assert_eq!(rows.len(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    Leaf(Scalar),
    List(Vec<Nested>),
}

impl Nested {
    /// Number of direct children, `None` for a leaf.
    pub fn len(&self) -> Option<usize> {
        match self {
            Nested::Leaf(_) => None,
            Nested::List(items) => Some(items.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn list<T: Into<Nested>>(items: impl IntoIterator<Item = T>) -> Self {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_nested_leaf_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Nested {
                fn from(v: $ty) -> Self {
                    Nested::Leaf(v.into())
                }
            }
        )+
    };
}

impl_nested_leaf_from!(
    Scalar, bool, i8, i16, i32, i64, u8, u16, u32, usize, f32, f64, &str, String
);

impl<T: Into<Nested>> From<Vec<T>> for Nested {
    fn from(items: Vec<T>) -> Self {
        Nested::list(items)
    }
}
