//! ndstride core - backend traits and common types
//!
//! This crate defines the element model (dtypes, scalar values, nested
//! literals), array layout metadata, index expressions, errors and the
//! operation traits every backend implements.

pub mod array;
pub mod backend;
pub mod config;
pub mod dtype;
pub mod error;
pub mod index;
pub mod ops;
pub mod scalar;

pub use array::{ndindex, Array, ArrayMeta, Offsets};
pub use backend::Backend;
pub use config::PrintOptions;
pub use dtype::{DType, Kind};
pub use error::{ErrorKind, NdError, Result};
pub use index::{AxisSelection, Idx};
pub use scalar::{Nested, Scalar};
