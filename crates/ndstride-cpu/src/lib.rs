//! CPU Backend for ndstride
//!
//! Arrays are strided views over a reference-counted typed buffer. Slicing,
//! transposing and broadcasting only build new views; faer handles float
//! matrix products.

mod array;
pub mod broadcast;
mod compare;
mod creation;
mod display;
mod indexing;
mod linalg;
mod manipulation;
mod math;
mod stats;
pub mod storage;

pub use array::CpuArray;
pub use broadcast::{broadcast_binary_op, broadcast_shapes, broadcast_to};
pub use display::{print_options, set_print_options, with_print_options};
pub use storage::Buffer;

use ndstride_core::Backend;

/// CPU backend over shared typed buffers
pub struct CpuBackend;

impl Backend for CpuBackend {
    fn name() -> &'static str {
        "cpu"
    }

    fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

// Re-export the array type
pub type Array = CpuArray;
