//! Backend trait that combines all operations

use crate::array::Array;
use crate::ops::*;

/// A complete backend implementation
///
/// Backends implement the individual operation traits over a single array
/// type and then opt in to this umbrella trait.
pub trait Backend:
    CreationOps
    + IndexOps<Array = <Self as CreationOps>::Array>
    + MathOps<Array = <Self as CreationOps>::Array>
    + StatsOps<Array = <Self as CreationOps>::Array>
    + LinalgOps<Array = <Self as CreationOps>::Array>
    + ManipulationOps<Array = <Self as CreationOps>::Array>
    + CompareOps<Array = <Self as CreationOps>::Array>
where
    <Self as CreationOps>::Array: Array,
{
    /// Backend name for identification
    fn name() -> &'static str;

    /// Backend version
    fn version() -> &'static str;
}
