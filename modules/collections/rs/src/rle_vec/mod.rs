//! Run-length encoded numeric vectors.
//!
//! `RleVec` stores a logical sequence of `dim` elements as an ordered list of maximal runs
//! `(value, count, start)`. Elements can be read and updated individually, and arithmetic,
//! dot products, norms and reductions are computed directly over the runs.

pub use merge2::{merge2, merge_dense, merge_scalar, sweep, Arith, BinaryFn, BinaryOp, Flipped, Sweep};
pub use operand::Operand;
pub use rle_vec::{RleVec, RleVecBuilder};
pub use run::Run;

mod arith;
mod edit;
mod merge2;
mod operand;
mod reduce;
#[allow(clippy::module_inception)]
mod rle_vec;
mod run;
