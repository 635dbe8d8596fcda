pub use rle_vec::{Operand, RleVec, Run};

pub mod rle_vec;
