use eyre::Result;

use rlekit_core_rs::num::Element;

use super::merge2::{merge2, merge_dense, merge_scalar, BinaryOp};
use super::RleVec;

/// The right-hand side of a binary vector operation.
///
/// The operand kind is resolved once per call, and the operation is dispatched to the
/// synchronized sweep (compressed), the run-by-run walk with direct indexing (dense), or the
/// broadcast over runs (scalar).
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Operand<'a, V> {
    Compressed(&'a RleVec<V>),
    Dense(&'a [V]),
    Scalar(V),
}

impl<'a, V: Element> Operand<'a, V> {
    /// Logical length of the operand, `None` for scalars which broadcast to any length.
    pub fn dim(&self) -> Option<usize> {
        match self {
            Operand::Compressed(rle) => Some(rle.dim()),
            Operand::Dense(dense) => Some(dense.len()),
            Operand::Scalar(_) => None,
        }
    }

    /// Compute `op(lhs[i], self[i])` for every element.
    pub fn combine(self, lhs: &RleVec<V>, op: impl BinaryOp<V>) -> Result<RleVec<V>> {
        match self {
            Operand::Compressed(rhs) => merge2(lhs, rhs, op),
            Operand::Dense(rhs) => merge_dense(lhs, rhs, op),
            Operand::Scalar(rhs) => Ok(merge_scalar(lhs, rhs, op)),
        }
    }
}

impl<'a, V> From<&'a RleVec<V>> for Operand<'a, V> {
    fn from(rle: &'a RleVec<V>) -> Self {
        Operand::Compressed(rle)
    }
}

impl<'a, V> From<&'a [V]> for Operand<'a, V> {
    fn from(dense: &'a [V]) -> Self {
        Operand::Dense(dense)
    }
}

impl<'a, V> From<&'a Vec<V>> for Operand<'a, V> {
    fn from(dense: &'a Vec<V>) -> Self {
        Operand::Dense(dense)
    }
}

impl<'a, V, const N: usize> From<&'a [V; N]> for Operand<'a, V> {
    fn from(dense: &'a [V; N]) -> Self {
        Operand::Dense(dense)
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for Operand<'_, $t> {
                fn from(scalar: $t) -> Self {
                    Operand::Scalar(scalar)
                }
            }
        )+
    };
}

impl_from_scalar!(i8, i16, i32, i64, isize, f32, f64);
