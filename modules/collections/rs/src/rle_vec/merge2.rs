use std::marker::PhantomData;

use ::impl_tools::autoimpl;
use derive_more::Display;
use eyre::Result;

use rlekit_core_rs::num::Element;
use rlekit_core_rs::RleError;

use super::{RleVec, Run};

/// Binary elementwise operation applied by `merge2` to a pair of run values.
#[autoimpl(for <M: trait + ?Sized> &mut M, Box<M>)]
pub trait BinaryOp<T> {
    fn apply(&mut self, first: &T, second: &T) -> T;
}

/// Elementwise arithmetic supported by the vector operator set.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Display)]
pub enum Arith {
    #[display("+")]
    Add,
    #[display("-")]
    Sub,
    #[display("*")]
    Mul,
    #[display("/")]
    Div,
}

impl<T: Element> BinaryOp<T> for Arith {
    #[inline(always)]
    fn apply(&mut self, first: &T, second: &T) -> T {
        match self {
            Arith::Add => *first + *second,
            Arith::Sub => *first - *second,
            Arith::Mul => *first * *second,
            Arith::Div => *first / *second,
        }
    }
}

/// Swap the operands of the wrapped operation, `apply(a, b) == inner.apply(b, a)`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Flipped<M>(pub M);

impl<T, M: BinaryOp<T>> BinaryOp<T> for Flipped<M> {
    #[inline(always)]
    fn apply(&mut self, first: &T, second: &T) -> T {
        self.0.apply(second, first)
    }
}

/// Wrap an arbitrary closure as a `BinaryOp`.
pub struct BinaryFn<T, F>
where
    F: FnMut(&T, &T) -> T,
{
    func: F,
    _phantom: PhantomData<T>,
}

impl<T, F> BinaryFn<T, F>
where
    F: FnMut(&T, &T) -> T,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _phantom: Default::default(),
        }
    }
}

impl<T, F> BinaryOp<T> for BinaryFn<T, F>
where
    F: FnMut(&T, &T) -> T,
{
    #[inline(always)]
    fn apply(&mut self, first: &T, second: &T) -> T {
        (self.func)(first, second)
    }
}

/// Synchronized sweep over two run lists covering the same number of elements.
///
/// Yields `(first, second, step)` segments: the pair of values that holds for the next `step`
/// elements of both sequences. Each step advances by the smaller of the two remaining run
/// lengths, so the total number of segments is at most `first.len() + second.len()`.
pub struct Sweep<'a, V> {
    first: &'a [Run<V>],
    second: &'a [Run<V>],
    // Current run index and the number of its elements that are not consumed yet
    first_cursor: (usize, usize),
    second_cursor: (usize, usize),
}

impl<'a, V> Sweep<'a, V> {
    fn new(first: &'a [Run<V>], second: &'a [Run<V>]) -> Self {
        let first_remaining = first.first().map_or(0, |run| run.count);
        let second_remaining = second.first().map_or(0, |run| run.count);
        Self {
            first,
            second,
            first_cursor: (0, first_remaining),
            second_cursor: (0, second_remaining),
        }
    }

    #[inline(always)]
    fn advance(runs: &[Run<V>], cursor: &mut (usize, usize), step: usize) {
        cursor.1 -= step;
        if cursor.1 == 0 {
            cursor.0 += 1;
            if let Some(run) = runs.get(cursor.0) {
                cursor.1 = run.count;
            }
        }
    }
}

impl<'a, V> Iterator for Sweep<'a, V> {
    type Item = (&'a V, &'a V, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (first, second) = (self.first, self.second);
        let first = first.get(self.first_cursor.0)?;
        let second = second.get(self.second_cursor.0)?;

        let step = self.first_cursor.1.min(self.second_cursor.1);
        debug_assert!(step > 0);

        Self::advance(self.first, &mut self.first_cursor, step);
        Self::advance(self.second, &mut self.second_cursor, step);

        Some((&first.value, &second.value, step))
    }
}

/// Start a synchronized sweep over two vectors of equal dimension.
pub fn sweep<'a, V: Element>(first: &'a RleVec<V>, second: &'a RleVec<V>) -> Result<Sweep<'a, V>> {
    RleError::check_dim(first.dim, second.dim)?;
    Ok(Sweep::new(&first.runs, &second.runs))
}

/// Elementwise `op(first[i], second[i])` computed over the runs of both vectors.
/// The result is coalesced on the fly, O(|first.runs| + |second.runs|).
pub fn merge2<V: Element>(
    first: &RleVec<V>,
    second: &RleVec<V>,
    mut op: impl BinaryOp<V>,
) -> Result<RleVec<V>> {
    let segments = sweep(first, second)?;

    let mut result = RleVec::with_run_capacity(first.num_runs().max(second.num_runs()));
    for (first, second, step) in segments {
        result.push_run(op.apply(first, second), step);
    }

    debug_assert_eq!(result.dim, first.dim);
    Ok(result)
}

/// Elementwise `op(rle[i], dense[i])`. The compressed side is walked run by run while the dense
/// side is indexed directly.
pub fn merge_dense<V: Element>(
    rle: &RleVec<V>,
    dense: &[V],
    mut op: impl BinaryOp<V>,
) -> Result<RleVec<V>> {
    RleError::check_dim(rle.dim, dense.len())?;
    log::trace!("Merging a {}-dim RLE vector with a dense operand", rle.dim);

    let mut result = RleVec::with_run_capacity(rle.num_runs());
    for run in &rle.runs {
        for value in &dense[run.start..run.end()] {
            result.push_run(op.apply(&run.value, value), 1);
        }
    }
    Ok(result)
}

/// Broadcast `op(rle[i], scalar)` over all runs in a single pass.
pub fn merge_scalar<V: Element>(rle: &RleVec<V>, scalar: V, mut op: impl BinaryOp<V>) -> RleVec<V> {
    let mut result = RleVec::with_run_capacity(rle.num_runs());
    for run in &rle.runs {
        result.push_run(op.apply(&run.value, &scalar), run.count);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triples<V: Element>(rle: &RleVec<V>) -> Vec<(V, usize, usize)> {
        rle.runs().iter().map(|run| run.dissolve()).collect()
    }

    #[test]
    fn test_sweep_segments() -> Result<()> {
        let first = RleVec::from_dense(&[1, 1, 1, 2, 2]);
        let second = RleVec::from_dense(&[5, 5, 4, 4, 4]);
        let segments: Vec<_> = sweep(&first, &second)?
            .map(|(a, b, step)| (*a, *b, step))
            .collect();
        assert_eq!(segments, vec![(1, 5, 2), (1, 4, 1), (2, 4, 2)]);

        let empty = RleVec::<i32>::default();
        assert_eq!(sweep(&empty, &empty)?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_merge2_add_keeps_separated_runs() -> Result<()> {
        let first = RleVec::from_dense(&[1, 1, 1, 2, 2]);
        let second = RleVec::from_dense(&[5, 5, 4, 4, 4]);
        assert_eq!(triples(&first), vec![(1, 3, 0), (2, 2, 3)]);
        assert_eq!(triples(&second), vec![(5, 2, 0), (4, 3, 2)]);

        let sum = merge2(&first, &second, Arith::Add)?;
        assert_eq!(sum.expand(), vec![6, 6, 5, 6, 6]);
        assert_eq!(triples(&sum), vec![(6, 2, 0), (5, 1, 2), (6, 2, 3)]);
        Ok(())
    }

    #[test]
    fn test_merge2_coalesces_result() -> Result<()> {
        // Different boundaries, but every produced value is the same
        let first = RleVec::from_dense(&[1, 2, 2, 3]);
        let second = RleVec::from_dense(&[3, 2, 2, 1]);
        let sum = merge2(&first, &second, Arith::Add)?;
        assert_eq!(triples(&sum), vec![(4, 4, 0)]);
        Ok(())
    }

    #[test]
    fn test_merge2_identical_boundaries() -> Result<()> {
        let first = RleVec::from_dense(&[2, 2, 8, 8, 8]);
        let second = RleVec::from_dense(&[1, 1, 4, 4, 4]);
        assert_eq!(sweep(&first, &second)?.count(), 2);
        assert_eq!(
            triples(&merge2(&first, &second, Arith::Div)?),
            vec![(2, 5, 0)]
        );
        Ok(())
    }

    #[test]
    fn test_merge2_flipped() -> Result<()> {
        let first = RleVec::from_dense(&[10, 10, 4]);
        let second = RleVec::from_dense(&[1, 2, 2]);
        assert_eq!(
            merge2(&first, &second, Arith::Sub)?.expand(),
            vec![9, 8, 2]
        );
        assert_eq!(
            merge2(&first, &second, Flipped(Arith::Sub))?.expand(),
            vec![-9, -8, -2]
        );
        Ok(())
    }

    #[test]
    fn test_merge2_custom_fn() -> Result<()> {
        let first = RleVec::from_dense(&[3i8, 4, 5, 6, 6, 6]);
        let second = RleVec::from_dense(&[1i8, 2, 3, 4, 5, 6]);
        let mut op = BinaryFn::new(|a: &i8, b: &i8| *a.max(b));
        let merged = merge2(&first, &second, &mut op)?;
        assert_eq!(triples(&merged), vec![(3, 1, 0), (4, 1, 1), (5, 1, 2), (6, 3, 3)]);

        let boxed: Box<dyn BinaryOp<i8>> = Box::new(BinaryFn::new(|a: &i8, b: &i8| a - b));
        assert_eq!(merge2(&first, &second, boxed)?.expand(), vec![2, 2, 2, 2, 1, 0]);
        Ok(())
    }

    #[test]
    fn test_merge2_dimension_mismatch() {
        let first = RleVec::from_dense(&[1, 2, 3]);
        let second = RleVec::from_dense(&[1, 2]);
        for (a, b) in [(&first, &second), (&second, &first)] {
            let err = merge2(a, b, Arith::Add).unwrap_err();
            assert_eq!(
                err.downcast_ref::<RleError>(),
                Some(&RleError::DimensionMismatch {
                    expected: a.dim(),
                    actual: b.dim()
                })
            );
        }
    }

    #[test]
    fn test_merge_dense() -> Result<()> {
        let rle = RleVec::from_dense(&[1, 1, 1, 2, 2]);
        let merged = merge_dense(&rle, &[1, 1, 2, 1, 1], Arith::Mul)?;
        assert_eq!(triples(&merged), vec![(1, 2, 0), (2, 3, 2)]);

        let flipped = merge_dense(&rle, &[5, 5, 5, 5, 5], Flipped(Arith::Sub))?;
        assert_eq!(triples(&flipped), vec![(4, 3, 0), (3, 2, 3)]);

        assert!(merge_dense(&rle, &[1, 2], Arith::Add).is_err());
        Ok(())
    }

    #[test]
    fn test_merge_scalar() {
        let rle = RleVec::from_dense(&[1, 1, -1, 2]);
        assert_eq!(
            triples(&merge_scalar(&rle, 3, Arith::Add)),
            vec![(4, 2, 0), (2, 1, 2), (5, 1, 3)]
        );
        assert_eq!(
            triples(&merge_scalar(&rle, 0, Arith::Mul)),
            vec![(0, 4, 0)]
        );
    }

    #[test]
    fn test_arith_display() {
        assert_eq!(
            [Arith::Add, Arith::Sub, Arith::Mul, Arith::Div]
                .iter()
                .map(|op| op.to_string())
                .collect::<Vec<_>>(),
            vec!["+", "-", "*", "/"]
        );
    }
}
