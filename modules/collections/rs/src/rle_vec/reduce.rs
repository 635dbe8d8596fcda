use std::cmp::Ordering;

use eyre::Result;
use itertools::Itertools;

use rlekit_core_rs::num::{Element, Float};
use rlekit_core_rs::RleError;

use super::merge2::sweep;
use super::operand::Operand;
use super::{RleVec, Run};

// Every reduction below visits each run once and weights its contribution by the run length.
// Extrema and their positions skip NaN runs, a vector of NaNs only has no extremum.
impl<V: Element> RleVec<V> {
    pub fn sum(&self) -> V {
        self.runs
            .iter()
            .fold(V::zero(), |acc, run| acc + run.value.times(run.count))
    }

    pub fn sum_abs(&self) -> V {
        self.runs
            .iter()
            .fold(V::zero(), |acc, run| acc + run.value.abs().times(run.count))
    }

    pub fn sum_positive(&self) -> V {
        self.runs
            .iter()
            .filter(|run| run.value.is_positive())
            .fold(V::zero(), |acc, run| acc + run.value.times(run.count))
    }

    pub fn min(&self) -> Option<V> {
        self.extremum(self.dim, Ordering::Less).map(|run| run.value)
    }

    pub fn max(&self) -> Option<V> {
        self.extremum(self.dim, Ordering::Greater).map(|run| run.value)
    }

    /// Minimum over the prefix [0, end).
    pub fn min_prefix(&self, end: usize) -> Result<Option<V>> {
        self.check_prefix(end)?;
        Ok(self.extremum(end, Ordering::Less).map(|run| run.value))
    }

    /// Maximum over the prefix [0, end).
    pub fn max_prefix(&self, end: usize) -> Result<Option<V>> {
        self.check_prefix(end)?;
        Ok(self.extremum(end, Ordering::Greater).map(|run| run.value))
    }

    /// Index of the first occurrence of the minimum.
    pub fn argmin(&self) -> Option<usize> {
        self.extremum(self.dim, Ordering::Less).map(|run| run.start)
    }

    /// Index of the first occurrence of the maximum.
    pub fn argmax(&self) -> Option<usize> {
        self.extremum(self.dim, Ordering::Greater).map(|run| run.start)
    }

    pub fn first_negative(&self) -> Option<usize> {
        self.find_run(|run| run.value.is_negative())
            .map(|run| run.start)
    }

    pub fn first_positive(&self) -> Option<usize> {
        self.find_run(|run| run.value.is_positive())
            .map(|run| run.start)
    }

    pub fn count_negative(&self) -> usize {
        self.count_where(|value| value.is_negative())
    }

    pub fn count_positive(&self) -> usize {
        self.count_where(|value| value.is_positive())
    }

    pub fn contains(&self, value: V) -> bool {
        self.runs.iter().any(|run| run.value.identical(&value))
    }

    /// Sorted distinct values stored in the vector. NaN, if present, comes last.
    pub fn distinct(&self) -> Vec<V> {
        self.runs
            .iter()
            .map(|run| run.value)
            .sorted_by(|a, b| a.total_order(b))
            .dedup_by(|a, b| a.identical(b))
            .collect()
    }

    /// First run satisfying the predicate.
    pub fn find_run(&self, mut predicate: impl FnMut(&Run<V>) -> bool) -> Option<&Run<V>> {
        self.runs.iter().find(|run| predicate(run))
    }

    /// Prefix sums, e.g. turning a probability mass function into a cumulative distribution.
    /// Prefix sums don't form runs, so the result is dense.
    pub fn cumsum(&self) -> Vec<V> {
        log::trace!("Materializing cumulative sum of a {}-dim RLE vector", self.dim);

        let mut result = Vec::with_capacity(self.dim);
        let mut acc = V::zero();
        for run in &self.runs {
            for _ in 0..run.count {
                acc = acc + run.value;
                result.push(acc);
            }
        }
        result
    }

    /// Dot product with a compressed, dense or scalar operand. Compressed operands are
    /// combined with a synchronized sweep, without building any intermediate vector.
    pub fn dot<'a>(&self, rhs: impl Into<Operand<'a, V>>) -> Result<V>
    where
        V: 'a,
    {
        match rhs.into() {
            Operand::Compressed(rhs) => Ok(sweep(self, rhs)?
                .fold(V::zero(), |acc, (a, b, step)| acc + (*a * *b).times(step))),
            Operand::Dense(rhs) => {
                RleError::check_dim(self.dim, rhs.len())?;
                Ok(self.runs.iter().fold(V::zero(), |acc, run| {
                    let segment = rhs[run.start..run.end()]
                        .iter()
                        .fold(V::zero(), |acc, x| acc + *x);
                    acc + run.value * segment
                }))
            }
            Operand::Scalar(rhs) => Ok(self.sum() * rhs),
        }
    }

    /// Squared Euclidean norm.
    pub fn norm_sq(&self) -> V {
        self.runs.iter().fold(V::zero(), |acc, run| {
            acc + (run.value * run.value).times(run.count)
        })
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.norm_sq().to_f64().map_or(f64::NAN, f64::sqrt)
    }

    /// Manhattan norm.
    pub fn norm1(&self) -> V {
        self.sum_abs()
    }

    fn extremum(&self, end: usize, keep: Ordering) -> Option<&Run<V>> {
        self.runs
            .iter()
            .take_while(|run| run.start < end)
            .filter(|run| !run.value.is_nan())
            .fold(None, |best: Option<&Run<V>>, run| match best {
                Some(current) if run.value.partial_cmp(&current.value) != Some(keep) => best,
                _ => Some(run),
            })
    }

    fn count_where(&self, mut predicate: impl FnMut(&V) -> bool) -> usize {
        self.runs
            .iter()
            .filter(|run| predicate(&run.value))
            .map(|run| run.count)
            .sum()
    }

    fn check_prefix(&self, end: usize) -> Result<()> {
        if end > self.dim {
            return Err(RleError::OutOfRange {
                index: end,
                dim: self.dim,
            }
            .into());
        }
        Ok(())
    }
}

// Normalization only makes sense for float elements. A zero (or non-finite) divisor leaves
// the vector untouched.
impl<V: Element + Float> RleVec<V> {
    /// Scale to a unit Euclidean norm.
    pub fn normalize(&mut self) {
        let norm = self.norm_sq().sqrt();
        self.rescale(norm);
    }

    /// Scale to a unit Manhattan norm.
    pub fn normalize1(&mut self) {
        let norm = self.norm1();
        self.rescale(norm);
    }

    /// Scale so that the elements sum to one, e.g. turning counts into a probability mass
    /// function.
    pub fn normalize_sum(&mut self) {
        let sum = self.sum();
        self.rescale(sum);
    }

    fn rescale(&mut self, divisor: V) {
        if divisor.is_zero() || !divisor.is_finite() {
            return;
        }
        self.map_inplace(|x| x / divisor);
    }
}
