use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Range;

use derive_getters::Dissolve;
use eyre::Result;
use itertools::Itertools;
use num::NumCast;

use rlekit_core_rs::num::Element;
use rlekit_core_rs::RleError;

use super::run::Run;

pub struct RleVecBuilder<V> {
    rle: RleVec<V>,
}

impl<V: Element> Default for RleVecBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Element> RleVecBuilder<V> {
    pub fn new() -> Self {
        Self {
            rle: RleVec {
                runs: Vec::new(),
                dim: 0,
            },
        }
    }

    pub fn with_capacity(mut self, runs: usize) -> Self {
        self.rle.runs.reserve(runs);
        self
    }

    /// Compress a dense sequence, closing a run whenever the next element differs.
    pub fn with_dense_values(mut self, dense: &[V]) -> Self {
        self.rle.reset();
        for value in dense {
            self.rle.push_run(*value, 1);
        }
        self
    }

    /// Same as `with_dense_values`, but consumes the sequence.
    pub fn with_dense_iter(mut self, dense: impl IntoIterator<Item = V>) -> Self {
        self.rle.reset();
        for value in dense {
            self.rle.push_run(value, 1);
        }
        self
    }

    pub fn with_repeated(mut self, value: V, dim: usize) -> Self {
        self.rle.reset();
        self.rle.push_run(value, dim);
        self
    }

    /// Explicit run list given as parallel arrays of values and lengths. Start offsets are
    /// derived from the lengths. The list is re-canonicalized: zero-length runs are dropped and
    /// identical neighbors are fused.
    pub fn with_rle_values(self, values: Vec<V>, lengths: Vec<usize>) -> Result<Self> {
        if values.len() != lengths.len() {
            return Err(RleError::InvalidRun {
                values: values.len(),
                lengths: lengths.len(),
            }
            .into());
        }
        Ok(self.with_runs(values.into_iter().zip(lengths)))
    }

    /// Explicit run list given as (value, length) pairs. See `with_rle_values`.
    pub fn with_runs(mut self, runs: impl IntoIterator<Item = (V, usize)>) -> Self {
        self.rle.reset();

        let mut given = 0;
        for (value, length) in runs {
            given += 1;
            self.rle.push_run(value, length);
        }

        if given != self.rle.runs.len() {
            log::debug!(
                "Run list was not canonical, re-canonicalized {} runs into {}",
                given,
                self.rle.runs.len()
            );
        }
        self
    }

    pub fn build(self) -> RleVec<V> {
        debug_assert!(self.rle.is_canonical());
        self.rle
    }
}

/// Run-length encoded vector of `dim` numeric elements.
///
/// Elements are stored as an ordered list of runs covering [0, dim) without gaps. The list is
/// always kept in canonical form: every run is non-empty and no two adjacent runs hold
/// identical values. All public operations preserve this invariant.
#[derive(Debug, Clone, Default, PartialEq, Dissolve)]
pub struct RleVec<V> {
    pub(crate) runs: Vec<Run<V>>,
    pub(crate) dim: usize,
}

impl<V: Element> RleVec<V> {
    pub fn builder() -> RleVecBuilder<V> {
        RleVecBuilder::new()
    }

    /// Reuse the allocated run storage to build a new vector.
    pub fn rebuild(mut self) -> RleVecBuilder<V> {
        self.reset();
        RleVecBuilder { rle: self }
    }

    pub fn from_dense(dense: &[V]) -> Self {
        Self::builder().with_dense_values(dense).build()
    }

    pub fn repeated(value: V, dim: usize) -> Self {
        Self::builder().with_repeated(value, dim).build()
    }

    pub fn from_rle(values: Vec<V>, lengths: Vec<usize>) -> Result<Self> {
        Ok(Self::builder().with_rle_values(values, lengths)?.build())
    }

    /// Logical length of the vector.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Number of stored runs.
    #[inline]
    pub fn num_runs(&self) -> usize {
        self.runs.len()
    }

    #[inline]
    pub fn runs(&self) -> &[Run<V>] {
        &self.runs
    }

    pub fn get(&self, index: usize) -> Result<V> {
        let run = self.locate(index)?;
        Ok(self.runs[run].value)
    }

    /// Iterate over all logical elements.
    pub fn iter(&self) -> impl Iterator<Item = V> + '_ {
        self.runs
            .iter()
            .flat_map(|run| std::iter::repeat_n(run.value, run.count))
    }

    /// Decompress into a dense vector.
    pub fn expand(&self) -> Vec<V> {
        let mut dense = Vec::with_capacity(self.dim);
        dense.extend(self.iter());
        dense
    }

    /// Decompress into a dense vector of another numeric type.
    pub fn expand_as<U: NumCast + Clone>(&self) -> Result<Vec<U>> {
        let mut dense = Vec::with_capacity(self.dim);
        for run in &self.runs {
            let value: U = NumCast::from(run.value).ok_or(RleError::Unsupported {
                operation: "expand_as (value is not representable in the target type)",
            })?;
            dense.extend(std::iter::repeat_n(value, run.count));
        }
        Ok(dense)
    }

    /// Dense copy of the logical elements in `range`.
    pub fn slice(&self, range: Range<usize>) -> Result<Vec<V>> {
        if range.end > self.dim {
            return Err(RleError::OutOfRange {
                index: range.end,
                dim: self.dim,
            }
            .into());
        }
        if range.start >= range.end {
            return Ok(Vec::new());
        }
        log::trace!("Materializing slice {:?} of a {}-dim RLE vector", range, self.dim);

        let mut dense = Vec::with_capacity(range.len());
        for run in &self.runs[self.locate(range.start)?..] {
            if run.start >= range.end {
                break;
            }
            let from = run.start.max(range.start);
            let to = run.end().min(range.end);
            dense.extend(std::iter::repeat_n(run.value, to - from));
        }
        Ok(dense)
    }

    /// Dense vector of elements at the given logical indices.
    pub fn select(&self, indices: &[usize]) -> Result<Vec<V>> {
        log::trace!("Selecting {} elements from a {}-dim RLE vector", indices.len(), self.dim);
        indices.iter().map(|index| self.get(*index)).collect()
    }

    /// Dense concatenation with another sequence.
    pub fn concat(&self, tail: &[V]) -> Vec<V> {
        log::trace!("Materializing concatenation of a {}-dim RLE vector", self.dim);
        let mut dense = Vec::with_capacity(self.dim + tail.len());
        dense.extend(self.iter());
        dense.extend_from_slice(tail);
        dense
    }

    /// Copy of the vector with one more element at the end. Stays compressed.
    pub fn appended(&self, value: V) -> Self {
        let mut result = self.clone();
        result.push_run(value, 1);
        result
    }

    /// Check that the run list covers [0, dim) and is maximally compressed.
    pub fn is_canonical(&self) -> bool {
        let covered = self.runs.iter().try_fold(0, |start, run| {
            (run.count > 0 && run.start == start).then_some(run.end())
        });
        covered == Some(self.dim)
            && self
                .runs
                .iter()
                .tuple_windows()
                .all(|(left, right)| !left.value.identical(&right.value))
    }

    pub fn sort(&mut self) -> Result<()> {
        Err(RleError::Unsupported { operation: "sort" }.into())
    }

    pub fn compare(&self, _other: &Self) -> Result<Ordering> {
        Err(RleError::Unsupported {
            operation: "compare",
        }
        .into())
    }

    /// Append `count` copies of `value`, extending the last run if the value is identical.
    #[inline]
    pub(crate) fn push_run(&mut self, value: V, count: usize) {
        if count == 0 {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.value.identical(&value) => last.count += count,
            _ => self.runs.push(Run {
                value,
                count,
                start: self.dim,
            }),
        }
        self.dim += count;
    }

    /// Fuse adjacent runs that hold identical values.
    pub(crate) fn coalesce(&mut self) {
        if self.runs.len() < 2 {
            return;
        }

        let (mut writep, mut readp) = (0, 1);
        while readp < self.runs.len() {
            if self.runs[writep].value.identical(&self.runs[readp].value) {
                self.runs[writep].count += self.runs[readp].count;
            } else {
                writep += 1;
                self.runs[writep] = self.runs[readp];
            }
            readp += 1;
        }
        self.runs.truncate(writep + 1);
    }

    pub(crate) fn with_run_capacity(runs: usize) -> Self {
        Self::builder().with_capacity(runs).build()
    }

    fn reset(&mut self) {
        self.runs.clear();
        self.dim = 0;
    }
}

impl<V: Element> From<&[V]> for RleVec<V> {
    fn from(dense: &[V]) -> Self {
        Self::from_dense(dense)
    }
}

impl<V: Element> From<Vec<V>> for RleVec<V> {
    fn from(dense: Vec<V>) -> Self {
        Self::from_dense(&dense)
    }
}

impl<V: Element> FromIterator<V> for RleVec<V> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self::builder().with_dense_iter(iter).build()
    }
}

impl<V: Element> Display for RleVec<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.runs.iter().join(", "))
    }
}
