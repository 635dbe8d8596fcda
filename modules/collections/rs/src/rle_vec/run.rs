use std::fmt::{Display, Formatter};

use derive_getters::{Dissolve, Getters};
use eyre::Result;

use rlekit_core_rs::RleError;

/// A maximal block of identical elements inside a run-length encoded vector.
/// Covers the half-open range of logical indices [start, start + count).
#[derive(Copy, Clone, PartialEq, Debug, Hash, Getters, Dissolve)]
pub struct Run<V> {
    /// The value shared by all elements of the run
    pub(crate) value: V,
    /// The number of elements in the run. Guaranteed to be greater than zero.
    pub(crate) count: usize,
    /// The logical index of the first element of the run
    pub(crate) start: usize,
}

impl<V> Run<V> {
    pub fn new(value: V, count: usize, start: usize) -> Result<Self> {
        if count == 0 {
            return Err(RleError::EmptyRun { start }.into());
        }
        Ok(Self {
            value,
            count,
            start,
        })
    }

    /// Logical index right after the last element of the run.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    /// Check if the run covers a given logical index.
    #[inline(always)]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end()
    }
}

impl<V: Display> Display for Run<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.value, self.count, self.start)
    }
}
