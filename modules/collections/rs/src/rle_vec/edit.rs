use eyre::Result;

use rlekit_core_rs::num::Element;
use rlekit_core_rs::RleError;

use super::rle_vec::RleVec;
use super::run::Run;

// Run-level splicing. The only place where raw array mechanics matter: every edit below is
// expressed as a handful of these calls plus in-place changes of the neighboring runs.
impl<V> RleVec<V> {
    #[inline(always)]
    fn insert_one(&mut self, at: usize, run: Run<V>) {
        self.runs.insert(at, run);
    }

    #[inline(always)]
    fn insert_two(&mut self, at: usize, first: Run<V>, second: Run<V>) {
        self.runs.splice(at..at, [first, second]);
    }

    #[inline(always)]
    fn remove_one(&mut self, at: usize) {
        self.runs.remove(at);
    }

    #[inline(always)]
    fn remove_two(&mut self, at: usize) {
        self.runs.drain(at..at + 2);
    }
}

impl<V: Element> RleVec<V> {
    /// Index of the run that covers the logical `index`. O(log R).
    pub fn locate(&self, index: usize) -> Result<usize> {
        RleError::check_index(index, self.dim)?;

        let run = self.runs.partition_point(|run| run.start <= index) - 1;
        debug_assert!(self.runs[run].contains(index));
        Ok(run)
    }

    /// Set the logical element at `index` to `value`, keeping the run list canonical.
    pub fn update(&mut self, index: usize, value: V) -> Result<()> {
        let ind = self.locate(index)?;
        let run = self.runs[ind];

        if run.value.identical(&value) {
            return Ok(());
        }

        if run.count == 1 {
            self.merge_both(ind, value);
        } else if index == run.start {
            self.merge_left(ind, value);
        } else if index == run.end() - 1 {
            self.merge_right(ind, value);
        } else {
            self.split(ind, index, value);
        }

        debug_assert!(self.is_canonical(), "Non-canonical run list after update: {self}");
        Ok(())
    }

    /// Replace a single-element run, fusing it with any neighbor holding the same value.
    fn merge_both(&mut self, ind: usize, value: V) {
        let left = ind > 0 && self.runs[ind - 1].value.identical(&value);
        let right = ind + 1 < self.runs.len() && self.runs[ind + 1].value.identical(&value);

        match (left, right) {
            (true, true) => {
                self.runs[ind - 1].count += 1 + self.runs[ind + 1].count;
                self.remove_two(ind);
            }
            (true, false) => {
                self.runs[ind - 1].count += 1;
                self.remove_one(ind);
            }
            (false, true) => {
                let next = &mut self.runs[ind + 1];
                next.count += 1;
                next.start -= 1;
                self.remove_one(ind);
            }
            (false, false) => self.runs[ind].value = value,
        }
    }

    /// Peel the first element off a multi-element run.
    fn merge_left(&mut self, ind: usize, value: V) {
        let run = &mut self.runs[ind];
        let index = run.start;
        run.count -= 1;
        run.start += 1;

        if ind > 0 && self.runs[ind - 1].value.identical(&value) {
            self.runs[ind - 1].count += 1;
        } else {
            self.insert_one(
                ind,
                Run {
                    value,
                    count: 1,
                    start: index,
                },
            );
        }
    }

    /// Peel the last element off a multi-element run.
    fn merge_right(&mut self, ind: usize, value: V) {
        let run = &mut self.runs[ind];
        run.count -= 1;
        let index = run.end();

        if ind + 1 < self.runs.len() && self.runs[ind + 1].value.identical(&value) {
            let next = &mut self.runs[ind + 1];
            next.count += 1;
            next.start -= 1;
        } else {
            self.insert_one(
                ind + 1,
                Run {
                    value,
                    count: 1,
                    start: index,
                },
            );
        }
    }

    /// Cut a run in three around an interior element. Both outer pieces keep the original
    /// value, which already differs from the outer neighbors.
    fn split(&mut self, ind: usize, index: usize, value: V) {
        let run = &mut self.runs[ind];
        let head = index - run.start;
        let tail = Run {
            value: run.value,
            count: run.count - head - 1,
            start: index + 1,
        };
        run.count = head;

        self.insert_two(
            ind + 1,
            Run {
                value,
                count: 1,
                start: index,
            },
            tail,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triples(rle: &RleVec<i32>) -> Vec<(i32, usize, usize)> {
        rle.runs().iter().map(|run| run.dissolve()).collect()
    }

    #[test]
    fn test_locate() {
        let rle = RleVec::from_dense(&[0, 0, 0, 1, 1, 2, 2, 2, 2, 2]);
        for (index, expected) in [(0, 0), (2, 0), (3, 1), (4, 1), (5, 2), (9, 2)] {
            assert_eq!(rle.locate(index).unwrap(), expected);
        }
        assert!(rle.locate(10).is_err());
        assert!(RleVec::<i32>::default().locate(0).is_err());
    }

    #[test]
    fn test_update_merge_right_then_merge_both() -> Result<()> {
        let mut rle = RleVec::from_dense(&[0, 0, 0, 1, 1, 2, 2, 2, 2, 2]);
        assert_eq!(triples(&rle), vec![(0, 3, 0), (1, 2, 3), (2, 5, 5)]);

        rle.update(4, 2)?;
        assert_eq!(triples(&rle), vec![(0, 3, 0), (1, 1, 3), (2, 6, 4)]);

        rle.update(3, 2)?;
        assert_eq!(triples(&rle), vec![(0, 3, 0), (2, 7, 3)]);
        Ok(())
    }

    #[test]
    fn test_update_noop() -> Result<()> {
        let mut rle = RleVec::from_dense(&[1, 1, 2]);
        let before = rle.clone();
        rle.update(1, 1)?;
        rle.update(2, 2)?;
        assert_eq!(rle, before);
        Ok(())
    }

    #[test]
    fn test_update_merge_both() -> Result<()> {
        for (dense, index, value, expected) in [
            // The only run
            (vec![1], 0, 5, vec![(5, 1, 0)]),
            // First run: absorbed by the right neighbor or overwritten
            (vec![1, 2, 2], 0, 2, vec![(2, 3, 0)]),
            (vec![1, 2, 2], 0, 3, vec![(3, 1, 0), (2, 2, 1)]),
            // Last run: absorbed by the left neighbor or overwritten
            (vec![2, 2, 1], 2, 2, vec![(2, 3, 0)]),
            (vec![2, 2, 1], 2, 3, vec![(2, 2, 0), (3, 1, 2)]),
            // Interior run
            (vec![2, 2, 1, 2], 2, 2, vec![(2, 4, 0)]),
            (vec![2, 2, 1, 3], 2, 2, vec![(2, 3, 0), (3, 1, 3)]),
            (vec![3, 1, 2, 2], 1, 2, vec![(3, 1, 0), (2, 3, 1)]),
            (vec![3, 1, 2], 1, 5, vec![(3, 1, 0), (5, 1, 1), (2, 1, 2)]),
        ] {
            let mut rle = RleVec::from_dense(&dense);
            rle.update(index, value)?;
            assert_eq!(triples(&rle), expected, "{dense:?}[{index}] = {value}");
        }
        Ok(())
    }

    #[test]
    fn test_update_merge_left() -> Result<()> {
        for (dense, index, value, expected) in [
            (vec![1, 1, 1], 0, 2, vec![(2, 1, 0), (1, 2, 1)]),
            (vec![2, 1, 1], 1, 2, vec![(2, 2, 0), (1, 1, 2)]),
            (vec![3, 1, 1], 1, 2, vec![(3, 1, 0), (2, 1, 1), (1, 1, 2)]),
        ] {
            let mut rle = RleVec::from_dense(&dense);
            rle.update(index, value)?;
            assert_eq!(triples(&rle), expected, "{dense:?}[{index}] = {value}");
        }
        Ok(())
    }

    #[test]
    fn test_update_merge_right() -> Result<()> {
        for (dense, index, value, expected) in [
            (vec![1, 1, 1], 2, 2, vec![(1, 2, 0), (2, 1, 2)]),
            (vec![1, 1, 2], 1, 2, vec![(1, 1, 0), (2, 2, 1)]),
            (vec![1, 1, 3], 1, 2, vec![(1, 1, 0), (2, 1, 1), (3, 1, 2)]),
        ] {
            let mut rle = RleVec::from_dense(&dense);
            rle.update(index, value)?;
            assert_eq!(triples(&rle), expected, "{dense:?}[{index}] = {value}");
        }
        Ok(())
    }

    #[test]
    fn test_split_round_trip() -> Result<()> {
        let mut rle = RleVec::from_dense(&[4, 7, 7, 7, 7, 7, 4]);
        let before = rle.clone();

        rle.update(3, 0)?;
        assert_eq!(
            triples(&rle),
            vec![(4, 1, 0), (7, 2, 1), (0, 1, 3), (7, 2, 4), (4, 1, 6)]
        );

        rle.update(3, 7)?;
        assert_eq!(rle, before);
        assert_eq!(triples(&rle)[1], (7, 5, 1));
        Ok(())
    }

    #[test]
    fn test_update_out_of_range() {
        let mut rle = RleVec::from_dense(&[1, 1]);
        let err = rle.update(2, 5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RleError>(),
            Some(&RleError::OutOfRange { index: 2, dim: 2 })
        );
        assert_eq!(triples(&rle), vec![(1, 2, 0)]);
    }

    #[test]
    fn test_update_float_tolerance() -> Result<()> {
        let mut rle = RleVec::from_dense(&[0.5, 0.5, 0.5]);
        rle.update(1, 0.5 + 1e-15)?;
        assert_eq!(rle.num_runs(), 1);

        rle.update(1, 0.25)?;
        assert_eq!(rle.expand(), vec![0.5, 0.25, 0.5]);
        Ok(())
    }
}
