use std::ops::Range;

use crate::error::{KernelError, Result};

/// How a partition slices an index space across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    /// `start = r * (n / p)`. Requires `n % p == 0`.
    Exact,
    /// `start = r * n / p`. Any `n`; block sizes differ by at most one.
    Balanced,
}

/// Maps the index space `[0, total)` onto `workers` contiguous, disjoint
/// half-open ranges.
///
/// Construction validates the scheme's preconditions, so every range handed
/// out afterwards is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    total: usize,
    workers: usize,
    scheme: Scheme,
}

impl Partition {
    /// Row-block partition used by the distributed kernels.
    ///
    /// # Errors
    /// `NoWorkers` if `workers == 0`, `UnevenPartition` if `total` is not a
    /// multiple of `workers`.
    pub fn exact(total: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(KernelError::NoWorkers);
        }
        if total % workers != 0 {
            return Err(KernelError::UnevenPartition { total, workers });
        }
        Ok(Partition {
            total,
            workers,
            scheme: Scheme::Exact,
        })
    }

    /// Partition that tolerates a remainder.
    ///
    /// # Errors
    /// `NoWorkers` if `workers == 0`.
    pub fn balanced(total: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(KernelError::NoWorkers);
        }
        Ok(Partition {
            total,
            workers,
            scheme: Scheme::Balanced,
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The half-open range owned by worker `index`.
    ///
    /// # Errors
    /// `WorkerOutOfRange` if `index >= workers`.
    pub fn range(&self, index: usize) -> Result<Range<usize>> {
        if index >= self.workers {
            return Err(KernelError::WorkerOutOfRange {
                index,
                workers: self.workers,
            });
        }
        Ok(self.range_unchecked(index))
    }

    /// All ranges in worker order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.workers).map(move |index| self.range_unchecked(index))
    }

    /// Splits `data` into one disjoint mutable block per worker, where each
    /// index of the partition covers `unit` consecutive elements (e.g. a row
    /// of `unit` columns).
    ///
    /// # Errors
    /// `ShapeMismatch` if `data.len() != total * unit`.
    pub fn split_mut<'a, T>(&self, data: &'a mut [T], unit: usize) -> Result<Vec<&'a mut [T]>> {
        if data.len() != self.total * unit {
            return Err(KernelError::ShapeMismatch {
                expected: vec![self.total, unit],
                got: vec![data.len()],
            });
        }

        let mut blocks = Vec::with_capacity(self.workers);
        let mut rest = data;
        for range in self.ranges() {
            let (head, tail) = rest.split_at_mut(range.len() * unit);
            blocks.push(head);
            rest = tail;
        }
        Ok(blocks)
    }

    fn range_unchecked(&self, index: usize) -> Range<usize> {
        match self.scheme {
            Scheme::Exact => {
                let len = self.total / self.workers;
                let start = index * len;
                start..start + len
            }
            Scheme::Balanced => {
                let bound = |r: usize| {
                    (r as u128 * self.total as u128 / self.workers as u128) as usize
                };
                bound(index)..bound(index + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(p: &Partition) {
        let mut next = 0;
        for range in p.ranges() {
            // Contiguous and ascending implies pairwise disjoint.
            assert_eq!(range.start, next, "{:?}", p);
            assert!(range.end >= range.start);
            next = range.end;
        }
        assert_eq!(next, p.total());
    }

    #[test]
    fn test_exact_ranges() {
        let p = Partition::exact(1000, 4).unwrap();
        assert_eq!(p.range(0).unwrap(), 0..250);
        assert_eq!(p.range(3).unwrap(), 750..1000);
    }

    #[test]
    fn test_exact_cover_grid() {
        for workers in 1..=8 {
            for blocks in 0..=12 {
                let p = Partition::exact(workers * blocks, workers).unwrap();
                assert_covers(&p);
            }
        }
    }

    #[test]
    fn test_exact_rejects_remainder() {
        assert!(matches!(
            Partition::exact(10, 3),
            Err(KernelError::UnevenPartition { total: 10, workers: 3 })
        ));
    }

    #[test]
    fn test_zero_workers() {
        assert!(matches!(Partition::exact(4, 0), Err(KernelError::NoWorkers)));
        assert!(matches!(Partition::balanced(4, 0), Err(KernelError::NoWorkers)));
    }

    #[test]
    fn test_balanced_cover_grid() {
        for workers in 1..=9 {
            for total in 0..=40 {
                let p = Partition::balanced(total, workers).unwrap();
                assert_covers(&p);
                let lens: Vec<usize> = p.ranges().map(|r| r.len()).collect();
                let min = lens.iter().min().unwrap();
                let max = lens.iter().max().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn test_balanced_matches_exact_when_divisible() {
        let e = Partition::exact(120, 6).unwrap();
        let b = Partition::balanced(120, 6).unwrap();
        assert!(e.ranges().eq(b.ranges()));
    }

    #[test]
    fn test_range_out_of_bounds() {
        let p = Partition::balanced(10, 2).unwrap();
        assert!(matches!(
            p.range(2),
            Err(KernelError::WorkerOutOfRange { index: 2, workers: 2 })
        ));
    }

    #[test]
    fn test_split_mut_blocks() {
        let p = Partition::balanced(5, 2).unwrap();
        let mut data: Vec<u32> = (0..10).collect();
        let blocks = p.split_mut(&mut data, 2).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], &[0, 1, 2, 3]);
        assert_eq!(blocks[1], &[4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_split_mut_length_mismatch() {
        let p = Partition::exact(4, 2).unwrap();
        let mut data = vec![0.0f64; 7];
        assert!(p.split_mut(&mut data, 2).is_err());
    }
}
