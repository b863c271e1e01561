//! Fixed-size thread team for shared-memory parallel regions.
//!
//! A [`ThreadTeam`] owns a dedicated rayon pool. Loop kernels split their
//! iteration space into one contiguous block per team member and hand each
//! block a disjoint `&mut` slice of the output, so no locking is needed.
//! Reductions produce one partial per member which the caller combines after
//! the region, in member order.

use std::ops::Range;
use std::sync::Mutex;

use rayon::prelude::*;

use crate::backend::ComputeBackend;
use crate::cpu::{matmul, quadrature, vector};
use crate::error::{KernelError, Result};
use crate::matrix::Matrix;
use crate::partition::Partition;

#[derive(Debug)]
pub struct ThreadTeam {
    pool: rayon::ThreadPool,
    size: usize,
}

impl ThreadTeam {
    /// Team sized from the environment (rayon's default thread count, which
    /// honours `RAYON_NUM_THREADS`), capped by `hint` when one is given.
    pub fn new(hint: Option<usize>) -> Result<Self> {
        let available = rayon::current_num_threads();
        let size = match hint {
            Some(h) if h > 0 => h.min(available),
            _ => available,
        };
        Self::with_size(size)
    }

    /// Team with exactly `size` threads.
    pub fn with_size(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(KernelError::NoWorkers);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("pk-team-{}", i))
            .build()?;
        log::info!("thread team ready with {} threads", size);
        Ok(ThreadTeam { pool, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `body(member, range, block)` for every block of `partition`.
    ///
    /// `data` holds `partition.total()` units of `unit` elements; `block` is
    /// the slice of `data` covering `range`.
    pub fn run_blocks<T, F>(
        &self,
        partition: &Partition,
        unit: usize,
        data: &mut [T],
        body: F,
    ) -> Result<()>
    where
        T: Send,
        F: Fn(usize, Range<usize>, &mut [T]) + Sync,
    {
        let ranges: Vec<Range<usize>> = partition.ranges().collect();
        let blocks = partition.split_mut(data, unit)?;

        self.pool.install(|| {
            blocks
                .into_par_iter()
                .zip(ranges)
                .enumerate()
                .for_each(|(member, (block, range))| body(member, range, block));
        });
        Ok(())
    }

    /// Like `run_blocks`, but block `t` always runs on team thread `t`.
    ///
    /// # Errors
    /// `ShapeMismatch` if `partition` does not have one block per team member.
    pub fn run_pinned<T, F>(
        &self,
        partition: &Partition,
        unit: usize,
        data: &mut [T],
        body: F,
    ) -> Result<()>
    where
        T: Send,
        F: Fn(usize, Range<usize>, &mut [T]) + Sync,
    {
        if partition.workers() != self.size {
            return Err(KernelError::ShapeMismatch {
                expected: vec![self.size],
                got: vec![partition.workers()],
            });
        }
        // Each slot is taken exactly once, by the thread whose index matches.
        let slots: Vec<Mutex<Option<(Range<usize>, &mut [T])>>> = partition
            .ranges()
            .zip(partition.split_mut(data, unit)?)
            .map(|slot| Mutex::new(Some(slot)))
            .collect();

        self.pool.broadcast(|ctx| {
            let member = ctx.index();
            let slot = slots[member].lock().ok().and_then(|mut slot| slot.take());
            if let Some((range, block)) = slot {
                body(member, range, block);
            }
        });
        Ok(())
    }

    /// `run_blocks` over a balanced split of `total` units across the team.
    pub fn parallel_for<T, F>(&self, total: usize, unit: usize, data: &mut [T], body: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, Range<usize>, &mut [T]) + Sync,
    {
        let partition = Partition::balanced(total, self.size)?;
        self.run_blocks(&partition, unit, data, body)
    }

    /// Runs `body(member, range)` on every team thread over a balanced split
    /// of `[0, total)` and returns the results in member order.
    pub fn broadcast_partials<R, F>(&self, total: usize, body: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(usize, Range<usize>) -> R + Sync,
    {
        let partition = Partition::balanced(total, self.size)?;
        self.pool
            .broadcast(|ctx| {
                let member = ctx.index();
                partition.range(member).map(|range| body(member, range))
            })
            .into_iter()
            .collect()
    }
}

impl ComputeBackend for ThreadTeam {
    fn workers(&self) -> usize {
        self.size
    }

    fn vector_add(&self, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<()> {
        vector::check_lengths(a, b, c)?;
        self.parallel_for(a.len(), 1, c, |_, range, block| {
            vector::add_into(&a[range.clone()], &b[range], block);
        })
    }

    fn matmul(&self, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
        matmul::check_shapes(a, b, c)?;
        self.parallel_for(a.rows(), b.cols(), c.as_mut_slice(), |_, rows, block| {
            matmul::matmul_rows_into(a, b, rows, block);
        })
    }

    fn integrate_pi(&self, steps: usize) -> Result<f64> {
        let partials =
            self.broadcast_partials(steps, |_, range| quadrature::midpoint_sum(range, steps))?;
        // One combine per member, in member order.
        let mut total = 0.0f64;
        for partial in partials {
            total += partial;
        }
        Ok(total * quadrature::step_width(steps))
    }

    fn sample_pi(&self, samples: usize, seed: u64) -> Result<f64> {
        let hits = self.broadcast_partials(samples, |member, range| {
            let mut rng = quadrature::worker_rng(seed, member);
            quadrature::quarter_circle_hits(range.len(), &mut rng)
        })?;
        Ok(quadrature::hits_to_pi(hits.into_iter().sum(), samples))
    }
}
