use crate::error::Result;

/// Rank of the worker that owns inputs, collects results, and reports.
pub const COORDINATOR: usize = 0;

/// Blocking collective operations over a fixed set of ranks.
///
/// Every rank must call the same collectives in the same order with the same
/// root; a rank that skips a collective stalls its peers. Buffers are never
/// shared between ranks: data only moves through these calls.
pub trait Communicator {
    /// Rank of the calling worker, in `[0, size)`.
    fn rank(&self) -> usize;

    /// Number of ranks in the world.
    fn size(&self) -> usize;

    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR
    }

    /// Returns once every rank has entered the barrier.
    fn barrier(&self) -> Result<()>;

    /// Copies `root`'s `buf` into `buf` on every other rank. All ranks must
    /// pass buffers of the same length.
    fn broadcast(&self, buf: &mut [f64], root: usize) -> Result<()>;

    /// Concatenates every rank's `local` in rank order at `root`.
    ///
    /// Returns `Some` on `root` and `None` elsewhere. All ranks must pass
    /// slices of the same length.
    fn gather(&self, local: &[f64], root: usize) -> Result<Option<Vec<f64>>>;

    /// Sums `value` across ranks at `root`. Returns `Some` on `root`.
    fn reduce_sum(&self, value: f64, root: usize) -> Result<Option<f64>>;
}
