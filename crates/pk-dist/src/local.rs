//! In-process message-passing world.
//!
//! Each rank runs on its own scoped OS thread and owns a [`LocalComm`]. Ranks
//! share no buffers: every (source, destination) pair has a dedicated FIFO
//! channel and packets are owned copies. Because collectives are entered in
//! the same order on every rank, per-pair FIFO ordering is enough to match
//! sends with receives.
//!
//! When a rank returns or panics its channel endpoints are dropped, so peers
//! still waiting on it observe [`DistError::Disconnected`] instead of
//! blocking forever.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use pk_core::KernelError;

use crate::comm::{Communicator, COORDINATOR};
use crate::error::{DistError, Result};

type Packet = Vec<f64>;

/// A fixed-size group of in-process ranks.
#[derive(Debug, Clone, Copy)]
pub struct LocalWorld {
    size: usize,
}

impl LocalWorld {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(KernelError::NoWorkers.into());
        }
        Ok(LocalWorld { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `f` once per rank, each on its own thread, and returns the
    /// per-rank results in rank order.
    ///
    /// # Errors
    /// `RankPanicked` with the lowest panicking rank, or `Init` if a rank
    /// thread could not be spawned.
    pub fn run<F, R>(&self, f: F) -> Result<Vec<R>>
    where
        F: Fn(&LocalComm) -> R + Sync,
        R: Send,
    {
        log::info!("starting local world with {} ranks", self.size);
        let comms = self.wire();
        let f = &f;

        thread::scope(|s| {
            let handles = comms
                .into_iter()
                .map(|comm| {
                    thread::Builder::new()
                        .name(format!("pk-rank-{}", comm.rank))
                        .spawn_scoped(s, move || f(&comm))
                })
                .collect::<std::io::Result<Vec<_>>>()
                .map_err(|e| DistError::Init(e.to_string()))?;

            let mut results = Vec::with_capacity(self.size);
            let mut panicked = None;
            for (rank, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(r) => results.push(r),
                    Err(_) => {
                        log::error!("rank {} panicked", rank);
                        panicked.get_or_insert(rank);
                    }
                }
            }

            match panicked {
                Some(rank) => Err(DistError::RankPanicked(rank)),
                None => Ok(results),
            }
        })
    }

    /// One channel per ordered (source, destination) pair.
    fn wire(&self) -> Vec<LocalComm> {
        let size = self.size;
        let mut outboxes: Vec<Vec<Sender<Packet>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut inboxes: Vec<Vec<Receiver<Packet>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();

        for dst in 0..size {
            for src in 0..size {
                let (tx, rx) = channel();
                outboxes[src].push(tx);
                inboxes[dst].push(rx);
            }
        }

        outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outboxes, inboxes))| LocalComm {
                rank,
                size,
                outboxes,
                inboxes,
            })
            .collect()
    }
}

/// A rank's endpoint in a [`LocalWorld`].
#[derive(Debug)]
pub struct LocalComm {
    rank: usize,
    size: usize,
    /// Indexed by destination rank.
    outboxes: Vec<Sender<Packet>>,
    /// Indexed by source rank.
    inboxes: Vec<Receiver<Packet>>,
}

impl LocalComm {
    fn send(&self, to: usize, packet: Packet) -> Result<()> {
        self.outboxes[to]
            .send(packet)
            .map_err(|_| DistError::Disconnected { peer: to })
    }

    fn recv(&self, from: usize, expected: usize) -> Result<Packet> {
        let packet = self.inboxes[from]
            .recv()
            .map_err(|_| DistError::Disconnected { peer: from })?;
        if packet.len() != expected {
            return Err(DistError::LengthMismatch {
                expected,
                got: packet.len(),
                from,
            });
        }
        Ok(packet)
    }

    fn check_root(&self, root: usize) -> Result<()> {
        if root >= self.size {
            return Err(DistError::InvalidRoot {
                root,
                size: self.size,
            });
        }
        Ok(())
    }

    fn peers(&self, of: usize) -> impl Iterator<Item = usize> {
        (0..self.size).filter(move |&r| r != of)
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<()> {
        if self.rank == COORDINATOR {
            for peer in self.peers(COORDINATOR) {
                self.recv(peer, 0)?;
            }
            for peer in self.peers(COORDINATOR) {
                self.send(peer, Vec::new())?;
            }
        } else {
            self.send(COORDINATOR, Vec::new())?;
            self.recv(COORDINATOR, 0)?;
        }
        Ok(())
    }

    fn broadcast(&self, buf: &mut [f64], root: usize) -> Result<()> {
        self.check_root(root)?;
        if self.rank == root {
            for peer in self.peers(root) {
                self.send(peer, buf.to_vec())?;
            }
        } else {
            let packet = self.recv(root, buf.len())?;
            buf.copy_from_slice(&packet);
        }
        Ok(())
    }

    fn gather(&self, local: &[f64], root: usize) -> Result<Option<Vec<f64>>> {
        self.check_root(root)?;
        if self.rank != root {
            self.send(root, local.to_vec())?;
            return Ok(None);
        }

        let mut staged = Vec::with_capacity(local.len() * self.size);
        for src in 0..self.size {
            if src == root {
                staged.extend_from_slice(local);
            } else {
                staged.extend_from_slice(&self.recv(src, local.len())?);
            }
        }
        Ok(Some(staged))
    }

    fn reduce_sum(&self, value: f64, root: usize) -> Result<Option<f64>> {
        self.check_root(root)?;
        if self.rank != root {
            self.send(root, vec![value])?;
            return Ok(None);
        }

        // Rank order keeps the sum reproducible.
        let mut total = 0.0f64;
        for src in 0..self.size {
            if src == root {
                total += value;
            } else {
                total += self.recv(src, 1)?[0];
            }
        }
        Ok(Some(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ranks_rejected() {
        assert!(LocalWorld::new(0).is_err());
    }

    #[test]
    fn test_ranks_and_size() {
        let world = LocalWorld::new(3).unwrap();
        let ids = world.run(|comm| (comm.rank(), comm.size())).unwrap();
        assert_eq!(ids, vec![(0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_broadcast_from_nonzero_root() {
        let world = LocalWorld::new(4).unwrap();
        let bufs = world
            .run(|comm| {
                let mut buf = if comm.rank() == 2 {
                    vec![1.0, 2.0, 3.0]
                } else {
                    vec![0.0; 3]
                };
                comm.broadcast(&mut buf, 2).map(|_| buf)
            })
            .unwrap();
        for buf in bufs {
            assert_eq!(buf.unwrap(), vec![1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn test_gather_rank_order() {
        let world = LocalWorld::new(3).unwrap();
        let out = world
            .run(|comm| {
                let r = comm.rank() as f64;
                comm.gather(&[r, r + 0.5], COORDINATOR)
            })
            .unwrap();
        assert_eq!(
            out[0].as_ref().unwrap().as_ref().unwrap(),
            &vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5]
        );
        assert!(out[1].as_ref().unwrap().is_none());
        assert!(out[2].as_ref().unwrap().is_none());
    }

    #[test]
    fn test_reduce_sum() {
        let world = LocalWorld::new(5).unwrap();
        let out = world
            .run(|comm| comm.reduce_sum(comm.rank() as f64, COORDINATOR))
            .unwrap();
        assert_eq!(out[0].as_ref().unwrap(), &Some(10.0));
    }

    #[test]
    fn test_barrier_then_collectives() {
        let world = LocalWorld::new(4).unwrap();
        let out = world
            .run(|comm| -> Result<Option<f64>> {
                comm.barrier()?;
                comm.barrier()?;
                comm.reduce_sum(1.0, COORDINATOR)
            })
            .unwrap();
        assert_eq!(out[0].as_ref().unwrap(), &Some(4.0));
    }

    #[test]
    fn test_single_rank_world() {
        let world = LocalWorld::new(1).unwrap();
        let out = world
            .run(|comm| -> Result<Option<Vec<f64>>> {
                comm.barrier()?;
                let mut buf = [7.0];
                comm.broadcast(&mut buf, 0)?;
                comm.gather(&buf, 0)
            })
            .unwrap();
        assert_eq!(out[0].as_ref().unwrap(), &Some(vec![7.0]));
    }

    #[test]
    fn test_length_mismatch() {
        let world = LocalWorld::new(2).unwrap();
        let out = world
            .run(|comm| {
                let mut buf = vec![0.0; 2 + comm.rank()];
                comm.broadcast(&mut buf, 0)
            })
            .unwrap();
        assert!(matches!(
            out[1],
            Err(DistError::LengthMismatch {
                expected: 3,
                got: 2,
                from: 0
            })
        ));
    }

    #[test]
    fn test_invalid_root() {
        let world = LocalWorld::new(2).unwrap();
        let out = world.run(|comm| comm.reduce_sum(1.0, 2)).unwrap();
        assert!(out
            .iter()
            .all(|r| matches!(r, Err(DistError::InvalidRoot { root: 2, size: 2 }))));
    }

    #[test]
    fn test_panicking_rank_does_not_hang() {
        let world = LocalWorld::new(3).unwrap();
        let result = world.run(|comm| {
            if comm.rank() == 1 {
                panic!("rank 1 fails");
            }
            comm.reduce_sum(1.0, COORDINATOR)
        });
        assert!(matches!(result, Err(DistError::RankPanicked(1))));
    }
}
