//! Benchmark programs as functions: build inputs, time the serial baseline and
//! the parallel path, verify, and return a [`RunReport`].
//!
//! Serial and parallel paths write separate output buffers, so a parallel path
//! that leaves its output untouched cannot pass verification on the serial
//! result.

use std::time::Instant;

use pk_core::cpu::vector::{add_into, ramp};
use pk_core::matrix::alloc_zeroed;
use pk_core::verify::verify_vector_add;
use pk_core::{ComputeBackend, MatmulVerifier, Matrix, Partition, SerialBackend, ThreadTeam};
use pk_dist::stage::{enter, Stage};
use pk_dist::{matmul, pi, vector, Communicator};

use crate::report::{PiOutcome, RunReport, Workers};

/// Runs `f` and returns its result with the wall-clock seconds it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed().as_secs_f64())
}

fn vector_header(len: usize) -> Vec<String> {
    vec![format!("Vector Addition Example (N = {})", len)]
}

fn matrix_header(n: usize) -> Vec<String> {
    vec![format!("Matrix Multiplication Example ({}x{})", n, n)]
}

fn pi_header(steps: usize) -> Vec<String> {
    vec![
        "Pi Calculation using Midpoint Quadrature".to_string(),
        format!("Number of steps: {}", steps),
    ]
}

pub fn shared_vector_add(team: &ThreadTeam, len: usize) -> pk_core::Result<RunReport> {
    let a = ramp(len, 1.0)?;
    let b = ramp(len, 2.0)?;
    let mut serial_out = alloc_zeroed(len)?;
    let mut parallel_out = alloc_zeroed(len)?;

    let (serial, serial_seconds) =
        timed(|| SerialBackend::new().vector_add(&a, &b, &mut serial_out));
    serial?;
    let (parallel, parallel_seconds) = timed(|| team.vector_add(&a, &b, &mut parallel_out));
    parallel?;

    Ok(RunReport {
        header: vector_header(len),
        workers: Workers::Threads(team.workers()),
        label: "Shared",
        serial_seconds: Some(serial_seconds),
        parallel_seconds,
        pi: None,
        correct: Some(verify_vector_add(&a, &b, &parallel_out)),
    })
}

/// Vector add on a team of exactly `threads` threads, where thread `t` adds
/// the contiguous chunk `[t * len / threads, (t + 1) * len / threads)`.
///
/// # Errors
/// `UnevenPartition` if `len` is not a multiple of `threads`.
pub fn chunked_vector_add(len: usize, threads: usize) -> pk_core::Result<RunReport> {
    let partition = Partition::exact(len, threads)?;
    let team = ThreadTeam::with_size(threads)?;
    let a = ramp(len, 1.0)?;
    let b = ramp(len, 2.0)?;
    let mut serial_out = alloc_zeroed(len)?;
    let mut parallel_out = alloc_zeroed(len)?;

    let ((), serial_seconds) = timed(|| add_into(&a, &b, &mut serial_out));
    let (parallel, parallel_seconds) = timed(|| {
        team.run_pinned(&partition, 1, &mut parallel_out, |_, range, block| {
            add_into(&a[range.clone()], &b[range], block);
        })
    });
    parallel?;

    Ok(RunReport {
        header: vec![format!(
            "Vector Addition Example (N = {}, chunk = {})",
            len,
            len / threads
        )],
        workers: Workers::Threads(team.workers()),
        label: "Shared",
        serial_seconds: Some(serial_seconds),
        parallel_seconds,
        pi: None,
        correct: Some(verify_vector_add(&a, &b, &parallel_out)),
    })
}

pub fn shared_matmul(
    team: &ThreadTeam,
    n: usize,
    verifier: &MatmulVerifier,
) -> pk_core::Result<RunReport> {
    let a = Matrix::index_sum(n)?;
    let b = Matrix::index_sum(n)?;
    let mut serial_out = Matrix::zeros(n, n)?;
    let mut parallel_out = Matrix::zeros(n, n)?;

    let (serial, serial_seconds) = timed(|| SerialBackend::new().matmul(&a, &b, &mut serial_out));
    serial?;
    let (parallel, parallel_seconds) = timed(|| team.matmul(&a, &b, &mut parallel_out));
    parallel?;

    Ok(RunReport {
        header: matrix_header(n),
        workers: Workers::Threads(team.workers()),
        label: "Shared",
        serial_seconds: Some(serial_seconds),
        parallel_seconds,
        pi: None,
        correct: Some(verifier.verify(&a, &b, &parallel_out)),
    })
}

pub fn shared_pi(
    team: &ThreadTeam,
    steps: usize,
    samples: usize,
    seed: u64,
) -> pk_core::Result<RunReport> {
    let (serial, serial_seconds) = timed(|| SerialBackend::new().integrate_pi(steps));
    let serial = serial?;
    let (parallel, parallel_seconds) = timed(|| team.integrate_pi(steps));
    let parallel = parallel?;
    let sampled = team.sample_pi(samples, seed)?;

    Ok(RunReport {
        header: pi_header(steps),
        workers: Workers::Threads(team.workers()),
        label: "Shared",
        serial_seconds: Some(serial_seconds),
        parallel_seconds,
        pi: Some(PiOutcome {
            serial: Some(serial),
            parallel,
            sampled: Some((samples, sampled)),
        }),
        correct: None,
    })
}

pub fn dist_vector_add(comm: &dyn Communicator, len: usize) -> pk_dist::Result<Option<RunReport>> {
    enter(comm, Stage::Init);
    let mut serial_seconds = None;
    let (mut a, mut b) = if comm.is_coordinator() {
        let a = ramp(len, 1.0)?;
        let b = ramp(len, 2.0)?;
        let mut serial_out = alloc_zeroed(len)?;
        let ((), seconds) = timed(|| add_into(&a, &b, &mut serial_out));
        serial_seconds = Some(seconds);
        (a, b)
    } else {
        (alloc_zeroed(len)?, alloc_zeroed(len)?)
    };

    let (c, parallel_seconds) = timed(|| vector::add(comm, &mut a, &mut b));
    let report = c?.map(|c| {
        enter(comm, Stage::Verify);
        let correct = verify_vector_add(&a, &b, &c);
        enter(comm, Stage::Report);
        RunReport {
            header: vector_header(len),
            workers: Workers::Processes(comm.size()),
            label: "Distributed",
            serial_seconds,
            parallel_seconds,
            pi: None,
            correct: Some(correct),
        }
    });
    enter(comm, Stage::Teardown);
    Ok(report)
}

pub fn dist_matmul(
    comm: &dyn Communicator,
    n: usize,
    verifier: &MatmulVerifier,
) -> pk_dist::Result<Option<RunReport>> {
    enter(comm, Stage::Init);
    let mut serial_seconds = None;
    let (mut a, mut b) = if comm.is_coordinator() {
        let a = Matrix::index_sum(n)?;
        let b = Matrix::index_sum(n)?;
        let mut serial_out = Matrix::zeros(n, n)?;
        let (serial, seconds) = timed(|| SerialBackend::new().matmul(&a, &b, &mut serial_out));
        serial?;
        serial_seconds = Some(seconds);
        (a, b)
    } else {
        (Matrix::zeros(n, n)?, Matrix::zeros(n, n)?)
    };

    let (c, parallel_seconds) = timed(|| matmul::multiply(comm, &mut a, &mut b));
    let report = c?.map(|c| {
        enter(comm, Stage::Verify);
        let correct = verifier.verify(&a, &b, &c);
        enter(comm, Stage::Report);
        RunReport {
            header: matrix_header(n),
            workers: Workers::Processes(comm.size()),
            label: "Distributed",
            serial_seconds,
            parallel_seconds,
            pi: None,
            correct: Some(correct),
        }
    });
    enter(comm, Stage::Teardown);
    Ok(report)
}

pub fn dist_pi(comm: &dyn Communicator, steps: usize) -> pk_dist::Result<Option<RunReport>> {
    enter(comm, Stage::Init);
    let mut baseline = None;
    if comm.is_coordinator() {
        let (serial, seconds) = timed(|| SerialBackend::new().integrate_pi(steps));
        baseline = Some((serial?, seconds));
    }

    let (estimate, parallel_seconds) = timed(|| pi::integrate(comm, steps));
    let report = estimate?.map(|parallel| {
        enter(comm, Stage::Report);
        RunReport {
            header: pi_header(steps),
            workers: Workers::Processes(comm.size()),
            label: "Distributed",
            serial_seconds: baseline.map(|(_, seconds)| seconds),
            parallel_seconds,
            pi: Some(PiOutcome {
                serial: baseline.map(|(value, _)| value),
                parallel,
                sampled: None,
            }),
            correct: None,
        }
    });
    enter(comm, Stage::Teardown);
    Ok(report)
}
