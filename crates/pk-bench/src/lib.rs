//! `pk-bench` - Serial vs parallel benchmark programs for parallel-kernels.
//!
//! Each binary in `src/bin` runs one program: fixed-size inputs, a timed
//! serial baseline, a timed parallel run, a correctness check, and a text
//! report on stdout.

pub mod config;
pub mod report;
pub mod runs;

pub use config::{init_logging, LaunchArgs};
pub use report::RunReport;

use pk_dist::Communicator;

/// Runs `job` on every rank of an in-process world of `launch.workers` ranks
/// and prints the coordinator's report.
#[cfg(not(feature = "mpi"))]
pub fn run_distributed<F>(launch: &LaunchArgs, job: F) -> anyhow::Result<()>
where
    F: Fn(&dyn Communicator) -> pk_dist::Result<Option<RunReport>> + Sync,
{
    let world = pk_dist::LocalWorld::new(launch.workers)?;
    for report in settle(world.run(|comm| job(comm))?)? {
        print!("{}", report);
    }
    Ok(())
}

/// Collects the reports of every rank, or the error that explains why the
/// run failed. A rank's own error wins over the `Disconnected` its peers saw
/// when it left early.
#[cfg(not(feature = "mpi"))]
fn settle(outcomes: Vec<pk_dist::Result<Option<RunReport>>>) -> pk_dist::Result<Vec<RunReport>> {
    let mut reports = Vec::new();
    let mut cause = None;
    let mut disconnect = None;
    for outcome in outcomes {
        match outcome {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(err @ pk_dist::DistError::Disconnected { .. }) => {
                disconnect.get_or_insert(err);
            }
            Err(err) => {
                cause.get_or_insert(err);
            }
        }
    }
    match cause.or(disconnect) {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}

/// Runs `job` as this process's rank of the MPI world started by `mpirun`
/// and prints the report if this rank is the coordinator.
#[cfg(feature = "mpi")]
pub fn run_distributed<F>(_launch: &LaunchArgs, job: F) -> anyhow::Result<()>
where
    F: Fn(&dyn Communicator) -> pk_dist::Result<Option<RunReport>> + Sync,
{
    let comm = pk_dist::MpiComm::init()?;
    if let Some(report) = job(&comm)? {
        print!("{}", report);
    }
    Ok(())
}

#[cfg(all(test, not(feature = "mpi")))]
mod tests {
    use super::*;
    use pk_core::KernelError;
    use pk_dist::DistError;
    use crate::report::Workers;

    fn report() -> RunReport {
        RunReport {
            header: vec!["Vector Addition Example (N = 8)".to_string()],
            workers: Workers::Processes(2),
            label: "Distributed",
            serial_seconds: None,
            parallel_seconds: 0.1,
            pi: None,
            correct: Some(true),
        }
    }

    #[test]
    fn test_settle_keeps_coordinator_report() {
        let reports = settle(vec![Ok(Some(report())), Ok(None)]).unwrap();
        assert_eq!(reports, vec![report()]);
    }

    #[test]
    fn test_settle_prefers_root_cause() {
        let outcomes = vec![
            Err(DistError::Disconnected { peer: 1 }),
            Err(DistError::Kernel(KernelError::Allocation { elements: 8 })),
            Ok(None),
        ];
        assert!(matches!(
            settle(outcomes),
            Err(DistError::Kernel(KernelError::Allocation { elements: 8 }))
        ));
    }

    #[test]
    fn test_settle_falls_back_to_disconnect() {
        let outcomes = vec![Err(DistError::Disconnected { peer: 2 }), Ok(None)];
        assert!(matches!(settle(outcomes), Err(DistError::Disconnected { peer: 2 })));
    }

    #[test]
    fn test_failed_rank_reported_over_disconnect() {
        let outcomes = pk_dist::LocalWorld::new(2)
            .unwrap()
            .run(|comm| -> pk_dist::Result<Option<RunReport>> {
                if comm.rank() == 1 {
                    return Err(KernelError::Allocation { elements: 1 }.into());
                }
                comm.gather(&[1.0], pk_dist::COORDINATOR)?;
                Ok(Some(report()))
            })
            .unwrap();
        assert!(matches!(outcomes[0], Err(DistError::Disconnected { peer: 1 })));
        assert!(matches!(
            settle(outcomes),
            Err(DistError::Kernel(KernelError::Allocation { elements: 1 }))
        ));
    }
}
