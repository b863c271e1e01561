use std::fmt;

use crate::comm::Communicator;

/// Phases of one distributed run. No phase is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Distribute,
    Compute,
    Collect,
    Verify,
    Report,
    Teardown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Distribute => "distribute",
            Stage::Compute => "compute",
            Stage::Collect => "collect",
            Stage::Verify => "verify",
            Stage::Report => "report",
            Stage::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

/// Records that the calling rank entered `stage`.
pub fn enter(comm: &dyn Communicator, stage: Stage) {
    log::debug!("rank {}/{}: {}", comm.rank(), comm.size(), stage);
}
