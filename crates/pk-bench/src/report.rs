use std::f64::consts::PI;
use std::fmt;

/// Who ran the parallel path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workers {
    Threads(usize),
    Processes(usize),
}

impl fmt::Display for Workers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workers::Threads(n) => write!(f, "Number of threads: {}", n),
            Workers::Processes(n) => write!(f, "Number of processes: {}", n),
        }
    }
}

/// Pi estimates produced by one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiOutcome {
    pub serial: Option<f64>,
    pub parallel: f64,
    /// Monte-Carlo estimate and the number of samples behind it.
    pub sampled: Option<(usize, f64)>,
}

impl PiOutcome {
    /// Signed error of the parallel estimate.
    pub fn error(&self) -> f64 {
        self.parallel - PI
    }
}

/// Everything a benchmark prints, collected before printing.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub header: Vec<String>,
    pub workers: Workers,
    /// Label of the parallel path, e.g. "Shared" or "Distributed".
    pub label: &'static str,
    pub serial_seconds: Option<f64>,
    pub parallel_seconds: f64,
    pub pi: Option<PiOutcome>,
    pub correct: Option<bool>,
}

impl RunReport {
    pub fn speedup(&self) -> Option<f64> {
        match self.serial_seconds {
            Some(serial) if self.parallel_seconds > 0.0 => Some(serial / self.parallel_seconds),
            _ => None,
        }
    }
}

pub fn verdict(correct: bool) -> &'static str {
    if correct {
        "Yes"
    } else {
        "No"
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.header {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}", self.workers)?;

        if let Some(serial) = self.serial_seconds {
            if let Some(pi) = self.pi.and_then(|p| p.serial) {
                writeln!(f, "Serial Pi: {:.10}", pi)?;
            }
            writeln!(f, "Serial time: {:.6} seconds", serial)?;
        }

        if let Some(pi) = &self.pi {
            writeln!(f, "{} Pi: {:.10}", self.label, pi.parallel)?;
        }
        writeln!(f, "{} time: {:.6} seconds", self.label, self.parallel_seconds)?;

        if let Some(speedup) = self.speedup() {
            writeln!(f, "Speedup: {:.2}x", speedup)?;
        }

        if let Some(pi) = &self.pi {
            writeln!(f, "Error: {:.2e}", pi.error())?;
            if let Some((samples, estimate)) = pi.sampled {
                writeln!(f, "Monte Carlo Pi ({} samples): {:.10}", samples, estimate)?;
            }
        }

        if let Some(correct) = self.correct {
            writeln!(f, "Result correct: {}", verdict(correct))?;
        }
        Ok(())
    }
}
