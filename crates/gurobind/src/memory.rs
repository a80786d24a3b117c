//! Resident memory and wall time around native calls.
//!
//! The library allocates outside the Rust allocator, so its working set is
//! only visible as process RSS. [`CallFootprint`] records what one native
//! call did to it.

use std::fmt;
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Process footprint of a single native call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFootprint {
    /// Operation the call served, e.g. `"optimize"`.
    pub operation: &'static str,
    /// Resident set size in bytes just before the call.
    pub rss_before: u64,
    /// Resident set size in bytes just after the call.
    pub rss_after: u64,
    /// Wall time spent inside the call.
    pub elapsed: Duration,
}

impl CallFootprint {
    /// RSS growth across the call in bytes; negative when the library released memory.
    pub fn rss_delta(&self) -> i64 {
        self.rss_after as i64 - self.rss_before as i64
    }
}

impl fmt::Display for CallFootprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: rss {} -> {} bytes ({:+}) in {} ms",
            self.operation,
            self.rss_before,
            self.rss_after,
            self.rss_delta(),
            self.elapsed.as_millis()
        )
    }
}

/// Samples this process only.
struct Sampler {
    sys: System,
    pid: Pid,
}

impl Sampler {
    fn new() -> Self {
        Self {
            sys: System::new(),
            pid: Pid::from_u32(std::process::id()),
        }
    }

    fn resident_bytes(&mut self) -> Option<u64> {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.sys.process(self.pid).map(|process| process.memory())
    }
}

/// Run `call` and, when `enabled`, record its footprint.
///
/// The footprint is `None` when disabled or when the process cannot be read;
/// `call` runs exactly once either way.
pub(crate) fn measure<R>(
    operation: &'static str,
    enabled: bool,
    call: impl FnOnce() -> R,
) -> (R, Option<CallFootprint>) {
    if !enabled {
        return (call(), None);
    }
    let mut sampler = Sampler::new();
    let before = sampler.resident_bytes();
    let started = Instant::now();
    let result = call();
    let elapsed = started.elapsed();
    let footprint = before
        .zip(sampler.resident_bytes())
        .map(|(rss_before, rss_after)| CallFootprint {
            operation,
            rss_before,
            rss_after,
            elapsed,
        });
    (result, footprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_measure_only_runs_the_call() {
        let mut runs = 0;
        let (value, footprint) = measure("optimize", false, || {
            runs += 1;
            7
        });
        assert_eq!(value, 7);
        assert_eq!(runs, 1);
        assert!(footprint.is_none());
    }

    #[test]
    fn test_measure_samples_around_the_call() {
        let (len, footprint) = measure("compute_iis", true, || vec![0_u8; 1 << 16].len());
        assert_eq!(len, 1 << 16);
        let footprint = footprint.expect("process should be readable");
        assert_eq!(footprint.operation, "compute_iis");
        assert!(footprint.rss_before > 0);
        assert!(footprint.rss_after > 0);
    }

    #[test]
    fn test_footprint_reports_shrinkage() {
        let footprint = CallFootprint {
            operation: "optimize",
            rss_before: 2000,
            rss_after: 1750,
            elapsed: Duration::from_millis(12),
        };
        assert_eq!(footprint.rss_delta(), -250);
        assert_eq!(
            footprint.to_string(),
            "optimize: rss 2000 -> 1750 bytes (-250) in 12 ms"
        );
    }
}
