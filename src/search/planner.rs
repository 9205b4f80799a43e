//! Adaptive choice between serial and parallel search execution.
//!
//! Thread fan-out only pays for itself once enough bytes are in play;
//! small workloads are dominated by staging and thread start-up cost, and
//! index-assisted runs shift the break-even points again. The decision
//! table below encodes the calibrated thresholds.

/// Two-target workloads below this total stay serial.
const SMALL_TWO_TARGET_BYTES: u64 = 96 * 1024 * 1024;
/// Up-to-three-target workloads below this per-target average stay serial.
const SMALL_PER_TARGET_BYTES: u64 = 48 * 1024 * 1024;
/// Workloads below this total are capped at two workers.
const MEDIUM_TOTAL_BYTES: u64 = 512 * 1024 * 1024;

/// Execution strategy for a multi-target search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Number of parallel workers; `1` means run serially.
    pub workers: usize,
    /// Short tag naming the decision-table row that fired.
    pub reason: &'static str,
}

/// Choose a worker count for `target_count` files totalling `total_bytes`.
///
/// `total_bytes <= 0` means the size could not be determined.
/// `use_index_cache` signals that an external per-file index exists for
/// the targets; its presence lowers per-file scan cost and therefore
/// shifts the serial/parallel break-even. `max_workers` caps fan-out.
///
/// The first matching row of the decision table wins.
#[must_use]
pub fn choose_execution_plan(
    target_count: usize,
    total_bytes: u64,
    use_index_cache: bool,
    max_workers: usize,
) -> ExecutionPlan {
    if target_count <= 1 {
        return ExecutionPlan {
            workers: 1,
            reason: "single target",
        };
    }

    let bounded = target_count.min(max_workers).max(1);

    if use_index_cache {
        if target_count == 2 {
            return ExecutionPlan {
                workers: 1,
                reason: "indexed two-target workload",
            };
        }
        if total_bytes == 0 {
            return ExecutionPlan {
                workers: bounded,
                reason: "indexed workload size unavailable",
            };
        }
        if total_bytes < MEDIUM_TOTAL_BYTES {
            return ExecutionPlan {
                workers: bounded.min(2),
                reason: "indexed medium workload",
            };
        }
        return ExecutionPlan {
            workers: bounded,
            reason: "indexed large workload",
        };
    }

    if total_bytes == 0 {
        return ExecutionPlan {
            workers: bounded,
            reason: "workload size unavailable",
        };
    }

    if target_count == 2 && total_bytes < SMALL_TWO_TARGET_BYTES {
        return ExecutionPlan {
            workers: 1,
            reason: "small two-target workload",
        };
    }

    let per_target = total_bytes / target_count as u64;
    if target_count <= 3 && per_target < SMALL_PER_TARGET_BYTES {
        return ExecutionPlan {
            workers: 1,
            reason: "small per-target workload",
        };
    }

    if total_bytes < MEDIUM_TOTAL_BYTES && bounded > 2 {
        return ExecutionPlan {
            workers: 2,
            reason: "medium workload",
        };
    }

    ExecutionPlan {
        workers: bounded,
        reason: "large workload",
    }
}
