//! Resource counters.
//!
//! One submodule per resource family. Every counter returns a
//! [`ResourceCount`]: a best-effort total plus the errors hit along the way,
//! in visitation order. Partial failures never abort a run; they are
//! accumulated here and surfaced through the activity monitor.

pub mod buckets;
pub mod databases;
pub mod functions;
pub mod instances;
pub mod nodes;
pub mod regions;
pub mod tasks;
pub mod users;
pub mod vms;
pub mod volumes;

pub use buckets::count_buckets;
pub use databases::count_databases;
pub use functions::count_functions;
pub use instances::count_instances;
pub use nodes::count_cluster_nodes;
pub use tasks::count_task_definitions;
pub use users::count_users;
pub use vms::count_vms;
pub use volumes::count_volumes;

use crate::monitor::ActivityMonitor;

/// Aggregate result of one counting phase.
///
/// The total is defined even when some items errored: each failure
/// contributes zero and one error string, never a reset or an abort.
#[derive(Debug, Default, Clone)]
pub struct ResourceCount {
    pub total: u64,
    pub errors: Vec<String>,
}

impl ResourceCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, n: u64) {
        self.total += n;
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Fold another phase's result into this one. Totals sum; error lists
    /// concatenate in visitation order.
    pub fn merge(&mut self, other: ResourceCount) {
        self.total += other.total;
        self.errors.extend(other.errors);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Human-readable name for a region, where the empty string stands for the
/// session's default region.
pub(crate) fn region_label(region: &str) -> &str {
    if region.is_empty() {
        "the current region"
    } else {
        region
    }
}

/// Close out a phase: report the total, then relay every accumulated error.
pub(crate) fn report_outcome(monitor: &dyn ActivityMonitor, count: &ResourceCount) {
    monitor.end_action(&format!("OK ({})", count.total));
    if !count.is_clean() {
        for error in &count.errors {
            monitor.sub_resource_error(error);
        }
    }
}
