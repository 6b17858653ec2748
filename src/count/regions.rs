//! Region resolution for all-regions fan-out.

use tracing::debug;

use crate::monitor::ActivityMonitor;
use crate::provider::ServiceFactory;

/// The set of regions a counter should visit.
///
/// When `all_regions` is false this is just the default-region sentinel
/// (the empty string). Otherwise it asks EC2 for the regions the account is
/// opted into. A failure there is deliberately degraded, not propagated: it
/// is reported as a sub-resource error and the counter falls back to the
/// default region only, so a transient regions-list failure never prevents
/// counting altogether.
pub async fn resolve_regions(
    factory: &dyn ServiceFactory,
    monitor: &dyn ActivityMonitor,
    all_regions: bool,
) -> Vec<String> {
    if !all_regions {
        return vec![String::new()];
    }

    match factory.compute("").list_regions().await {
        Ok(regions) if !regions.is_empty() => {
            debug!("Account is opted into {} regions", regions.len());
            regions
        }
        Ok(_) => vec![String::new()],
        Err(err) => {
            monitor.sub_resource_error(&format!(
                "unable to list enabled regions ({err}); falling back to the current region"
            ));
            vec![String::new()]
        }
    }
}
