//! S3 bucket count. The listing is account-global, so there is no region
//! fan-out here.

use crate::count::{ResourceCount, report_outcome};
use crate::monitor::ActivityMonitor;
use crate::provider::ServiceFactory;

pub async fn count_buckets(
    factory: &dyn ServiceFactory,
    monitor: &dyn ActivityMonitor,
) -> ResourceCount {
    monitor.start_action("Retrieving S3 bucket counts");

    let mut count = ResourceCount::new();
    match factory.storage().list_buckets().await {
        Ok(buckets) => count.add(buckets.len() as u64),
        Err(err) => count.record_error(format!("unable to list S3 buckets ({err})")),
    }

    report_outcome(monitor, &count);
    count
}
