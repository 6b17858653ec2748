//! IAM user count. IAM is account-global, so there is no region fan-out.

use crate::count::{ResourceCount, report_outcome};
use crate::monitor::ActivityMonitor;
use crate::pagination::Pager;
use crate::provider::ServiceFactory;

pub async fn count_users(
    factory: &dyn ServiceFactory,
    monitor: &dyn ActivityMonitor,
) -> ResourceCount {
    monitor.start_action("Retrieving IAM user counts");

    let mut count = ResourceCount::new();
    let svc = factory.identity();
    let mut pager = Pager::new();
    while !pager.is_done() {
        match svc.list_users(pager.token()).await {
            Ok(page) => {
                count.add(page.len() as u64);
                pager.advance(&page);
            }
            Err(err) => {
                count.record_error(format!("unable to list IAM users ({err})"));
                break;
            }
        }
    }

    report_outcome(monitor, &count);
    count
}
