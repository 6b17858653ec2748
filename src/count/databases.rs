//! RDS database instance count.

use crate::count::regions::resolve_regions;
use crate::count::{ResourceCount, region_label, report_outcome};
use crate::monitor::ActivityMonitor;
use crate::pagination::Pager;
use crate::provider::ServiceFactory;

pub async fn count_databases(
    factory: &dyn ServiceFactory,
    monitor: &dyn ActivityMonitor,
    all_regions: bool,
) -> ResourceCount {
    monitor.start_action("Retrieving RDS instance counts");

    let mut count = ResourceCount::new();
    for region in resolve_regions(factory, monitor, all_regions).await {
        monitor.message(".");
        let svc = factory.databases(&region);
        let mut pager = Pager::new();
        while !pager.is_done() {
            match svc.list_instances(pager.token()).await {
                Ok(page) => {
                    count.add(page.len() as u64);
                    pager.advance(&page);
                }
                Err(err) => {
                    count.record_error(format!(
                        "unable to list RDS instances in {} ({err})",
                        region_label(&region)
                    ));
                    break;
                }
            }
        }
    }

    report_outcome(monitor, &count);
    count
}
