//! EKS worker node count — the nested traversal.
//!
//! Per region: page through clusters, and for each cluster either sum the
//! configured desired size of its node groups or ask the cluster's own
//! control plane how many nodes are registered, depending on
//! [`NodeSource`]. Failures here are expected and partial: one
//! misconfigured cluster must not hide counts from every other cluster or
//! region, so each failure point records an error and the traversal moves
//! on instead of unwinding.

use tracing::debug;

use crate::config::NodeSource;
use crate::count::regions::resolve_regions;
use crate::count::{ResourceCount, region_label, report_outcome};
use crate::monitor::ActivityMonitor;
use crate::pagination::Pager;
use crate::provider::{ClusterService, ServiceFactory};

pub async fn count_cluster_nodes(
    factory: &dyn ServiceFactory,
    monitor: &dyn ActivityMonitor,
    all_regions: bool,
    source: NodeSource,
) -> ResourceCount {
    monitor.start_action("Retrieving EKS node counts");

    let mut count = ResourceCount::new();
    for region in resolve_regions(factory, monitor, all_regions).await {
        count.merge(nodes_in_region(factory, monitor, &region, source).await);
    }

    report_outcome(monitor, &count);
    count
}

/// One region's node total. A failure of the cluster listing itself is
/// fatal to this region only: it contributes zero and one error.
async fn nodes_in_region(
    factory: &dyn ServiceFactory,
    monitor: &dyn ActivityMonitor,
    region: &str,
    source: NodeSource,
) -> ResourceCount {
    monitor.message(".");

    let svc = factory.clusters(region);
    let mut count = ResourceCount::new();
    let mut pager = Pager::new();
    while !pager.is_done() {
        let page = match svc.list_clusters(pager.token()).await {
            Ok(page) => page,
            Err(err) => {
                count.record_error(format!(
                    "unable to list clusters in {} ({err})",
                    region_label(region)
                ));
                break;
            }
        };

        for cluster in &page.items {
            debug!("Counting nodes for cluster {}", cluster);
            let contribution = match source {
                NodeSource::Desired => desired_capacity(svc.as_ref(), cluster, region).await,
                NodeSource::Live => live_nodes(factory, svc.as_ref(), cluster, region).await,
            };
            count.merge(contribution);
        }

        pager.advance(&page);
    }

    count
}

/// Sum of the configured desired size across one cluster's node groups.
/// A node-group listing or describe failure is fatal to that item only.
async fn desired_capacity(
    svc: &dyn ClusterService,
    cluster: &str,
    region: &str,
) -> ResourceCount {
    let mut count = ResourceCount::new();
    let mut pager = Pager::new();
    while !pager.is_done() {
        let page = match svc.list_node_groups(cluster, pager.token()).await {
            Ok(page) => page,
            Err(err) => {
                count.record_error(format!(
                    "unable to list node groups for cluster {cluster} in {} ({err})",
                    region_label(region)
                ));
                break;
            }
        };

        for group in &page.items {
            match svc.describe_node_group(cluster, group).await {
                Ok(detail) => count.add(detail.desired_size),
                Err(err) => count.record_error(format!(
                    "unable to describe node group {group} of cluster {cluster} in {} ({err})",
                    region_label(region)
                )),
            }
        }

        pager.advance(&page);
    }

    count
}

/// Number of nodes actually registered with one cluster's control plane.
/// Describe, connect, and list failures are each fatal to this cluster only.
async fn live_nodes(
    factory: &dyn ServiceFactory,
    svc: &dyn ClusterService,
    cluster: &str,
    region: &str,
) -> ResourceCount {
    let mut count = ResourceCount::new();

    let detail = match svc.describe_cluster(cluster).await {
        Ok(detail) => detail,
        Err(err) => {
            count.record_error(format!(
                "unable to describe cluster {cluster} in {} ({err})",
                region_label(region)
            ));
            return count;
        }
    };

    let lister = match factory.node_lister(&detail, region).await {
        Ok(lister) => lister,
        Err(err) => {
            count.record_error(format!(
                "unable to connect to cluster {cluster} in {} ({err})",
                region_label(region)
            ));
            return count;
        }
    };

    match lister.count_nodes().await {
        Ok(nodes) => count.add(nodes),
        Err(err) => count.record_error(format!(
            "unable to list nodes in cluster {cluster} in {} ({err})",
            region_label(region)
        )),
    }

    count
}
