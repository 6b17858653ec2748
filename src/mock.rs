//! Shared test doubles: an in-memory service factory driven by canned
//! responses, and a recording activity monitor.
//!
//! Every canned response is an `Option`; `None` makes the corresponding
//! call fail, which is how tests trigger each failure domain.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CountError;
use crate::monitor::ActivityMonitor;
use crate::pagination::Page;
use crate::provider::{
    ClusterDetail, ClusterService, ComputeService, DatabaseService, FunctionService,
    IdentityService, NodeGroupDetail, NodeLister, ServiceFactory, StorageService, TaskService,
    VmService,
};

/// Serve one page from a canned page list; the continuation token is the
/// next page's index.
fn page_at(pages: &[Vec<String>], token: Option<String>) -> Page<String> {
    let index = token.and_then(|t| t.parse::<usize>().ok()).unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = if index + 1 < pages.len() {
        Some((index + 1).to_string())
    } else {
        None
    };
    Page::new(items, next)
}

fn paged(
    pages: &Option<Vec<Vec<String>>>,
    token: Option<String>,
    what: &str,
) -> Result<Page<String>, CountError> {
    match pages {
        Some(pages) => Ok(page_at(pages, token)),
        None => Err(CountError::aws(format!(
            "{what} returned an unexpected error"
        ))),
    }
}

/// In-memory service factory with canned responses per family.
#[derive(Clone)]
pub struct FakeFactory {
    pub region: String,
    pub regions: Option<Vec<String>>,
    pub instance_pages: Option<Vec<Vec<String>>>,
    pub volume_pages: Option<Vec<Vec<String>>>,
    pub db_pages: Option<Vec<Vec<String>>>,
    pub buckets: Option<Vec<String>>,
    pub function_pages: Option<Vec<Vec<String>>>,
    pub task_pages: Option<Vec<Vec<String>>>,
    pub vm_pages: Option<Vec<Vec<String>>>,
    pub user_pages: Option<Vec<Vec<String>>>,
    pub account: Option<String>,
    pub cluster_pages: Option<Vec<Vec<String>>>,
    pub node_group_pages: Option<Vec<Vec<String>>>,
    pub desired_size: Option<u64>,
    pub live_nodes: Option<u64>,
    pub unreachable_clusters: Vec<String>,
    pub failing_cluster_regions: Vec<String>,
}

impl FakeFactory {
    /// A fully working account: 3 clusters, each with 2 node groups of
    /// desired size 2 and 2 registered nodes, everything else empty.
    pub fn healthy() -> Self {
        Self {
            region: "us-east-1".to_string(),
            regions: Some(Vec::new()),
            instance_pages: Some(Vec::new()),
            volume_pages: Some(Vec::new()),
            db_pages: Some(Vec::new()),
            buckets: Some(Vec::new()),
            function_pages: Some(Vec::new()),
            task_pages: Some(Vec::new()),
            vm_pages: Some(Vec::new()),
            user_pages: Some(Vec::new()),
            account: Some("123456789012".to_string()),
            cluster_pages: Some(vec![vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
            ]]),
            node_group_pages: Some(vec![vec![
                "workers-a".to_string(),
                "workers-b".to_string(),
            ]]),
            desired_size: Some(2),
            live_nodes: Some(2),
            unreachable_clusters: Vec::new(),
            failing_cluster_regions: Vec::new(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn without_regions(mut self) -> Self {
        self.regions = None;
        self
    }

    pub fn with_instance_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.instance_pages = Some(pages);
        self
    }

    pub fn with_volume_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.volume_pages = Some(pages);
        self
    }

    pub fn without_volumes(mut self) -> Self {
        self.volume_pages = None;
        self
    }

    pub fn with_db_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.db_pages = Some(pages);
        self
    }

    pub fn with_buckets(mut self, buckets: Vec<String>) -> Self {
        self.buckets = Some(buckets);
        self
    }

    pub fn without_buckets(mut self) -> Self {
        self.buckets = None;
        self
    }

    pub fn with_function_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.function_pages = Some(pages);
        self
    }

    pub fn with_task_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.task_pages = Some(pages);
        self
    }

    pub fn with_vm_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.vm_pages = Some(pages);
        self
    }

    pub fn with_user_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.user_pages = Some(pages);
        self
    }

    pub fn with_cluster_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.cluster_pages = Some(pages);
        self
    }

    pub fn without_node_groups(mut self) -> Self {
        self.node_group_pages = None;
        self
    }

    pub fn without_node_group_details(mut self) -> Self {
        self.desired_size = None;
        self
    }

    pub fn with_unreachable_cluster(mut self, cluster: &str) -> Self {
        self.unreachable_clusters.push(cluster.to_string());
        self
    }

    /// Make the top-level cluster listing fail in one region.
    pub fn with_failing_cluster_region(mut self, region: &str) -> Self {
        self.failing_cluster_regions.push(region.to_string());
        self
    }
}

#[async_trait]
impl ServiceFactory for FakeFactory {
    fn current_region(&self) -> &str {
        &self.region
    }

    fn compute(&self, _region: &str) -> Box<dyn ComputeService> {
        Box::new(FakeCompute {
            regions: self.regions.clone(),
            instance_pages: self.instance_pages.clone(),
            volume_pages: self.volume_pages.clone(),
        })
    }

    fn databases(&self, _region: &str) -> Box<dyn DatabaseService> {
        Box::new(FakeDatabases {
            pages: self.db_pages.clone(),
        })
    }

    fn storage(&self) -> Box<dyn StorageService> {
        Box::new(FakeStorage {
            buckets: self.buckets.clone(),
        })
    }

    fn functions(&self, _region: &str) -> Box<dyn FunctionService> {
        Box::new(FakeFunctions {
            pages: self.function_pages.clone(),
        })
    }

    fn tasks(&self, _region: &str) -> Box<dyn TaskService> {
        Box::new(FakeTasks {
            pages: self.task_pages.clone(),
        })
    }

    fn vms(&self, _region: &str) -> Box<dyn VmService> {
        Box::new(FakeVms {
            pages: self.vm_pages.clone(),
        })
    }

    fn identity(&self) -> Box<dyn IdentityService> {
        Box::new(FakeIdentity {
            account: self.account.clone(),
            user_pages: self.user_pages.clone(),
        })
    }

    fn clusters(&self, region: &str) -> Box<dyn ClusterService> {
        let cluster_pages = if self.failing_cluster_regions.iter().any(|r| r.as_str() == region) {
            None
        } else {
            self.cluster_pages.clone()
        };
        Box::new(FakeClusters {
            cluster_pages,
            node_group_pages: self.node_group_pages.clone(),
            desired_size: self.desired_size,
        })
    }

    async fn node_lister(
        &self,
        cluster: &ClusterDetail,
        _region: &str,
    ) -> Result<Box<dyn NodeLister>, CountError> {
        if self.unreachable_clusters.iter().any(|c| c == &cluster.name) {
            return Err(CountError::ClusterUnreachable {
                cluster: cluster.name.clone(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(Box::new(FakeNodeLister {
            nodes: self.live_nodes,
        }))
    }
}

struct FakeCompute {
    regions: Option<Vec<String>>,
    instance_pages: Option<Vec<Vec<String>>>,
    volume_pages: Option<Vec<Vec<String>>>,
}

#[async_trait]
impl ComputeService for FakeCompute {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        paged(&self.instance_pages, token, "DescribeInstances")
    }

    async fn list_volumes(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        paged(&self.volume_pages, token, "DescribeVolumes")
    }

    async fn list_regions(&self) -> Result<Vec<String>, CountError> {
        self.regions
            .clone()
            .ok_or_else(|| CountError::aws("DescribeRegions returned an unexpected error"))
    }
}

struct FakeDatabases {
    pages: Option<Vec<Vec<String>>>,
}

#[async_trait]
impl DatabaseService for FakeDatabases {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        paged(&self.pages, token, "DescribeDBInstances")
    }
}

struct FakeStorage {
    buckets: Option<Vec<String>>,
}

#[async_trait]
impl StorageService for FakeStorage {
    async fn list_buckets(&self) -> Result<Vec<String>, CountError> {
        self.buckets
            .clone()
            .ok_or_else(|| CountError::aws("ListBuckets returned an unexpected error"))
    }
}

struct FakeFunctions {
    pages: Option<Vec<Vec<String>>>,
}

#[async_trait]
impl FunctionService for FakeFunctions {
    async fn list_functions(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        paged(&self.pages, token, "ListFunctions")
    }
}

struct FakeTasks {
    pages: Option<Vec<Vec<String>>>,
}

#[async_trait]
impl TaskService for FakeTasks {
    async fn list_task_definitions(
        &self,
        token: Option<String>,
    ) -> Result<Page<String>, CountError> {
        paged(&self.pages, token, "ListTaskDefinitions")
    }
}

struct FakeVms {
    pages: Option<Vec<Vec<String>>>,
}

#[async_trait]
impl VmService for FakeVms {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        paged(&self.pages, token, "GetInstances")
    }
}

struct FakeIdentity {
    account: Option<String>,
    user_pages: Option<Vec<Vec<String>>>,
}

#[async_trait]
impl IdentityService for FakeIdentity {
    async fn account_id(&self) -> Result<String, CountError> {
        self.account
            .clone()
            .ok_or_else(|| CountError::aws("GetCallerIdentity returned an unexpected error"))
    }

    async fn list_users(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        paged(&self.user_pages, token, "ListUsers")
    }
}

struct FakeClusters {
    cluster_pages: Option<Vec<Vec<String>>>,
    node_group_pages: Option<Vec<Vec<String>>>,
    desired_size: Option<u64>,
}

#[async_trait]
impl ClusterService for FakeClusters {
    async fn list_clusters(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        paged(&self.cluster_pages, token, "ListClusters")
    }

    async fn describe_cluster(&self, name: &str) -> Result<ClusterDetail, CountError> {
        Ok(ClusterDetail {
            name: name.to_string(),
            endpoint: Some(format!("https://{name}.eks.example.com")),
            certificate_authority: None,
        })
    }

    async fn list_node_groups(
        &self,
        _cluster: &str,
        token: Option<String>,
    ) -> Result<Page<String>, CountError> {
        paged(&self.node_group_pages, token, "ListNodegroups")
    }

    async fn describe_node_group(
        &self,
        _cluster: &str,
        _group: &str,
    ) -> Result<NodeGroupDetail, CountError> {
        match self.desired_size {
            Some(desired_size) => Ok(NodeGroupDetail { desired_size }),
            None => Err(CountError::aws(
                "DescribeNodegroup returned an unexpected error",
            )),
        }
    }
}

struct FakeNodeLister {
    nodes: Option<u64>,
}

#[async_trait]
impl NodeLister for FakeNodeLister {
    async fn count_nodes(&self) -> Result<u64, CountError> {
        self.nodes
            .ok_or_else(|| CountError::kube("node listing returned an unexpected error"))
    }
}

/// Activity monitor that records everything it is told.
#[derive(Default)]
pub struct RecordingMonitor {
    actions: Mutex<Vec<String>>,
    results: Mutex<Vec<String>>,
    sub_errors: Mutex<Vec<String>>,
    fatal: Mutex<bool>,
}

impl RecordingMonitor {
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    pub fn results(&self) -> Vec<String> {
        self.results.lock().unwrap().clone()
    }

    pub fn sub_errors(&self) -> Vec<String> {
        self.sub_errors.lock().unwrap().clone()
    }

    pub fn error_occurred(&self) -> bool {
        *self.fatal.lock().unwrap()
    }
}

impl ActivityMonitor for RecordingMonitor {
    fn start_action(&self, label: &str) {
        self.actions.lock().unwrap().push(label.to_string());
    }

    fn end_action(&self, result: &str) {
        self.results.lock().unwrap().push(result.to_string());
    }

    fn message(&self, _fragment: &str) {}

    fn sub_resource_error(&self, message: &str) {
        self.sub_errors.lock().unwrap().push(message.to_string());
    }

    fn check_error(&self, err: Option<&CountError>) -> bool {
        if err.is_some() {
            *self.fatal.lock().unwrap() = true;
        }
        err.is_some()
    }
}
