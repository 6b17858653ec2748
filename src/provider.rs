//! Cloud provider service abstractions.
//!
//! Each resource family gets a small trait exposing the list/describe calls
//! the counters need, so counting logic never touches a concrete SDK client
//! and can run against in-memory fakes in tests. The [`ServiceFactory`]
//! hands out a service bound to a region; the empty string always means
//! "the factory's default region", never a real region name.

pub mod aws;
pub mod k8s;

use async_trait::async_trait;

use crate::error::CountError;
use crate::pagination::Page;

/// EC2: instances, EBS volumes, and the account's enabled regions.
#[async_trait]
pub trait ComputeService: Send + Sync {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError>;
    async fn list_volumes(&self, token: Option<String>) -> Result<Page<String>, CountError>;
    async fn list_regions(&self) -> Result<Vec<String>, CountError>;
}

/// RDS database instances.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError>;
}

/// S3 buckets. The bucket listing is account-global and unpaginated.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>, CountError>;
}

/// Lambda functions.
#[async_trait]
pub trait FunctionService: Send + Sync {
    async fn list_functions(&self, token: Option<String>) -> Result<Page<String>, CountError>;
}

/// ECS task definitions.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_task_definitions(&self, token: Option<String>)
    -> Result<Page<String>, CountError>;
}

/// Lightsail instances.
#[async_trait]
pub trait VmService: Send + Sync {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError>;
}

/// STS caller identity and IAM users.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn account_id(&self) -> Result<String, CountError>;
    async fn list_users(&self, token: Option<String>) -> Result<Page<String>, CountError>;
}

/// EKS clusters and node groups.
#[async_trait]
pub trait ClusterService: Send + Sync {
    async fn list_clusters(&self, token: Option<String>) -> Result<Page<String>, CountError>;
    async fn describe_cluster(&self, name: &str) -> Result<ClusterDetail, CountError>;
    async fn list_node_groups(
        &self,
        cluster: &str,
        token: Option<String>,
    ) -> Result<Page<String>, CountError>;
    async fn describe_node_group(
        &self,
        cluster: &str,
        group: &str,
    ) -> Result<NodeGroupDetail, CountError>;
}

/// A client scoped to one cluster's control plane, used only by the
/// live node counting path.
#[async_trait]
pub trait NodeLister: Send + Sync {
    /// Number of nodes currently registered with the cluster.
    async fn count_nodes(&self) -> Result<u64, CountError>;
}

/// Cluster metadata needed to reach its control plane.
#[derive(Debug, Clone)]
pub struct ClusterDetail {
    pub name: String,
    pub endpoint: Option<String>,
    pub certificate_authority: Option<String>,
}

/// A node group's autoscaling configuration, reduced to what counting needs.
#[derive(Debug, Clone, Copy)]
pub struct NodeGroupDetail {
    /// Configured capacity target; may differ from the number of nodes
    /// actually running while autoscaling reconciles.
    pub desired_size: u64,
}

/// Produces region-bound service handles.
///
/// Stateless with respect to prior calls: every method returns an
/// independent handle for the requested region.
#[async_trait]
pub trait ServiceFactory: Send + Sync {
    /// The resolved default region.
    fn current_region(&self) -> &str;

    fn compute(&self, region: &str) -> Box<dyn ComputeService>;
    fn databases(&self, region: &str) -> Box<dyn DatabaseService>;
    fn storage(&self) -> Box<dyn StorageService>;
    fn functions(&self, region: &str) -> Box<dyn FunctionService>;
    fn tasks(&self, region: &str) -> Box<dyn TaskService>;
    fn vms(&self, region: &str) -> Box<dyn VmService>;
    fn identity(&self) -> Box<dyn IdentityService>;
    fn clusters(&self, region: &str) -> Box<dyn ClusterService>;

    /// Open a client scoped to one cluster's control plane. Fails when the
    /// cluster has no reachable endpoint or the connection cannot be built.
    async fn node_lister(
        &self,
        cluster: &ClusterDetail,
        region: &str,
    ) -> Result<Box<dyn NodeLister>, CountError>;
}
