//! AWS SDK-backed service factory and per-family service implementations.

use anyhow::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::{debug, info};

use crate::error::CountError;
use crate::pagination::Page;
use crate::provider::{
    ClusterDetail, ClusterService, ComputeService, DatabaseService, FunctionService,
    IdentityService, NodeGroupDetail, NodeLister, ServiceFactory, StorageService, TaskService,
    VmService,
};

/// Used when neither the command line nor the profile supplies a region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Service factory bound to one AWS credential chain and default region.
pub struct AwsServiceFactory {
    config: SdkConfig,
    region: String,
}

impl AwsServiceFactory {
    /// Load AWS configuration and resolve the default region.
    ///
    /// Region resolution priority: explicit argument, then the profile or
    /// environment, then [`DEFAULT_REGION`].
    pub async fn new(profile: Option<&str>, region: Option<&str>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = profile {
            debug!("Using AWS profile: {}", profile);
            loader = loader.profile_name(profile);
        }

        if let Some(region) = region {
            debug!("Using AWS region: {}", region);
            loader = loader.region(Region::new(region.to_string()));
        }

        let mut config = loader.load().await;

        if config.region().is_none() {
            debug!("No region resolved, falling back to {}", DEFAULT_REGION);
            config = config
                .to_builder()
                .region(Region::new(DEFAULT_REGION))
                .build();
        }

        let region = config
            .region()
            .map(|r| r.to_string())
            .ok_or(CountError::NoRegion)?;

        info!("AWS configuration loaded for region {}", region);
        Ok(Self { config, region })
    }

    /// SDK configuration rebound to the given region; the empty string keeps
    /// the factory's default.
    fn scoped(&self, region: &str) -> SdkConfig {
        if region.is_empty() {
            self.config.clone()
        } else {
            self.config
                .to_builder()
                .region(Region::new(region.to_string()))
                .build()
        }
    }
}

#[async_trait]
impl ServiceFactory for AwsServiceFactory {
    fn current_region(&self) -> &str {
        &self.region
    }

    fn compute(&self, region: &str) -> Box<dyn ComputeService> {
        Box::new(Ec2Compute {
            client: aws_sdk_ec2::Client::new(&self.scoped(region)),
        })
    }

    fn databases(&self, region: &str) -> Box<dyn DatabaseService> {
        Box::new(RdsDatabases {
            client: aws_sdk_rds::Client::new(&self.scoped(region)),
        })
    }

    fn storage(&self) -> Box<dyn StorageService> {
        Box::new(S3Storage {
            client: aws_sdk_s3::Client::new(&self.config),
        })
    }

    fn functions(&self, region: &str) -> Box<dyn FunctionService> {
        Box::new(LambdaFunctions {
            client: aws_sdk_lambda::Client::new(&self.scoped(region)),
        })
    }

    fn tasks(&self, region: &str) -> Box<dyn TaskService> {
        Box::new(EcsTasks {
            client: aws_sdk_ecs::Client::new(&self.scoped(region)),
        })
    }

    fn vms(&self, region: &str) -> Box<dyn VmService> {
        Box::new(LightsailVms {
            client: aws_sdk_lightsail::Client::new(&self.scoped(region)),
        })
    }

    fn identity(&self) -> Box<dyn IdentityService> {
        Box::new(AwsIdentity {
            sts: aws_sdk_sts::Client::new(&self.config),
            iam: aws_sdk_iam::Client::new(&self.config),
        })
    }

    fn clusters(&self, region: &str) -> Box<dyn ClusterService> {
        Box::new(EksClusters {
            client: aws_sdk_eks::Client::new(&self.scoped(region)),
        })
    }

    async fn node_lister(
        &self,
        cluster: &ClusterDetail,
        region: &str,
    ) -> Result<Box<dyn NodeLister>, CountError> {
        let region = if region.is_empty() {
            &self.region
        } else {
            region
        };
        let lister = crate::provider::k8s::ClusterNodeLister::connect(cluster, region).await?;
        Ok(Box::new(lister))
    }
}

struct Ec2Compute {
    client: aws_sdk_ec2::Client,
}

#[async_trait]
impl ComputeService for Ec2Compute {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        let mut request = self.client.describe_instances();
        if let Some(token) = token {
            request = request.next_token(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let ids = response
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .filter_map(|i| i.instance_id().map(String::from))
            .collect();
        Ok(Page::new(ids, response.next_token().map(String::from)))
    }

    async fn list_volumes(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        let mut request = self.client.describe_volumes();
        if let Some(token) = token {
            request = request.next_token(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let ids = response
            .volumes()
            .iter()
            .filter_map(|v| v.volume_id().map(String::from))
            .collect();
        Ok(Page::new(ids, response.next_token().map(String::from)))
    }

    async fn list_regions(&self) -> Result<Vec<String>, CountError> {
        // Only regions the account can actually use.
        let filter = aws_sdk_ec2::types::Filter::builder()
            .name("opt-in-status")
            .values("opt-in-not-required")
            .values("opted-in")
            .build();

        let response = self
            .client
            .describe_regions()
            .filters(filter)
            .send()
            .await
            .map_err(CountError::aws)?;

        let regions = response
            .regions()
            .iter()
            .filter_map(|r| r.region_name().map(String::from))
            .collect();
        Ok(regions)
    }
}

struct RdsDatabases {
    client: aws_sdk_rds::Client,
}

#[async_trait]
impl DatabaseService for RdsDatabases {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        let mut request = self.client.describe_db_instances();
        if let Some(token) = token {
            request = request.marker(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let ids = response
            .db_instances()
            .iter()
            .filter_map(|db| db.db_instance_identifier().map(String::from))
            .collect();
        Ok(Page::new(ids, response.marker().map(String::from)))
    }
}

struct S3Storage {
    client: aws_sdk_s3::Client,
}

#[async_trait]
impl StorageService for S3Storage {
    async fn list_buckets(&self) -> Result<Vec<String>, CountError> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(CountError::aws)?;

        let names = response
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(String::from))
            .collect();
        Ok(names)
    }
}

struct LambdaFunctions {
    client: aws_sdk_lambda::Client,
}

#[async_trait]
impl FunctionService for LambdaFunctions {
    async fn list_functions(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        let mut request = self.client.list_functions();
        if let Some(token) = token {
            request = request.marker(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let names = response
            .functions()
            .iter()
            .filter_map(|f| f.function_name().map(String::from))
            .collect();
        Ok(Page::new(names, response.next_marker().map(String::from)))
    }
}

struct EcsTasks {
    client: aws_sdk_ecs::Client,
}

#[async_trait]
impl TaskService for EcsTasks {
    async fn list_task_definitions(
        &self,
        token: Option<String>,
    ) -> Result<Page<String>, CountError> {
        let mut request = self
            .client
            .list_task_definitions()
            .status(aws_sdk_ecs::types::TaskDefinitionStatus::Active);
        if let Some(token) = token {
            request = request.next_token(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let arns = response.task_definition_arns().to_vec();
        Ok(Page::new(arns, response.next_token().map(String::from)))
    }
}

struct LightsailVms {
    client: aws_sdk_lightsail::Client,
}

#[async_trait]
impl VmService for LightsailVms {
    async fn list_instances(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        let mut request = self.client.get_instances();
        if let Some(token) = token {
            request = request.page_token(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let names = response
            .instances()
            .iter()
            .filter_map(|i| i.name().map(String::from))
            .collect();
        Ok(Page::new(names, response.next_page_token().map(String::from)))
    }
}

struct AwsIdentity {
    sts: aws_sdk_sts::Client,
    iam: aws_sdk_iam::Client,
}

#[async_trait]
impl IdentityService for AwsIdentity {
    async fn account_id(&self) -> Result<String, CountError> {
        let response = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(CountError::aws)?;

        Ok(response.account().unwrap_or("unknown").to_string())
    }

    async fn list_users(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        let mut request = self.iam.list_users();
        if let Some(token) = token {
            request = request.marker(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let names = response
            .users()
            .iter()
            .map(|u| u.user_name().to_string())
            .collect();
        // IAM sets the marker only when the listing is truncated.
        Ok(Page::new(names, response.marker().map(String::from)))
    }
}

struct EksClusters {
    client: aws_sdk_eks::Client,
}

#[async_trait]
impl ClusterService for EksClusters {
    async fn list_clusters(&self, token: Option<String>) -> Result<Page<String>, CountError> {
        let mut request = self.client.list_clusters();
        if let Some(token) = token {
            request = request.next_token(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let names = response.clusters().to_vec();
        Ok(Page::new(names, response.next_token().map(String::from)))
    }

    async fn describe_cluster(&self, name: &str) -> Result<ClusterDetail, CountError> {
        debug!("Describing cluster: {}", name);

        let response = self
            .client
            .describe_cluster()
            .name(name)
            .send()
            .await
            .map_err(CountError::aws)?;

        let cluster = response
            .cluster()
            .ok_or_else(|| CountError::AwsSdk(format!("cluster {name} not found")))?;

        Ok(ClusterDetail {
            name: cluster.name().unwrap_or(name).to_string(),
            endpoint: cluster.endpoint().map(String::from),
            certificate_authority: cluster
                .certificate_authority()
                .and_then(|ca| ca.data())
                .map(String::from),
        })
    }

    async fn list_node_groups(
        &self,
        cluster: &str,
        token: Option<String>,
    ) -> Result<Page<String>, CountError> {
        let mut request = self.client.list_nodegroups().cluster_name(cluster);
        if let Some(token) = token {
            request = request.next_token(token);
        }
        let response = request.send().await.map_err(CountError::aws)?;

        let names = response.nodegroups().to_vec();
        Ok(Page::new(names, response.next_token().map(String::from)))
    }

    async fn describe_node_group(
        &self,
        cluster: &str,
        group: &str,
    ) -> Result<NodeGroupDetail, CountError> {
        debug!("Describing node group {} in cluster {}", group, cluster);

        let response = self
            .client
            .describe_nodegroup()
            .cluster_name(cluster)
            .nodegroup_name(group)
            .send()
            .await
            .map_err(CountError::aws)?;

        let desired = response
            .nodegroup()
            .and_then(|ng| ng.scaling_config())
            .and_then(|sc| sc.desired_size())
            .unwrap_or(0);

        Ok(NodeGroupDetail {
            desired_size: u64::try_from(desired).unwrap_or(0),
        })
    }
}
