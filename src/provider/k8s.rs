//! Live node listing against a cluster's own control plane.
//!
//! Builds a Kubernetes client from the cluster's API endpoint with the same
//! exec-based authentication `aws eks update-kubeconfig` writes: the token
//! comes from `aws eks get-token` at connection time.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client};
use tracing::debug;

use crate::error::CountError;
use crate::provider::{ClusterDetail, NodeLister};

/// Nodes are fetched in batches of this size.
const NODE_PAGE_LIMIT: u32 = 500;

/// Node API handle scoped to a single cluster.
pub struct ClusterNodeLister {
    nodes: Api<Node>,
}

impl ClusterNodeLister {
    /// Connect to the cluster named in `detail`, in `region`.
    pub async fn connect(detail: &ClusterDetail, region: &str) -> Result<Self, CountError> {
        let endpoint = detail
            .endpoint
            .as_deref()
            .ok_or_else(|| CountError::ClusterUnreachable {
                cluster: detail.name.clone(),
                reason: "no API endpoint".to_string(),
            })?;

        debug!("Connecting to cluster {} at {}", detail.name, endpoint);

        let kubeconfig = eks_kubeconfig(
            &detail.name,
            endpoint,
            detail.certificate_authority.as_deref(),
            region,
        )?;

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(CountError::kube)?;
        let client = Client::try_from(config).map_err(CountError::kube)?;

        Ok(Self {
            nodes: Api::all(client),
        })
    }
}

#[async_trait]
impl NodeLister for ClusterNodeLister {
    async fn count_nodes(&self) -> Result<u64, CountError> {
        let mut total = 0u64;
        let mut params = ListParams::default().limit(NODE_PAGE_LIMIT);

        loop {
            let list = self.nodes.list(&params).await.map_err(CountError::kube)?;
            total += list.items.len() as u64;

            match list.metadata.continue_ {
                Some(token) if !token.is_empty() => params = params.continue_token(&token),
                _ => break,
            }
        }

        Ok(total)
    }
}

/// In-memory kubeconfig for one EKS cluster with `aws eks get-token` exec auth.
fn eks_kubeconfig(
    name: &str,
    endpoint: &str,
    certificate_authority: Option<&str>,
    region: &str,
) -> Result<Kubeconfig, CountError> {
    let mut cluster = serde_json::json!({ "server": endpoint });
    if let Some(ca) = certificate_authority {
        cluster["certificate-authority-data"] = ca.into();
    }

    let mut args = vec![
        "eks".to_string(),
        "get-token".to_string(),
        "--cluster-name".to_string(),
        name.to_string(),
    ];
    if !region.is_empty() {
        args.push("--region".to_string());
        args.push(region.to_string());
    }

    let doc = serde_json::json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{ "name": name, "cluster": cluster }],
        "users": [{
            "name": name,
            "user": {
                "exec": {
                    "apiVersion": "client.authentication.k8s.io/v1beta1",
                    "command": "aws",
                    "args": args,
                    "interactiveMode": "Never",
                },
            },
        }],
        "contexts": [{
            "name": name,
            "context": { "cluster": name, "user": name },
        }],
        "current-context": name,
    });

    serde_json::from_value(doc).map_err(CountError::kube)
}
