// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rancher client and downstream cluster resolution

use crate::config::Config;
use crate::constants::LOCAL_CLUSTER_ID;
use crate::error::{Result, WorkloadError};
use crate::kubernetes::steve::SteveClient;
use crate::types::cluster::Cluster;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::ListParams, config::KubeConfigOptions, Api, Client, Config as KConfig, ResourceExt,
};
use tracing::{debug, info, instrument};

/// Handle on the Rancher management cluster, able to reach its downstream clusters
#[derive(Clone)]
pub struct RancherClient {
    client: Client,
    config: Config,
}

/// A resolved downstream cluster: a typed client plus what kubectl needs to reach the same cluster
#[derive(Clone)]
pub struct DownstreamCluster {
    cluster_id: String,
    client: Client,
    kubeconfig: Option<String>,
    server_override: Option<String>,
}

impl DownstreamCluster {
    pub(crate) fn new(
        cluster_id: &str,
        client: Client,
        kubeconfig: Option<String>,
        server_override: Option<String>,
    ) -> Self {
        Self {
            cluster_id: cluster_id.to_string(),
            client,
            kubeconfig,
            server_override,
        }
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Kubeconfig read from the cluster's secret; `None` when the ambient kubeconfig applies
    pub fn kubeconfig(&self) -> Option<&str> {
        self.kubeconfig.as_deref()
    }

    /// Server URL replacing the ambient one (testing mode only)
    pub fn server_override(&self) -> Option<&str> {
        self.server_override.as_deref()
    }

    pub fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl RancherClient {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a cluster ID (`local`, `c-m-xxxx` or the provisioning cluster name) to a client
    #[instrument(skip(self))]
    pub async fn downstream(&self, cluster_id: &str) -> Result<DownstreamCluster> {
        if cluster_id == LOCAL_CLUSTER_ID {
            debug!("Using management cluster client for local cluster");
            return Ok(DownstreamCluster::new(
                cluster_id,
                self.client.clone(),
                None,
                None,
            ));
        }

        if self.config.testing_mode {
            let (client, server) = create_testing_client(cluster_id).await?;
            return Ok(DownstreamCluster::new(cluster_id, client, None, server));
        }

        let cluster = self.find_cluster(cluster_id).await?;
        let kubeconfig =
            get_cluster_kubeconfig(&self.client, &cluster, &self.config.fleet_namespace).await?;
        let client = create_client_from_kubeconfig(&kubeconfig).await?;

        Ok(DownstreamCluster::new(
            cluster_id,
            client,
            Some(kubeconfig),
            None,
        ))
    }

    /// Steve-style generic resource client for a cluster
    pub async fn steve(&self, cluster_id: &str) -> Result<SteveClient> {
        let downstream = self.downstream(cluster_id).await?;
        Ok(SteveClient::new(downstream.client().clone()))
    }

    /// Find the provisioning cluster backing a cluster ID; it must be ready
    async fn find_cluster(&self, cluster_id: &str) -> Result<Cluster> {
        let clusters: Api<Cluster> =
            Api::namespaced(self.client.clone(), &self.config.fleet_namespace);
        let cluster = clusters
            .list(&ListParams::default())
            .await?
            .items
            .into_iter()
            .find(|c| c.matches_id(cluster_id))
            .ok_or_else(|| {
                WorkloadError::ClusterNotFound(format!(
                    "{} (searched namespace {})",
                    cluster_id, self.config.fleet_namespace
                ))
            })?;

        if !cluster.is_ready() {
            return Err(WorkloadError::ClusterNotReady(cluster_id.to_string()));
        }

        debug!("Resolved cluster {} to {}", cluster_id, cluster.name_any());
        Ok(cluster)
    }
}

/// Create a client for testing mode (ambient kubeconfig with the cluster URL pointed at `cluster_id`)
async fn create_testing_client(cluster_id: &str) -> Result<(Client, Option<String>)> {
    let mut c = KConfig::infer()
        .await
        .map_err(|e| WorkloadError::KubeconfigError(format!("Failed to infer config: {}", e)))?;

    let mut server = None;
    let current_url = c.cluster_url.to_string();
    if current_url.trim_end_matches('/').rsplit('/').next() == Some(LOCAL_CLUSTER_ID) {
        let new_cluster_url = rewrite_local_url(&current_url, cluster_id);
        debug!(
            "Testing mode: modifying cluster URL from {} to {}",
            current_url, new_cluster_url
        );
        c.cluster_url = new_cluster_url
            .parse()
            .map_err(|e| WorkloadError::KubeconfigError(format!("Invalid URL: {}", e)))?;
        server = Some(new_cluster_url);
    }

    let client = Client::try_from(c)
        .map_err(|e| WorkloadError::KubeconfigError(format!("Failed to create client: {}", e)))?;
    Ok((client, server))
}

/// Replace the trailing `local` path segment of a Rancher proxy URL
fn rewrite_local_url(url: &str, cluster_id: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    match trimmed.strip_suffix("/local") {
        Some(base) => format!("{}/{}", base, cluster_id),
        None => url.to_string(),
    }
}

/// Get kubeconfig secret for a Rancher downstream cluster, next to the cluster object
#[instrument(skip(client, cluster), fields(cluster = %cluster.name_any()))]
async fn get_cluster_kubeconfig(
    client: &Client,
    cluster: &Cluster,
    fleet_namespace: &str,
) -> Result<String> {
    let cluster_name = cluster.name_any();
    let secret_name = cluster.kubeconfig_secret_name();
    let namespace = cluster
        .namespace()
        .unwrap_or_else(|| fleet_namespace.to_string());
    let secrets: Api<Secret> = Api::namespaced(client.clone(), &namespace);

    info!(
        "Getting kubeconfig secret '{}/{}' for cluster '{}'...",
        namespace, secret_name, cluster_name
    );

    let secret = secrets.get(&secret_name).await.map_err(|e| {
        WorkloadError::KubeconfigError(format!(
            "Failed to get kubeconfig secret for cluster {}: {}",
            cluster_name, e
        ))
    })?;

    let Some(kubeconfig_data) = secret.data.as_ref().and_then(|d| d.get("value")) else {
        return Err(WorkloadError::KubeconfigError(format!(
            "Kubeconfig secret for cluster {} does not contain 'value' key",
            cluster_name
        )));
    };

    String::from_utf8(kubeconfig_data.0.clone()).map_err(|e| {
        WorkloadError::KubeconfigError(format!(
            "Failed to decode kubeconfig for cluster {}: {}",
            cluster_name, e
        ))
    })
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    use kube::config::Kubeconfig;

    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig).map_err(|e| {
        WorkloadError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e))
    })?;

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| {
                WorkloadError::KubeconfigError(format!("Failed to create config: {}", e))
            })?;

    Client::try_from(client_config)
        .map_err(|e| WorkloadError::KubeconfigError(format!("Failed to create client: {}", e)))
}
