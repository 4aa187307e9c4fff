// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment lifecycle helpers: create, update, rollback, revision checks and delete.
//!
//! Every mutation fetches the live object first so the submitted update carries the
//! current resource version. Nothing here retries; API errors reach the caller as-is.

use crate::constants::{annotations, history, labels, steve, workload};
use crate::error::{Result, WorkloadError};
use crate::kubernetes::{kubectl, RancherClient};
use crate::namegen::append_random_string;
use crate::workloads::templates::{
    new_container, new_pod_template, new_pod_template_with_config, PodConfig,
};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::{ObjectMeta, PostParams};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// One row of `kubectl rollout history`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutRevision {
    pub revision: u64,
    pub change_cause: Option<String>,
}

/// Build a deployment carrying Rancher's workload selector label on itself, its selector and its pods
pub fn new_deployment(
    name: &str,
    namespace: &str,
    mut template: PodTemplateSpec,
    replicas: i32,
) -> Deployment {
    let selector = BTreeMap::from([(
        labels::WORKLOAD_SELECTOR.to_string(),
        format!("apps.deployment-{}-{}", namespace, name),
    )]);

    template
        .metadata
        .get_or_insert_with(ObjectMeta::default)
        .labels
        .get_or_insert_with(BTreeMap::new)
        .extend(selector.clone());

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(selector.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            selector: LabelSelector {
                match_expressions: None,
                match_labels: Some(selector),
            },
            template,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Create a deployment with a random name, either a plain nginx pod or one wired to a secret/config map
#[instrument(skip(client, pod_config))]
pub async fn create_deployment(
    client: &RancherClient,
    cluster_id: &str,
    namespace: &str,
    replica_count: u32,
    pod_config: &PodConfig,
) -> Result<Deployment> {
    let replicas = i32::try_from(replica_count)
        .map_err(|_| WorkloadError::InvalidReplicaCount(replica_count))?;
    let deployment_name = append_random_string(workload::DEPLOYMENT_PREFIX);
    let container_name = append_random_string(workload::CONTAINER_PREFIX);

    let pod_template = if pod_config.has_config() {
        new_pod_template_with_config(pod_config)
    } else {
        let container = new_container(
            &container_name,
            workload::IMAGE_NAME,
            workload::PULL_ALWAYS,
            Vec::new(),
            Vec::new(),
        );
        new_pod_template(vec![container], Vec::new(), Vec::new(), None, None)
    };

    let deployment = new_deployment(&deployment_name, namespace, pod_template, replicas);

    let downstream = client.downstream(cluster_id).await?;
    let created = downstream
        .deployments(namespace)
        .create(&PostParams::default(), &deployment)
        .await?;

    info!(
        "Created deployment {}/{} with {} replicas on cluster {}",
        namespace, deployment_name, replicas, cluster_id
    );
    Ok(created)
}

/// Append a container to the live deployment's pod template
#[instrument(skip(client, container), fields(container = %container.name))]
pub async fn update_deployment_container(
    client: &RancherClient,
    cluster_id: &str,
    namespace: &str,
    deployment_name: &str,
    container: Container,
) -> Result<Deployment> {
    let deployments = client.downstream(cluster_id).await?.deployments(namespace);

    let mut latest = deployments.get(deployment_name).await?;
    latest
        .spec
        .get_or_insert_with(DeploymentSpec::default)
        .template
        .spec
        .get_or_insert_with(Default::default)
        .containers
        .push(container);

    let updated = deployments
        .replace(deployment_name, &PostParams::default(), &latest)
        .await?;

    info!("Added container to deployment {}/{}", namespace, deployment_name);
    Ok(updated)
}

/// Submit `deployment` as an update, stamped with the resource version fetched right before.
///
/// The caller's object keeps the stamped version.
#[instrument(skip(client, deployment), fields(deployment = ?deployment.metadata.name))]
pub async fn update_deployment(
    client: &RancherClient,
    cluster_id: &str,
    namespace: &str,
    deployment: &mut Deployment,
) -> Result<Deployment> {
    let name = deployment
        .metadata
        .name
        .clone()
        .ok_or_else(|| WorkloadError::InvalidDeployment("deployment has no name".to_string()))?;

    let deployments = client.downstream(cluster_id).await?.deployments(namespace);

    let latest = deployments.get(&name).await?;
    debug!(
        "Stamping resource version {:?} onto {}/{}",
        latest.metadata.resource_version, namespace, name
    );
    deployment.metadata.resource_version = latest.metadata.resource_version;

    let updated = deployments
        .replace(&name, &PostParams::default(), &*deployment)
        .await?;

    info!("Updated deployment {}/{}", namespace, name);
    Ok(updated)
}

/// `kubectl rollout undo` to `revision`; returns the command output untouched
#[instrument(skip(client))]
pub async fn rollback_deployment(
    client: &RancherClient,
    cluster_id: &str,
    namespace: &str,
    deployment_name: &str,
    revision: u32,
) -> Result<String> {
    let args = vec![
        "rollout".to_string(),
        "undo".to_string(),
        "-n".to_string(),
        namespace.to_string(),
        format!("deployment.apps/{}", deployment_name),
        format!("--to-revision={}", revision),
    ];
    kubectl::command(client, cluster_id, &args).await
}

/// Check the deployment's revision annotation against `expected_revision`
#[instrument(skip(client))]
pub async fn validate_rollout_history_deployment(
    client: &RancherClient,
    cluster_id: &str,
    namespace: &str,
    deployment_name: &str,
    expected_revision: &str,
) -> Result<()> {
    let latest = client
        .downstream(cluster_id)
        .await?
        .deployments(namespace)
        .get(deployment_name)
        .await?;

    let Some(deployment_annotations) = latest.metadata.annotations.as_ref() else {
        return Err(WorkloadError::RevisionEmpty);
    };

    match deployment_annotations.get(annotations::REVISION) {
        Some(revision) if revision == expected_revision => Ok(()),
        revision => {
            debug!(
                "Deployment {}/{} is at revision {:?}, expected {}",
                namespace, deployment_name, revision, expected_revision
            );
            Err(WorkloadError::RevisionNotFound)
        }
    }
}

/// Delete a deployment through the Steve-style client, after resolving it by `namespace/name`
#[instrument(skip(client, deployment), fields(deployment = ?deployment.metadata.name))]
pub async fn delete_deployment(
    client: &RancherClient,
    cluster_id: &str,
    deployment: &Deployment,
) -> Result<()> {
    let name = deployment
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| WorkloadError::InvalidDeployment("deployment has no name".to_string()))?;
    let namespace = deployment
        .metadata
        .namespace
        .as_deref()
        .unwrap_or(client.config().default_namespace.as_str());

    let steve_client = client.steve(cluster_id).await?;
    let deployment_type = steve_client.steve_type(steve::DEPLOYMENT).await?;

    let deployment_id = format!("{}/{}", namespace, name);
    let object = deployment_type.by_id(&deployment_id).await?;
    deployment_type.delete(&object).await
}

/// List the rollout revisions kubectl knows for a deployment
#[instrument(skip(client))]
pub async fn rollout_history(
    client: &RancherClient,
    cluster_id: &str,
    namespace: &str,
    deployment_name: &str,
) -> Result<Vec<RolloutRevision>> {
    let args = vec![
        "rollout".to_string(),
        "history".to_string(),
        "-n".to_string(),
        namespace.to_string(),
        format!("deployment.apps/{}", deployment_name),
    ];
    let output = kubectl::command(client, cluster_id, &args).await?;
    parse_rollout_history(&output)
}

/// Parse `kubectl rollout history` output:
///
/// ```text
/// deployment.apps/web
/// REVISION  CHANGE-CAUSE
/// 1         <none>
/// 2         kubectl set image deployment/web nginx=nginx:1.27
/// ```
pub fn parse_rollout_history(output: &str) -> Result<Vec<RolloutRevision>> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let header = lines.get(history::HEADER_INDEX).map(|line| collapse_whitespace(line));
    if header != Some(collapse_whitespace(history::HEADER)) {
        return Err(WorkloadError::RolloutHistory(format!(
            "missing '{}' header in: {}",
            history::HEADER,
            output.trim()
        )));
    }

    lines[history::HEADER_LENGTH..]
        .iter()
        .map(|line| parse_revision_row(line))
        .collect()
}

fn parse_revision_row(line: &str) -> Result<RolloutRevision> {
    let mut fields = line.split_whitespace();
    let revision = fields
        .next()
        .and_then(|field| field.parse::<u64>().ok())
        .ok_or_else(|| WorkloadError::RolloutHistory(format!("invalid revision row: {}", line)))?;

    let cause = fields.collect::<Vec<_>>().join(" ");
    let change_cause = match cause.as_str() {
        "" | history::NO_CHANGE_CAUSE => None,
        _ => Some(cause),
    };

    Ok(RolloutRevision {
        revision,
        change_cause,
    })
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}
