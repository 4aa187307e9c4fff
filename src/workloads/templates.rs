// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Container and pod template construction for test workloads

use crate::constants::workload;
use crate::namegen::append_random_string;
use k8s_openapi::api::core::v1::{
    ConfigMapEnvSource, ConfigMapVolumeSource, Container, EnvFromSource, LocalObjectReference,
    PodSpec, PodTemplateSpec, SecretEnvSource, SecretVolumeSource, Volume, VolumeMount,
};
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Secret / config map injection for a generated pod template
#[derive(Debug, Clone, Default)]
pub struct PodConfig {
    pub secret_name: Option<String>,
    pub config_map_name: Option<String>,
    /// Expose the secret / config map as environment variables (`envFrom`)
    pub use_env_vars: bool,
    /// Mount the secret / config map as volumes
    pub use_volumes: bool,
}

impl PodConfig {
    pub fn secret_name(&self) -> Option<&str> {
        self.secret_name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn config_map_name(&self) -> Option<&str> {
        self.config_map_name.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether a secret or a config map is named at all
    pub fn has_config(&self) -> bool {
        self.secret_name().is_some() || self.config_map_name().is_some()
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

pub fn new_container(
    name: &str,
    image: &str,
    pull_policy: &str,
    volume_mounts: Vec<VolumeMount>,
    env_from: Vec<EnvFromSource>,
) -> Container {
    Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        image_pull_policy: Some(pull_policy.to_string()),
        volume_mounts: non_empty(volume_mounts),
        env_from: non_empty(env_from),
        ..Default::default()
    }
}

pub fn new_pod_template(
    containers: Vec<Container>,
    volumes: Vec<Volume>,
    image_pull_secrets: Vec<LocalObjectReference>,
    labels: Option<BTreeMap<String, String>>,
    annotations: Option<BTreeMap<String, String>>,
) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels,
            annotations,
            ..Default::default()
        }),
        spec: Some(PodSpec {
            containers,
            volumes: non_empty(volumes),
            image_pull_secrets: non_empty(image_pull_secrets),
            ..Default::default()
        }),
    }
}

/// Single nginx container pod template wired to the secret and/or config map of `config`
pub fn new_pod_template_with_config(config: &PodConfig) -> PodTemplateSpec {
    let container_name = append_random_string(workload::CONTAINER_PREFIX);

    let mut env_from = Vec::new();
    let mut volumes = Vec::new();
    let mut volume_mounts = Vec::new();

    if let Some(secret_name) = config.secret_name() {
        if config.use_env_vars {
            env_from.push(EnvFromSource {
                secret_ref: Some(SecretEnvSource {
                    name: secret_name.to_string(),
                    optional: None,
                }),
                ..Default::default()
            });
        }
        if config.use_volumes {
            volumes.push(Volume {
                name: workload::SECRET_VOLUME_NAME.to_string(),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(secret_name.to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            });
            volume_mounts.push(VolumeMount {
                name: workload::SECRET_VOLUME_NAME.to_string(),
                mount_path: workload::SECRET_MOUNT_PATH.to_string(),
                ..Default::default()
            });
        }
    }

    if let Some(config_map_name) = config.config_map_name() {
        if config.use_env_vars {
            env_from.push(EnvFromSource {
                config_map_ref: Some(ConfigMapEnvSource {
                    name: config_map_name.to_string(),
                    optional: None,
                }),
                ..Default::default()
            });
        }
        if config.use_volumes {
            volumes.push(Volume {
                name: workload::CONFIGMAP_VOLUME_NAME.to_string(),
                config_map: Some(ConfigMapVolumeSource {
                    name: config_map_name.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            });
            volume_mounts.push(VolumeMount {
                name: workload::CONFIGMAP_VOLUME_NAME.to_string(),
                mount_path: workload::CONFIGMAP_MOUNT_PATH.to_string(),
                ..Default::default()
            });
        }
    }

    let container = new_container(
        &container_name,
        workload::IMAGE_NAME,
        workload::PULL_ALWAYS,
        volume_mounts,
        env_from,
    );

    new_pod_template(vec![container], volumes, Vec::new(), None, None)
}
