// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;

/// Helper configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace holding the provisioning Cluster objects on the management cluster
    pub fleet_namespace: String,
    /// Namespace used when a workload does not carry one
    pub default_namespace: String,
    /// kubectl binary used for rollout commands
    pub kubectl_path: String,
    pub testing_mode: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let fleet_namespace =
            env::var("FLEET_NAMESPACE").unwrap_or_else(|_| "fleet-default".to_string());
        let default_namespace =
            env::var("DEFAULT_NAMESPACE").unwrap_or_else(|_| "default".to_string());
        let kubectl_path = env::var("KUBECTL_PATH").unwrap_or_else(|_| "kubectl".to_string());
        // For testing, uses the KUBECONFIG env var to create downstream clients instead of fetching kubeconfig from secrets
        let testing_mode: bool = env::var("TESTING_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .context("TESTING_MODE must be either 'true' or 'false'")?;

        Ok(Config {
            fleet_namespace,
            default_namespace,
            kubectl_path,
            testing_mode,
        })
    }
}
