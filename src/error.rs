// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("Cluster not ready: {0}")]
    ClusterNotReady(String),

    #[error("Unknown steve type: {0}")]
    SteveTypeNotFound(String),

    #[error("Invalid steve id: {0}")]
    InvalidSteveId(String),

    #[error("Invalid deployment: {0}")]
    InvalidDeployment(String),

    #[error("Replica count {0} is out of range")]
    InvalidReplicaCount(u32),

    #[error("Failed to run {command}: {source}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command {command} exited with {status}: {output}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        output: String,
    },

    #[error("Unexpected rollout history output: {0}")]
    RolloutHistory(String),

    #[error("revision empty")]
    RevisionEmpty,

    #[error("revision not found")]
    RevisionNotFound,
}

pub type Result<T> = std::result::Result<T, WorkloadError>;
