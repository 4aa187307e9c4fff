// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys read by the helpers
pub mod annotations {
    /// Current rollout revision, maintained by the deployment controller
    pub const REVISION: &str = "deployment.kubernetes.io/revision";
}

/// Kubernetes label keys written by the helpers
pub mod labels {
    /// Selector label Rancher puts on workloads it manages
    pub const WORKLOAD_SELECTOR: &str = "workload.user.cattle.io/workloadselector";
}

/// Steve resource type names
pub mod steve {
    pub const DEPLOYMENT: &str = "apps.deployment";
}

/// Defaults for generated workloads
pub mod workload {
    pub const IMAGE_NAME: &str = "nginx";
    pub const PULL_ALWAYS: &str = "Always";
    pub const DEPLOYMENT_PREFIX: &str = "testdeployment";
    pub const CONTAINER_PREFIX: &str = "testcontainer";

    pub const SECRET_VOLUME_NAME: &str = "secret-volume";
    pub const SECRET_MOUNT_PATH: &str = "/etc/secret-volume";
    pub const CONFIGMAP_VOLUME_NAME: &str = "configmap-volume";
    pub const CONFIGMAP_MOUNT_PATH: &str = "/etc/configmap-volume";
}

/// `kubectl rollout history` output layout
pub mod history {
    pub const HEADER: &str = "REVISION  CHANGE-CAUSE";
    /// Lines preceding the first revision row (resource line and header)
    pub const HEADER_LENGTH: usize = 2;
    pub const HEADER_INDEX: usize = 1;
    pub const NO_CHANGE_CAUSE: &str = "<none>";
}

/// Cluster ID of the Rancher management cluster itself
pub const LOCAL_CLUSTER_ID: &str = "local";
