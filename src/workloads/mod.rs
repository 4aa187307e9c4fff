// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Workload helpers for integration tests against downstream clusters.

pub mod deployment;
pub mod templates;

pub use deployment::{
    create_deployment, delete_deployment, rollback_deployment, rollout_history,
    update_deployment, update_deployment_container, validate_rollout_history_deployment,
    RolloutRevision,
};
pub use templates::PodConfig;
