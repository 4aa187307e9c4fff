// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access for downstream clusters: typed clients, Steve-style lookups and kubectl.

pub mod client;
pub mod kubectl;
pub mod steve;

pub use client::{DownstreamCluster, RancherClient};
pub use steve::{SteveClient, SteveType};
