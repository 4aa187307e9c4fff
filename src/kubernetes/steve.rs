// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Steve-style resource access: resources addressed by a type name such as
//! `apps.deployment` and an ID of the form `namespace/name`.

use crate::error::{Result, WorkloadError};
use kube::{
    api::{DeleteParams, DynamicObject},
    discovery::{ApiCapabilities, ApiResource, Discovery, Scope},
    Api, Client, ResourceExt,
};
use tracing::{debug, info, instrument};

/// Generic resource client for one cluster
#[derive(Clone)]
pub struct SteveClient {
    client: Client,
}

/// A resolved Steve type, bound to the cluster it was resolved on
#[derive(Clone)]
pub struct SteveType {
    type_name: String,
    client: Client,
    resource: ApiResource,
    capabilities: ApiCapabilities,
}

impl SteveClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Resolve a Steve type name through API discovery of its group.
    #[instrument(skip(self))]
    pub async fn steve_type(&self, type_name: &str) -> Result<SteveType> {
        let (group, kind) = split_type_name(type_name);

        let discovery = Discovery::new(self.client.clone())
            .filter(&[group])
            .run()
            .await?;

        for api_group in discovery.groups() {
            if api_group.name() != group {
                continue;
            }
            for (ar, caps) in api_group.recommended_resources() {
                if ar.kind.to_lowercase() == kind {
                    debug!("Resolved steve type {} to {}/{}", type_name, ar.api_version, ar.kind);
                    return Ok(SteveType {
                        type_name: type_name.to_string(),
                        client: self.client.clone(),
                        resource: ar,
                        capabilities: caps,
                    });
                }
            }
        }

        Err(WorkloadError::SteveTypeNotFound(type_name.to_string()))
    }
}

impl SteveType {
    pub fn resource(&self) -> &ApiResource {
        &self.resource
    }

    /// Fetch an object by `namespace/name` (namespaced types) or `name` (cluster-scoped types)
    #[instrument(skip(self), fields(steve_type = %self.type_name))]
    pub async fn by_id(&self, id: &str) -> Result<DynamicObject> {
        let (api, name) = self.api_for(id)?;
        debug!("Looking up {}", id);
        Ok(api.get(name).await?)
    }

    /// Delete an object previously returned by [`SteveType::by_id`]
    #[instrument(skip(self, object), fields(steve_type = %self.type_name, name = %object.name_any()))]
    pub async fn delete(&self, object: &DynamicObject) -> Result<()> {
        let id = match object.namespace() {
            Some(namespace) => format!("{}/{}", namespace, object.name_any()),
            None => object.name_any(),
        };
        let (api, name) = self.api_for(&id)?;
        api.delete(name, &DeleteParams::default()).await?;
        info!("Deleted {} {}", self.type_name, id);
        Ok(())
    }

    fn api_for<'a>(&self, id: &'a str) -> Result<(Api<DynamicObject>, &'a str)> {
        match (&self.capabilities.scope, id.split_once('/')) {
            (Scope::Namespaced, Some((namespace, name)))
                if !namespace.is_empty() && !name.is_empty() =>
            {
                Ok((
                    Api::namespaced_with(self.client.clone(), namespace, &self.resource),
                    name,
                ))
            }
            (Scope::Cluster, None) if !id.is_empty() => {
                Ok((Api::all_with(self.client.clone(), &self.resource), id))
            }
            _ => Err(WorkloadError::InvalidSteveId(format!(
                "'{}' does not address a {}",
                id, self.type_name
            ))),
        }
    }
}

/// Split `apps.deployment` into (`apps`, `deployment`); bare names belong to the core group
fn split_type_name(type_name: &str) -> (&str, &str) {
    type_name.rsplit_once('.').unwrap_or(("", type_name))
}
