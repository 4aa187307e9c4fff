// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::config::Config;
use crate::types::cluster::{Cluster, ClusterSpec, ClusterStatus, Condition};
use http::{Request, Response};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

#[derive(Clone)]
enum Reply {
    Fixed(u16, String),
    /// Answer with the request body, the way the API server returns a created or replaced object
    Echo(u16),
}

/// A request seen by the mock service
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on request paths
/// and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, reply: Reply) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), reply);
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, Reply::Fixed(status, body.to_string()))
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, Reply::Fixed(status, body.to_string()))
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, Reply::Fixed(status, body.to_string()))
    }

    /// Answer POST requests on `path` with the posted object
    pub fn echo_post(self, path: &str) -> Self {
        self.on("POST", path, Reply::Echo(201))
    }

    /// Answer PUT requests on `path` with the submitted object
    pub fn echo_put(self, path: &str) -> Self {
        self.on("PUT", path, Reply::Echo(200))
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<Reply> {
        // Exact match only: discovery lives on /apis, which prefixes every other group path
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let reply = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect_bytes().await?;
            let request_body = String::from_utf8_lossy(&bytes).to_string();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path: path.clone(),
                body: request_body.clone(),
            });

            let (status, body) = match reply {
                Some(Reply::Fixed(status, body)) => (status, body),
                Some(Reply::Echo(status)) => (status, request_body),
                // Default 404 for unmatched requests
                None => (404, not_found_json("resource", &path)),
            };

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Configuration pointing kubectl at `kubectl_path`
pub fn test_config(kubectl_path: &str) -> Config {
    Config {
        fleet_namespace: "fleet-default".to_string(),
        default_namespace: "default".to_string(),
        kubectl_path: kubectl_path.to_string(),
        testing_mode: false,
    }
}

pub const CLUSTERS_PATH: &str = "/apis/provisioning.cattle.io/v1/namespaces/fleet-default/clusters";
pub const SECRET_PATH: &str = "/api/v1/namespaces/fleet-default/secrets/downstream-kubeconfig";

/// Kubeconfig stored in the `downstream` cluster's secret
pub const DOWNSTREAM_KUBECONFIG: &str = r#"apiVersion: v1
kind: Config
clusters:
- name: downstream
  cluster:
    server: https://rancher.example.com/k8s/clusters/c-m-12345
contexts:
- name: downstream
  context:
    cluster: downstream
    user: downstream
current-context: downstream
users:
- name: downstream
  user:
    token: kubeconfig-user-abc:token
"#;

/// Cluster list holding the `downstream` cluster (`c-m-12345`) in fleet-default
pub fn cluster_list_json(ready: &str) -> String {
    cluster_list_json_in(Some("fleet-default"), ready)
}

pub fn cluster_list_json_in(namespace: Option<&str>, ready: &str) -> String {
    let cluster = Cluster {
        metadata: ObjectMeta {
            name: Some("downstream".to_string()),
            namespace: namespace.map(str::to_string),
            ..Default::default()
        },
        spec: ClusterSpec {
            kubernetes_version: Some("v1.30.4+rke2r1".to_string()),
            local: None,
            display_name: None,
        },
        status: Some(ClusterStatus {
            client_secret_name: None,
            cluster_name: "c-m-12345".to_string(),
            ready: None,
            conditions: Some(vec![Condition {
                condition_type: "Ready".to_string(),
                status: ready.to_string(),
                message: None,
            }]),
        }),
    };

    serde_json::json!({
        "apiVersion": "provisioning.cattle.io/v1",
        "kind": "ClusterList",
        "metadata": {"resourceVersion": "100"},
        "items": [serde_json::to_value(&cluster).unwrap()]
    })
    .to_string()
}

/// Kubeconfig secret of the `downstream` cluster, holding the kubeconfig under `key`
pub fn kubeconfig_secret_json(key: &str) -> String {
    kubeconfig_secret_json_in("fleet-default", key)
}

pub fn kubeconfig_secret_json_in(namespace: &str, key: &str) -> String {
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some("downstream-kubeconfig".to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            key.to_string(),
            ByteString(DOWNSTREAM_KUBECONFIG.as_bytes().to_vec()),
        )])),
        ..Default::default()
    };
    serde_json::to_string(&secret).unwrap()
}

/// Create a mock deployment JSON response
pub fn deployment_json(
    name: &str,
    namespace: &str,
    resource_version: &str,
    annotations: Option<BTreeMap<String, String>>,
) -> String {
    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid",
            "resourceVersion": resource_version,
            "annotations": annotations,
        },
        "spec": {
            "replicas": 1,
            "selector": {"matchLabels": {"app": name}},
            "template": {
                "metadata": {"labels": {"app": name}},
                "spec": {
                    "containers": [{"name": "web", "image": "nginx"}]
                }
            }
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 conflict response
pub fn conflict_json(name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("Operation cannot be fulfilled on deployments.apps \"{}\": the object has been modified", name),
        "reason": "Conflict",
        "code": 409
    })
    .to_string()
}

/// Discovery documents advertising apps/v1 deployments, as served on `/apis` and `/apis/apps/v1`
pub fn apps_discovery_json() -> (String, String) {
    let groups = serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": [{
            "name": "apps",
            "versions": [{"groupVersion": "apps/v1", "version": "v1"}],
            "preferredVersion": {"groupVersion": "apps/v1", "version": "v1"}
        }]
    });
    let resources = serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "apps/v1",
        "resources": [
            {
                "name": "deployments",
                "singularName": "deployment",
                "namespaced": true,
                "kind": "Deployment",
                "verbs": ["create", "delete", "deletecollection", "get", "list", "patch", "update", "watch"]
            },
            {
                "name": "deployments/status",
                "singularName": "",
                "namespaced": true,
                "kind": "Deployment",
                "verbs": ["get", "patch", "update"]
            },
            {
                "name": "controllerrevisions",
                "singularName": "controllerrevision",
                "namespaced": true,
                "kind": "ControllerRevision",
                "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
            }
        ]
    });
    (groups.to_string(), resources.to_string())
}

/// A MockService already answering API discovery for the apps group
pub fn mock_with_apps_discovery() -> MockService {
    let (groups, resources) = apps_discovery_json();
    MockService::new()
        .on_get("/apis", 200, &groups)
        .on_get("/apis/apps/v1", 200, &resources)
}
