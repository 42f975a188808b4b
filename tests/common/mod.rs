//! Shared fixtures: an in-memory object store and Knative object builders

#![allow(dead_code)]

use async_trait::async_trait;
use kntopo::kube::{LookupFailure, ObjectClient, Selector};
use kntopo::links::OverviewPathResolver;
use kntopo::{RenderContext, ResourceReference};
use kube::core::DynamicObject;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Object store backed by a list of JSON objects
#[derive(Default)]
pub struct FakeCluster {
    objects: Vec<Value>,
    /// `get` requests seen, as `Kind/name`
    pub gets: Mutex<Vec<String>>,
}

impl FakeCluster {
    pub fn new(objects: Vec<Value>) -> Self {
        Self {
            objects,
            gets: Mutex::new(Vec::new()),
        }
    }

    pub fn get_count(&self) -> usize {
        self.gets.lock().unwrap().len()
    }

    fn matches(obj: &Value, reference: &ResourceReference) -> bool {
        let api_version = obj["apiVersion"].as_str() == Some(reference.api_version.as_str());
        let kind = obj["kind"].as_str() == Some(reference.kind.as_str());
        let namespace = match &reference.namespace {
            Some(ns) => obj["metadata"]["namespace"].as_str() == Some(ns.as_str()),
            None => true,
        };
        api_version && kind && namespace
    }
}

fn to_dynamic(obj: &Value) -> DynamicObject {
    serde_json::from_value(obj.clone()).unwrap()
}

#[async_trait]
impl ObjectClient for FakeCluster {
    async fn get(&self, reference: &ResourceReference) -> Result<DynamicObject, LookupFailure> {
        let name = reference
            .name
            .clone()
            .ok_or_else(|| LookupFailure::Unnamed(reference.to_string()))?;
        self.gets
            .lock()
            .unwrap()
            .push(format!("{}/{}", reference.kind, name));
        self.objects
            .iter()
            .find(|obj| {
                Self::matches(obj, reference) && obj["metadata"]["name"].as_str() == Some(&name)
            })
            .map(to_dynamic)
            .ok_or_else(|| LookupFailure::NotFound(reference.to_string()))
    }

    async fn list(
        &self,
        reference: &ResourceReference,
        selector: &Selector,
    ) -> Result<Vec<DynamicObject>, LookupFailure> {
        Ok(self
            .objects
            .iter()
            .filter(|obj| Self::matches(obj, reference))
            .filter(|obj| {
                let labels: BTreeMap<String, String> =
                    serde_json::from_value(obj["metadata"]["labels"].clone()).unwrap_or_default();
                selector.matches(&labels)
            })
            .map(to_dynamic)
            .collect())
    }
}

pub fn render_context(cluster: Arc<FakeCluster>) -> RenderContext {
    RenderContext::new("default", cluster, Arc::new(OverviewPathResolver::default()))
}

pub const SERVING: &str = "serving.knative.dev/v1";

/// A condition list entry
pub fn condition(type_: &str, status: &str) -> Value {
    json!({ "type": type_, "status": status })
}

/// A namespaced object in `default`
pub fn object(
    api_version: &str,
    kind: &str,
    name: &str,
    labels: Value,
    owners: Value,
    status: Value,
) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": {
            "name": name,
            "namespace": "default",
            "uid": uid(kind, name),
            "labels": labels,
            "ownerReferences": owners,
            "creationTimestamp": "2024-05-01T10:00:00Z"
        },
        "status": status
    })
}

pub fn uid(kind: &str, name: &str) -> String {
    format!("{}-{}", kind.to_lowercase(), name)
}

pub fn owner(api_version: &str, kind: &str, name: &str) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "name": name,
        "uid": uid(kind, name),
        "controller": true
    })
}

/// `hello` Service with its Configuration, Route, two Revisions and a
/// Deployment for the newest Revision
pub fn hello_service() -> Vec<Value> {
    let ready = json!({ "conditions": [condition("Ready", "True")] });
    vec![
        object(
            SERVING,
            "Service",
            "hello",
            json!({}),
            json!([]),
            json!({ "conditions": [condition("Ready", "True")] }),
        ),
        object(
            SERVING,
            "Configuration",
            "hello",
            json!({ "serving.knative.dev/service": "hello" }),
            json!([owner(SERVING, "Service", "hello")]),
            json!({
                "conditions": [condition("Ready", "True")],
                "latestCreatedRevisionName": "hello-00002",
                "latestReadyRevisionName": "hello-00002"
            }),
        ),
        object(
            SERVING,
            "Route",
            "hello",
            json!({ "serving.knative.dev/service": "hello" }),
            json!([owner(SERVING, "Service", "hello")]),
            ready.clone(),
        ),
        object(
            SERVING,
            "Revision",
            "hello-00001",
            json!({
                "serving.knative.dev/service": "hello",
                "serving.knative.dev/configuration": "hello"
            }),
            json!([owner(SERVING, "Configuration", "hello")]),
            json!({ "conditions": [
                { "type": "Ready", "status": "False", "reason": "ExitCode1" }
            ] }),
        ),
        object(
            SERVING,
            "Revision",
            "hello-00002",
            json!({
                "serving.knative.dev/service": "hello",
                "serving.knative.dev/configuration": "hello"
            }),
            json!([owner(SERVING, "Configuration", "hello")]),
            ready,
        ),
        object(
            "apps/v1",
            "Deployment",
            "hello-00002-deployment",
            json!({
                "serving.knative.dev/service": "hello",
                "serving.knative.dev/revision": "hello-00002"
            }),
            json!([owner(SERVING, "Revision", "hello-00002")]),
            json!({}),
        ),
    ]
}
