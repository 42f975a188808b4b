//! Object store client
//!
//! The topology engine never talks to the API server directly. Traversal
//! code goes through [`ObjectClient`], whose results are plain `Result`s so
//! each caller decides whether a failed lookup is fatal.

use crate::models::ResourceReference;
use async_trait::async_trait;
use kube::Api;
use kube::api::ListParams;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind, SelectorExt};
use std::collections::BTreeMap;
use std::fmt;

/// A failed object lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupFailure {
    #[error("{0} not found")]
    NotFound(String),

    #[error("request for {reference} failed: {message}")]
    Api { reference: String, message: String },

    #[error("reference {0} has no name")]
    Unnamed(String),
}

impl LookupFailure {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupFailure::NotFound(_))
    }
}

/// Equality-based label selector
///
/// Converted to [`kube::core::Selector`] for requests and matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector(BTreeMap<String, String>);

impl Selector {
    /// Selector matching every object
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn label(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::everything().and(key, value)
    }

    pub fn and(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_everything(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.to_kube().matches(labels)
    }

    pub fn to_kube(&self) -> kube::core::Selector {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_kube(), f)
    }
}

/// Get and list capability supplied by the host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Fetch a single named object
    async fn get(&self, reference: &ResourceReference) -> Result<DynamicObject, LookupFailure>;

    /// List objects of the referenced type, in its namespace if set
    async fn list(
        &self,
        reference: &ResourceReference,
        selector: &Selector,
    ) -> Result<Vec<DynamicObject>, LookupFailure>;
}

/// Object client backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeObjectClient {
    client: kube::Client,
}

impl KubeObjectClient {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn api(&self, reference: &ResourceReference) -> Api<DynamicObject> {
        let api_resource = api_resource_for(reference);
        match &reference.namespace {
            Some(namespace) => Api::namespaced_with(self.client.clone(), namespace, &api_resource),
            None => Api::all_with(self.client.clone(), &api_resource),
        }
    }
}

/// Build an `ApiResource` for a reference using the naive plural
pub fn api_resource_for(reference: &ResourceReference) -> ApiResource {
    let gvk = GroupVersionKind::gvk(
        reference.group().unwrap_or_default(),
        reference.version(),
        &reference.kind,
    );
    ApiResource::from_gvk_with_plural(&gvk, &reference.plural())
}

fn map_kube_error(reference: &ResourceReference, err: kube::Error) -> LookupFailure {
    let message = err.to_string();
    if matches!(err, kube::Error::Api(_)) && is_not_found_message(&message) {
        return LookupFailure::NotFound(reference.to_string());
    }
    LookupFailure::Api {
        reference: reference.to_string(),
        message,
    }
}

fn is_not_found_message(message: &str) -> bool {
    message.contains("404") || message.contains("NotFound") || message.contains("not found")
}

#[async_trait]
impl ObjectClient for KubeObjectClient {
    async fn get(&self, reference: &ResourceReference) -> Result<DynamicObject, LookupFailure> {
        let name = reference
            .name
            .as_deref()
            .ok_or_else(|| LookupFailure::Unnamed(reference.to_string()))?;
        tracing::debug!("Fetching {}", reference);
        self.api(reference)
            .get(name)
            .await
            .map_err(|e| map_kube_error(reference, e))
    }

    async fn list(
        &self,
        reference: &ResourceReference,
        selector: &Selector,
    ) -> Result<Vec<DynamicObject>, LookupFailure> {
        let mut params = ListParams::default();
        if !selector.is_everything() {
            params = params.labels_from(&selector.to_kube());
        }
        tracing::debug!("Listing {} with selector '{}'", reference, selector);
        self.api(reference)
            .list(&params)
            .await
            .map(|list| list.items)
            .map_err(|e| map_kube_error(reference, e))
    }
}
