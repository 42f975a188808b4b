//! Context-aware link resolution
//!
//! Knative Serving resources live in a hierarchical, tab-scoped path space
//! (`/knative/configurations/hello/revisions/hello-00001`). Everything else
//! is addressed by a generic resolver supplied by the host.

use crate::models::{ResourceReference, naive_plural};
use std::sync::Arc;

/// Reference passed to the resolver without an `apiVersion`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed reference: {kind}/{name} has no apiVersion")]
pub struct MalformedReference {
    pub kind: String,
    pub name: String,
}

impl MalformedReference {
    fn from_reference(reference: &ResourceReference) -> Self {
        Self {
            kind: reference.kind.clone(),
            name: reference.name.clone().unwrap_or_default(),
        }
    }
}

/// Generic reference-to-path resolution supplied by the host
pub trait PathResolver: Send + Sync {
    fn path_for(&self, reference: &ResourceReference) -> String;
}

impl<F> PathResolver for F
where
    F: Fn(&ResourceReference) -> String + Send + Sync,
{
    fn path_for(&self, reference: &ResourceReference) -> String {
        self(reference)
    }
}

/// Default generic resolver producing overview-style paths
///
/// `/overview/namespace/<ns>/<group>/<plural>/<name>`, with the group
/// segment omitted for core resources and the namespace segments omitted
/// for cluster-scoped references.
#[derive(Debug, Clone)]
pub struct OverviewPathResolver {
    root: String,
}

impl OverviewPathResolver {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for OverviewPathResolver {
    fn default() -> Self {
        Self::new("/overview")
    }
}

impl PathResolver for OverviewPathResolver {
    fn path_for(&self, reference: &ResourceReference) -> String {
        let mut path = self.root.trim_end_matches('/').to_string();
        match &reference.namespace {
            Some(namespace) => {
                path.push_str("/namespace/");
                path.push_str(namespace);
            }
            None => path.push_str("/cluster"),
        }
        if let Some(group) = reference.group() {
            path.push('/');
            path.push_str(group);
        }
        path.push('/');
        path.push_str(&reference.plural());
        if let Some(name) = &reference.name {
            path.push('/');
            path.push_str(name);
        }
        path
    }
}

/// Resolves paths, special-casing the nested family
#[derive(Clone)]
pub struct LinkResolver {
    nested_prefix: String,
    nested_root: String,
    generic: Arc<dyn PathResolver>,
}

impl LinkResolver {
    pub fn new(
        nested_prefix: impl Into<String>,
        nested_root: impl Into<String>,
        generic: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            nested_prefix: nested_prefix.into(),
            nested_root: nested_root.into(),
            generic,
        }
    }

    /// Resolver for Knative Serving under `/knative`
    pub fn knative(generic: Arc<dyn PathResolver>) -> Self {
        Self::new(crate::models::SERVING_GROUP, "/knative", generic)
    }

    /// Whether `api_version` belongs to the nested family
    pub fn is_nested(&self, api_version: &str) -> bool {
        api_version.starts_with(&self.nested_prefix)
    }

    /// Compute the path of `reference`, optionally scoped under `context`
    ///
    /// `context` only affects nested-family references. A missing kind or
    /// name contributes no segment.
    pub fn resolve(
        &self,
        reference: &ResourceReference,
        context: Option<&ResourceReference>,
    ) -> Result<String, MalformedReference> {
        if reference.api_version.is_empty() {
            return Err(MalformedReference::from_reference(reference));
        }

        if !self.is_nested(&reference.api_version) {
            return Ok(self.generic.path_for(reference));
        }

        let mut path = self.nested_root.trim_end_matches('/').to_string();
        if let Some(context) = context {
            push_segments(&mut path, context);
        }
        push_segments(&mut path, reference);
        Ok(path)
    }
}

impl std::fmt::Debug for LinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkResolver")
            .field("nested_prefix", &self.nested_prefix)
            .field("nested_root", &self.nested_root)
            .finish_non_exhaustive()
    }
}

fn push_segments(path: &mut String, reference: &ResourceReference) {
    if !reference.kind.is_empty() {
        path.push('/');
        path.push_str(&naive_plural(&reference.kind));
    }
    if let Some(name) = reference.name.as_deref().filter(|n| !n.is_empty()) {
        path.push('/');
        path.push_str(name);
    }
}
