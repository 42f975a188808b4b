//! Per-request render context
//!
//! Everything a render needs from its host is carried here and passed
//! explicitly; nothing is reached for through globals.

use crate::kube::ObjectClient;
use crate::links::{LinkResolver, PathResolver};
use std::sync::Arc;

/// Host capabilities for a single render
#[derive(Clone)]
pub struct RenderContext {
    /// Namespace used when a request does not name one
    pub default_namespace: String,
    /// Object store client
    pub client: Arc<dyn ObjectClient>,
    /// Link resolution, wrapping the host's generic path resolver
    pub links: LinkResolver,
}

impl RenderContext {
    pub fn new(
        default_namespace: impl Into<String>,
        client: Arc<dyn ObjectClient>,
        paths: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            default_namespace: default_namespace.into(),
            client,
            links: LinkResolver::knative(paths),
        }
    }

    /// Replace the link resolver (custom nested prefix or root)
    pub fn with_links(mut self, links: LinkResolver) -> Self {
        self.links = links;
        self
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("default_namespace", &self.default_namespace)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}
