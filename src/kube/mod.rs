//! Kubernetes client module
//!
//! Connects to the API server and adapts the client to the engine's
//! [`ObjectClient`] capability.

pub mod client;

#[cfg(test)]
pub use client::MockObjectClient;
pub use client::{KubeObjectClient, LookupFailure, ObjectClient, Selector};

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use url::Url;

/// Initialize a Kubernetes client
///
/// Uses the default kubeconfig loading strategy when no context is given:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client(context: Option<&str>) -> Result<Client> {
    let config = match context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("Failed to load kubeconfig context {}", context))?
        }
        None => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    if let Ok(url) = Url::parse(&config.cluster_url.to_string()) {
        if let Some(host) = url.host_str() {
            if is_internal_host(host) && config.proxy_url.is_some() {
                tracing::warn!(
                    "Cluster host {} looks internal but a proxy is configured; add it to NO_PROXY if requests fail",
                    host
                );
            }
        }
    }

    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Check if a host looks like an internal/private address
fn is_internal_host(host: &str) -> bool {
    host.starts_with("10.")
        || host.starts_with("192.168.")
        || host == "localhost"
        || host == "127.0.0.1"
        || host == "::1"
        || host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".cluster.local")
}

/// Determine the context to report
///
/// 1. The explicitly requested context
/// 2. `current-context` from kubeconfig
/// 3. `in-cluster`
pub fn determine_context(context: Option<&str>) -> String {
    if let Some(context) = context {
        return context.to_string();
    }
    Kubeconfig::read()
        .ok()
        .and_then(|kubeconfig| kubeconfig.current_context)
        .unwrap_or_else(|| "in-cluster".to_string())
}

/// Determine the namespace to render in
///
/// 1. The explicitly requested namespace (`-n`, then `KNTOPO_NAMESPACE`)
/// 2. The namespace bound to the context in kubeconfig
/// 3. The configured default (`defaultNamespace`, then `default`)
pub fn determine_namespace(namespace: Option<&str>, context: &str, fallback: &str) -> String {
    if let Some(namespace) = namespace {
        return namespace.to_string();
    }
    Kubeconfig::read()
        .ok()
        .and_then(|kubeconfig| {
            kubeconfig
                .contexts
                .into_iter()
                .find(|c| c.name == context)
                .and_then(|c| c.context)
                .and_then(|c| c.namespace)
        })
        .unwrap_or_else(|| fallback.to_string())
}
