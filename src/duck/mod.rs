//! Duck-typed resource version resolution
//!
//! Knative event sources are distinct CRDs sharing one structural contract.
//! Which concrete kinds exist is read from a `ClusterDuckType` registry
//! object; which version each kind is stored as is read from its CRD.
//!
//! The CRD name is derived as `<kind-lowercase>s.<group>`. That guess is
//! wrong for irregular plurals, and a wrong guess is handled exactly like a
//! missing CRD: the kind is left out of the result.

pub mod versions;

pub use versions::{ApiVersion, Channel, compare_versions, latest_version, sort_latest_first};

use crate::kube::{LookupFailure, ObjectClient};
use crate::models::{NO_GROUP, ResourceReference, naive_plural};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinitionVersion;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// API version of the duck type registry
pub const DUCK_REGISTRY_API_VERSION: &str = "discovery.knative.dev/v1alpha1";
/// Kind of the duck type registry
pub const DUCK_REGISTRY_KIND: &str = "ClusterDuckType";

/// The stored version of one duck-typed kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredVersion {
    pub kind: String,
    pub version: CustomResourceDefinitionVersion,
}

/// CRD object name guessed for a reference
pub fn crd_name(reference: &ResourceReference) -> String {
    format!(
        "{}.{}",
        naive_plural(&reference.kind),
        reference.group().unwrap_or(NO_GROUP)
    )
}

/// Resolve the stored version of each observed kind
///
/// Observed references are deduplicated by kind, first occurrence wins.
/// Kinds whose CRD cannot be fetched, or that declare no storage version,
/// are dropped. Results are in resolution order.
pub async fn resolve_stored_versions(
    client: &dyn ObjectClient,
    observed: &[ResourceReference],
) -> Vec<StoredVersion> {
    let mut seen_kinds = HashSet::new();
    let mut resolved = Vec::new();

    for reference in observed {
        if !seen_kinds.insert(reference.kind.as_str()) {
            continue;
        }

        let name = crd_name(reference);
        let crd = match client.get(&ResourceReference::crd(&name)).await {
            Ok(obj) => obj,
            Err(e) => {
                tracing::debug!("No CRD {} for {}: {}", name, reference.kind, e);
                continue;
            }
        };

        let crd = match serde_json::to_value(&crd) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize CRD {}: {}", name, e);
                continue;
            }
        };

        match stored_version(&crd) {
            Some(entry) => {
                if resolved.iter().any(|r: &StoredVersion| r.kind == entry.kind) {
                    continue;
                }
                tracing::debug!("{} is stored as {}", entry.kind, entry.version.name);
                resolved.push(entry);
            }
            None => tracing::debug!("CRD {} declares no usable storage version", name),
        }
    }

    resolved
}

/// Accepted kind and storage version of a CRD object
fn stored_version(crd: &Value) -> Option<StoredVersion> {
    let kind = crd
        .pointer("/spec/names/kind")
        .and_then(|k| k.as_str())
        .filter(|k| !k.is_empty())?;

    let version = crd
        .pointer("/spec/versions")
        .and_then(|v| v.as_array())?
        .iter()
        .find(|v| v.get("storage").and_then(|s| s.as_bool()) == Some(true))?;

    let version: CustomResourceDefinitionVersion = serde_json::from_value(version.clone())
        .map_err(|e| tracing::warn!("Unreadable storage version of {}: {}", kind, e))
        .ok()?;

    Some(StoredVersion {
        kind: kind.to_string(),
        version,
    })
}

/// Read the `{apiVersion, kind}` entries of a duck type registry
///
/// `status.ducks` maps each duck version to the kinds implementing it.
/// Entries of every duck version are returned, sorted by kind.
pub fn registry_refs(registry: &Value) -> Vec<ResourceReference> {
    let mut refs: Vec<ResourceReference> = registry
        .pointer("/status/ducks")
        .and_then(|d| d.as_object())
        .map(|ducks| {
            ducks
                .values()
                .filter_map(|entries| entries.as_array())
                .flatten()
                .filter_map(|entry| {
                    let api_version = entry.get("apiVersion").and_then(|a| a.as_str())?;
                    let kind = entry.get("kind").and_then(|k| k.as_str())?;
                    Some(ResourceReference::new(api_version, kind))
                })
                .collect()
        })
        .unwrap_or_default();
    refs.sort_by(|a, b| a.kind.cmp(&b.kind));
    refs
}

/// Fetch the named registry and return the kinds it lists
pub async fn observed_source_refs(
    client: &dyn ObjectClient,
    registry: &str,
) -> Result<Vec<ResourceReference>, LookupFailure> {
    let reference =
        ResourceReference::new(DUCK_REGISTRY_API_VERSION, DUCK_REGISTRY_KIND).with_name(registry);
    let obj = client.get(&reference).await?;
    let value = serde_json::to_value(&obj).map_err(|e| LookupFailure::Api {
        reference: reference.to_string(),
        message: e.to_string(),
    })?;
    Ok(registry_refs(&value))
}

/// Duck-typed kinds from `registry` with their stored versions, by kind
pub async fn list_source_types(
    client: &dyn ObjectClient,
    registry: &str,
) -> Result<Vec<StoredVersion>, LookupFailure> {
    let observed = observed_source_refs(client, registry).await?;
    let mut resolved = resolve_stored_versions(client, &observed).await;
    resolved.sort_by(|a, b| a.kind.cmp(&b.kind));
    Ok(resolved)
}
