//! Duck type discovery and stored-version resolution tests

mod common;

use common::FakeCluster;
use kntopo::ResourceReference;
use kntopo::duck::{
    crd_name, latest_version, list_source_types, observed_source_refs, resolve_stored_versions,
};
use serde_json::{Value, json};

fn crd(plural: &str, group: &str, kind: &str, versions: Value) -> Value {
    json!({
        "apiVersion": "apiextensions.k8s.io/v1",
        "kind": "CustomResourceDefinition",
        "metadata": { "name": format!("{}.{}", plural, group), "uid": format!("crd-{}", plural) },
        "spec": {
            "group": group,
            "names": { "kind": kind, "plural": plural },
            "scope": "Namespaced",
            "versions": versions
        }
    })
}

fn registry() -> Value {
    json!({
        "apiVersion": "discovery.knative.dev/v1alpha1",
        "kind": "ClusterDuckType",
        "metadata": { "name": "sources.duck.knative.dev", "uid": "duck-1" },
        "status": {
            "ducks": {
                "v1": [
                    { "apiVersion": "sources.knative.dev/v1", "kind": "PingSource", "scope": "Namespaced" },
                    { "apiVersion": "sources.knative.dev/v1", "kind": "ApiServerSource", "scope": "Namespaced" },
                    { "apiVersion": "example.dev/v1", "kind": "GitHubSourcePolicy", "scope": "Namespaced" }
                ],
                "v1beta2": [
                    { "apiVersion": "sources.knative.dev/v1beta2", "kind": "PingSource", "scope": "Namespaced" }
                ]
            }
        }
    })
}

fn storage_only(name: &str) -> Value {
    json!([{ "name": name, "served": true, "storage": true }])
}

#[tokio::test]
async fn test_failed_fetch_is_omitted() {
    let cluster = FakeCluster::new(vec![crd(
        "apiserversources",
        "sources.knative.dev",
        "ApiServerSource",
        storage_only("v1"),
    )]);
    let observed = vec![
        ResourceReference::new("sources.knative.dev/v1", "ApiServerSource"),
        ResourceReference::new("sources.knative.dev/v1", "PingSource"),
    ];

    let resolved = resolve_stored_versions(&cluster, &observed).await;

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].kind, "ApiServerSource");
    assert_eq!(resolved[0].version.name, "v1");
    assert_eq!(
        *cluster.gets.lock().unwrap(),
        vec![
            "CustomResourceDefinition/apiserversources.sources.knative.dev",
            "CustomResourceDefinition/pingsources.sources.knative.dev",
        ]
    );
}

#[tokio::test]
async fn test_storage_version_is_selected() {
    let cluster = FakeCluster::new(vec![crd(
        "pingsources",
        "sources.knative.dev",
        "PingSource",
        json!([
            { "name": "v1beta2", "served": true, "storage": false },
            { "name": "v1", "served": true, "storage": true }
        ]),
    )]);
    let observed = vec![ResourceReference::new("sources.knative.dev/v1beta2", "PingSource")];

    let resolved = resolve_stored_versions(&cluster, &observed).await;
    assert_eq!(resolved[0].version.name, "v1");
    assert!(resolved[0].version.served);
}

#[tokio::test]
async fn test_irregular_plural_misses() {
    // The CRD exists under its real plural; the derived name does not match it
    let cluster = FakeCluster::new(vec![crd(
        "githubsourcepolicies",
        "example.dev",
        "GitHubSourcePolicy",
        storage_only("v1"),
    )]);
    let observed = vec![ResourceReference::new("example.dev/v1", "GitHubSourcePolicy")];

    assert_eq!(
        crd_name(&observed[0]),
        "githubsourcepolicys.example.dev"
    );
    assert!(resolve_stored_versions(&cluster, &observed).await.is_empty());
}

#[tokio::test]
async fn test_core_group_uses_placeholder() {
    let cluster = FakeCluster::new(vec![]);
    let observed = vec![ResourceReference::new("v1", "Widget")];
    assert!(resolve_stored_versions(&cluster, &observed).await.is_empty());
    assert_eq!(
        *cluster.gets.lock().unwrap(),
        vec!["CustomResourceDefinition/widgets.nogroup"]
    );
}

#[tokio::test]
async fn test_registry_discovery() {
    let cluster = FakeCluster::new(vec![registry()]);
    let observed = observed_source_refs(&cluster, "sources.duck.knative.dev")
        .await
        .unwrap();
    let kinds: Vec<&str> = observed.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec!["ApiServerSource", "GitHubSourcePolicy", "PingSource", "PingSource"]
    );

    let ping_versions = observed
        .iter()
        .filter(|r| r.kind == "PingSource")
        .map(|r| r.version());
    assert_eq!(latest_version(ping_versions), Some("v1"));
}

#[tokio::test]
async fn test_missing_registry_is_an_error() {
    let cluster = FakeCluster::new(vec![]);
    let err = observed_source_refs(&cluster, "sources.duck.knative.dev")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_source_types() {
    let cluster = FakeCluster::new(vec![
        registry(),
        crd(
            "pingsources",
            "sources.knative.dev",
            "PingSource",
            storage_only("v1"),
        ),
        crd(
            "apiserversources",
            "sources.knative.dev",
            "ApiServerSource",
            storage_only("v1"),
        ),
    ]);

    let types = list_source_types(&cluster, "sources.duck.knative.dev")
        .await
        .unwrap();
    let kinds: Vec<&str> = types.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["ApiServerSource", "PingSource"]);

    // PingSource appears twice in the registry but is fetched once
    let gets = cluster.gets.lock().unwrap();
    assert_eq!(
        gets.iter()
            .filter(|g| g.ends_with("pingsources.sources.knative.dev"))
            .count(),
        1
    );
}
