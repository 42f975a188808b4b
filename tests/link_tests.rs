//! Link resolution tests

use kntopo::ResourceReference;
use kntopo::links::{LinkResolver, OverviewPathResolver, PathResolver};
use std::sync::{Arc, Mutex};

/// Generic resolver that records what it was asked for
#[derive(Default)]
struct RecordingResolver {
    calls: Mutex<Vec<String>>,
}

impl PathResolver for RecordingResolver {
    fn path_for(&self, reference: &ResourceReference) -> String {
        self.calls.lock().unwrap().push(reference.api_version.clone());
        format!("/generic/{}/{}", reference.api_version, reference.kind)
    }
}

#[test]
fn test_branch_selection_by_api_version() {
    let generic = Arc::new(RecordingResolver::default());
    let resolver = LinkResolver::knative(generic.clone());

    let cases = [
        ("serving.knative.dev/v1", true),
        ("serving.knative.dev/v1beta1", true),
        ("sources.knative.dev/v1", false),
        ("apps/v1", false),
        ("v1", false),
    ];

    for (api_version, nested) in cases {
        let before = generic.calls.lock().unwrap().len();
        let reference = ResourceReference::new(api_version, "Thing").with_name("x");
        let path = resolver.resolve(&reference, None).unwrap();
        let after = generic.calls.lock().unwrap().len();

        if nested {
            assert_eq!(after, before, "{} used the generic resolver", api_version);
            assert_eq!(path, "/knative/things/x");
        } else {
            assert_eq!(after, before + 1, "{} skipped the generic resolver", api_version);
            assert_eq!(path, format!("/generic/{}/Thing", api_version));
        }
    }
}

#[test]
fn test_service_path() {
    let resolver = LinkResolver::knative(Arc::new(OverviewPathResolver::default()));
    let service = ResourceReference::new("serving.knative.dev/v1", "Service")
        .with_namespace("default")
        .with_name("hello");
    assert_eq!(
        resolver.resolve(&service, None).unwrap(),
        "/knative/services/hello"
    );
}

#[test]
fn test_missing_name_yields_type_path() {
    let resolver = LinkResolver::knative(Arc::new(OverviewPathResolver::default()));
    let revisions = ResourceReference::new("serving.knative.dev/v1", "Revision");
    assert_eq!(
        resolver.resolve(&revisions, None).unwrap(),
        "/knative/revisions"
    );

    let deployments = ResourceReference::new("apps/v1", "Deployment").with_namespace("default");
    assert_eq!(
        resolver.resolve(&deployments, None).unwrap(),
        "/overview/namespace/default/apps/deployments"
    );
}

#[test]
fn test_context_ignored_outside_nested_family() {
    let resolver = LinkResolver::knative(Arc::new(OverviewPathResolver::default()));
    let pod = ResourceReference::new("v1", "Pod")
        .with_namespace("default")
        .with_name("hello-pod");
    let parent = ResourceReference::new("serving.knative.dev/v1", "Revision").with_name("r");
    assert_eq!(
        resolver.resolve(&pod, Some(&parent)).unwrap(),
        "/overview/namespace/default/pods/hello-pod"
    );
}

#[test]
fn test_custom_nested_family() {
    let resolver = LinkResolver::new(
        "sources.knative.dev",
        "/eventing/",
        Arc::new(OverviewPathResolver::new("/browse")),
    );
    let ping = ResourceReference::new("sources.knative.dev/v1", "PingSource")
        .with_namespace("default")
        .with_name("beat");
    assert_eq!(
        resolver.resolve(&ping, None).unwrap(),
        "/eventing/pingsources/beat"
    );

    let service = ResourceReference::new("serving.knative.dev/v1", "Service")
        .with_namespace("default")
        .with_name("hello");
    assert_eq!(
        resolver.resolve(&service, None).unwrap(),
        "/browse/namespace/default/serving.knative.dev/services/hello"
    );
}

#[test]
fn test_empty_api_version_is_rejected() {
    let resolver = LinkResolver::knative(Arc::new(OverviewPathResolver::default()));
    let reference = ResourceReference::new("", "Service").with_name("hello");
    let err = resolver.resolve(&reference, None).unwrap_err();
    assert!(err.to_string().contains("hello"));
}
