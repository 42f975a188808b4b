//! Family-specific traversal of Knative resources
//!
//! Starting from a root object, discovers related objects through the
//! object client and feeds them into a [`GraphBuilder`]. Edges always run
//! from the object that declares a reference to the object it refers to:
//! a Revision points at its owning Configuration, a Route points at the
//! Revisions it sends traffic to.
//!
//! A related object that cannot be fetched is skipped along with its edge.
//! Only a failure to fetch the root itself aborts the render.

use crate::context::RenderContext;
use crate::kube::{LookupFailure, Selector};
use crate::links::MalformedReference;
use crate::models::{
    CONFIGURATION_LABEL, KnativeKind, ObjectError, OwnerRef, REVISION_LABEL, ResourceReference,
    ResourceSummary, SERVICE_LABEL,
};
use crate::topology::builder::GraphBuilder;
use crate::topology::graph::{Graph, Relation};
use std::collections::{HashMap, VecDeque};

/// Failure to render a topology
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("failed to fetch root object: {0}")]
    Root(#[from] LookupFailure),

    #[error("root object is unusable: {0}")]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Malformed(#[from] MalformedReference),
}

/// Fetch `root` and build the topology graph around it
pub async fn build_topology(
    ctx: &RenderContext,
    root: &ResourceReference,
) -> Result<Graph, TopologyError> {
    let mut root = root.clone();
    if root.namespace.is_none() {
        root.namespace = Some(ctx.default_namespace.clone());
    }

    let obj = ctx.client.get(&root).await?;
    let root = ResourceSummary::try_from(&obj)?;
    tracing::debug!("Building topology for {}", root.reference());

    let mut traversal = Traversal::new(ctx, &root);
    traversal.visit(&root)?;
    traversal.discover_children(&root).await?;

    while let Some(obj) = traversal.queue.pop_front() {
        traversal.link_owners(&obj).await?;
        traversal.expand_references(&obj).await?;
    }

    let graph = traversal.builder.to_graph();
    tracing::debug!(
        "Built topology with {} nodes and {} edges",
        graph.nodes.len(),
        graph.edge_count()
    );
    Ok(graph)
}

/// (API group, kind, namespace, name)
type NameKey = (String, String, String, String);

fn name_key(api_version: &str, kind: &str, namespace: &str, name: &str) -> NameKey {
    let group = api_version
        .split_once('/')
        .map(|(group, _)| group)
        .unwrap_or_default();
    (
        group.to_string(),
        kind.to_string(),
        namespace.to_string(),
        name.to_string(),
    )
}

struct Traversal<'a> {
    ctx: &'a RenderContext,
    builder: GraphBuilder,
    /// Objects already in the graph, by UID
    seen: HashMap<String, ResourceSummary>,
    /// (group, kind, namespace, name) -> UID
    by_name: HashMap<NameKey, String>,
    /// Objects whose owners and references are still to be walked
    queue: VecDeque<ResourceSummary>,
}

impl<'a> Traversal<'a> {
    fn new(ctx: &'a RenderContext, root: &ResourceSummary) -> Self {
        Self {
            ctx,
            builder: GraphBuilder::new(ctx.links.clone(), root),
            seen: HashMap::new(),
            by_name: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    fn namespace_of(&self, obj: &ResourceSummary) -> String {
        obj.namespace()
            .unwrap_or(&self.ctx.default_namespace)
            .to_string()
    }

    /// Add an object to the graph and schedule it for walking
    fn visit(&mut self, obj: &ResourceSummary) -> Result<(), MalformedReference> {
        if self.seen.contains_key(obj.uid()) {
            return Ok(());
        }
        self.builder.add_node(obj)?;
        let key = name_key(
            obj.api_version(),
            obj.kind(),
            &self.namespace_of(obj),
            obj.name(),
        );
        self.by_name.insert(key, obj.uid().to_string());
        self.seen.insert(obj.uid().to_string(), obj.clone());
        self.queue.push_back(obj.clone());
        Ok(())
    }

    fn lookup(
        &self,
        api_version: &str,
        kind: &str,
        namespace: &str,
        name: &str,
    ) -> Option<&ResourceSummary> {
        let uid = self
            .by_name
            .get(&name_key(api_version, kind, namespace, name))?;
        self.seen.get(uid)
    }

    /// Resolve a reference to a related object, fetching it if unseen
    ///
    /// Returns `None` when the object cannot be fetched or adapted.
    async fn related(&mut self, reference: &ResourceReference) -> Option<ResourceSummary> {
        let namespace = reference
            .namespace
            .clone()
            .unwrap_or_else(|| self.ctx.default_namespace.clone());
        let name = reference.name.as_deref()?;
        if let Some(found) = self.lookup(&reference.api_version, &reference.kind, &namespace, name) {
            return Some(found.clone());
        }

        let obj = match self.ctx.client.get(reference).await {
            Ok(obj) => obj,
            Err(e) => {
                tracing::debug!("Skipping related object {}: {}", reference, e);
                return None;
            }
        };
        match ResourceSummary::try_from(&obj) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!("Skipping related object {}: {}", reference, e);
                None
            }
        }
    }

    async fn list(&self, reference: ResourceReference, selector: Selector) -> Vec<ResourceSummary> {
        match self.ctx.client.list(&reference, &selector).await {
            Ok(items) => items
                .iter()
                .filter_map(|obj| match ResourceSummary::try_from(obj) {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        tracing::warn!("Skipping listed {} object: {}", reference.kind, e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                tracing::debug!("Skipping {} children ({}): {}", reference.kind, selector, e);
                Vec::new()
            }
        }
    }

    /// List the objects a root fans out to, by label
    async fn discover_children(&mut self, root: &ResourceSummary) -> Result<(), MalformedReference> {
        let namespace = self.namespace_of(root);
        let (label, kinds): (&str, &[KnativeKind]) = match root.known_kind() {
            Some(KnativeKind::Service) => (
                SERVICE_LABEL,
                &[
                    KnativeKind::Configuration,
                    KnativeKind::Route,
                    KnativeKind::Revision,
                    KnativeKind::Deployment,
                ],
            ),
            Some(KnativeKind::Configuration) => (
                CONFIGURATION_LABEL,
                &[KnativeKind::Revision, KnativeKind::Deployment],
            ),
            Some(KnativeKind::Revision) => (REVISION_LABEL, &[KnativeKind::Deployment]),
            Some(KnativeKind::Route) | Some(KnativeKind::Deployment) | None => return Ok(()),
        };

        let listings = kinds.iter().map(|kind| {
            let reference =
                ResourceReference::new(kind.api_version(), kind.as_str()).with_namespace(&namespace);
            self.list(reference, Selector::label(label, root.name()))
        });
        let listings = futures::future::join_all(listings).await;

        for (kind, children) in kinds.iter().zip(listings) {
            tracing::debug!(
                "Found {} {} objects for {} {}",
                children.len(),
                kind,
                root.kind(),
                root.name()
            );
            for child in &children {
                self.visit(child)?;
            }
        }
        Ok(())
    }

    /// Add an explicit edge from `obj` to each of its owners
    async fn link_owners(&mut self, obj: &ResourceSummary) -> Result<(), MalformedReference> {
        for owner_ref in obj.owners().to_vec() {
            let Some(owner) = self.owner(obj, &owner_ref).await else {
                continue;
            };
            self.builder.add_edge(obj, &owner, Relation::Explicit)?;
            self.visit(&owner)?;
        }
        Ok(())
    }

    async fn owner(&mut self, obj: &ResourceSummary, owner_ref: &OwnerRef) -> Option<ResourceSummary> {
        if let Some(uid) = &owner_ref.uid {
            if let Some(owner) = self.seen.get(uid) {
                return Some(owner.clone());
            }
        }

        let reference = ResourceReference::new(&owner_ref.api_version, &owner_ref.kind)
            .with_namespace(self.namespace_of(obj))
            .with_name(&owner_ref.name);
        let owner = self.related(&reference).await?;

        if let Some(uid) = &owner_ref.uid {
            if owner.uid() != uid {
                tracing::warn!(
                    "Owner UID mismatch for {}/{}: expected {}, got {}",
                    owner_ref.kind,
                    owner_ref.name,
                    uid,
                    owner.uid()
                );
                return None;
            }
        }
        Some(owner)
    }

    /// Follow references declared in spec or status
    async fn expand_references(&mut self, obj: &ResourceSummary) -> Result<(), MalformedReference> {
        match obj.known_kind() {
            Some(KnativeKind::Configuration) => self.expand_configuration(obj).await,
            Some(KnativeKind::Route) => self.expand_route(obj).await,
            _ => Ok(()),
        }
    }

    /// Implicit edge to the latest created revision when it was not listed
    async fn expand_configuration(&mut self, config: &ResourceSummary) -> Result<(), MalformedReference> {
        let Some(latest) = config.str_at("/status/latestCreatedRevisionName") else {
            return Ok(());
        };
        let namespace = self.namespace_of(config);
        if self
            .lookup(
                config.api_version(),
                KnativeKind::Revision.as_str(),
                &namespace,
                latest,
            )
            .is_some()
        {
            return Ok(());
        }

        let reference = serving_reference(config, KnativeKind::Revision, &namespace, latest);
        if let Some(revision) = self.related(&reference).await {
            self.builder.add_edge(config, &revision, Relation::Implicit)?;
            self.visit(&revision)?;
        }
        Ok(())
    }

    /// Edges to every traffic target of a Route
    async fn expand_route(&mut self, route: &ResourceSummary) -> Result<(), MalformedReference> {
        let namespace = self.namespace_of(route);
        let targets: Vec<(Option<String>, Option<String>)> = route
            .array_at("/spec/traffic")
            .iter()
            .map(|target| {
                (
                    target
                        .get("revisionName")
                        .and_then(|r| r.as_str())
                        .map(str::to_string),
                    target
                        .get("configurationName")
                        .and_then(|c| c.as_str())
                        .map(str::to_string),
                )
            })
            .collect();

        for (revision_name, configuration_name) in targets {
            if let Some(revision_name) = revision_name {
                let reference =
                    serving_reference(route, KnativeKind::Revision, &namespace, &revision_name);
                if let Some(revision) = self.related(&reference).await {
                    self.builder.add_edge(route, &revision, Relation::Explicit)?;
                    self.visit(&revision)?;
                }
                continue;
            }

            let Some(configuration_name) = configuration_name else {
                continue;
            };
            let reference = serving_reference(
                route,
                KnativeKind::Configuration,
                &namespace,
                &configuration_name,
            );
            let Some(config) = self.related(&reference).await else {
                continue;
            };
            self.builder.add_edge(route, &config, Relation::Explicit)?;
            self.visit(&config)?;

            if let Some(latest) = config.str_at("/status/latestReadyRevisionName") {
                let reference = serving_reference(route, KnativeKind::Revision, &namespace, latest);
                if let Some(revision) = self.related(&reference).await {
                    self.builder.add_edge(route, &revision, Relation::Implicit)?;
                    self.visit(&revision)?;
                }
            }
        }
        Ok(())
    }
}

/// Reference to a serving object in the same API version as `from`
fn serving_reference(
    from: &ResourceSummary,
    kind: KnativeKind,
    namespace: &str,
    name: &str,
) -> ResourceReference {
    ResourceReference::new(from.api_version(), kind.as_str())
        .with_namespace(namespace)
        .with_name(name)
}
