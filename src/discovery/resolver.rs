//! Resource discovery resolver
//!
//! Walks outward from a root resource, fanning label-selector queries out
//! concurrently per work item and feeding recursable children (Devboxes,
//! Clusters, workloads under an Instance) back into an explicit breadth-first
//! queue. A visited set guards against ownership labels ever forming a cycle.

use anyhow::{Context, Result};
use futures::future::join_all;
use std::collections::{HashSet, VecDeque};

use crate::discovery::graph::ResourceGraph;
use crate::discovery::lister::ResourceLister;
use crate::discovery::rules::RootKind;
use crate::models::kind::ResourceKind;
use crate::models::resource::K8sResource;
use crate::models::target::ResourceTarget;

/// Discover every resource belonging to the given root.
///
/// The root object itself is not part of the output; an absent root yields
/// the same empty, fully-shaped graph as a childless one.
pub async fn discover(
    lister: &dyn ResourceLister,
    namespace: &str,
    root: RootKind,
    name: &str,
) -> Result<ResourceGraph> {
    let (builtin_kinds, custom_kinds) = root.configured_kinds();
    let mut graph = ResourceGraph::shaped(&builtin_kinds, &custom_kinds);

    let root_target = ResourceTarget::for_kind(root.as_kind(), name);
    let root_obj = lister
        .get_resource(namespace, &root_target)
        .await
        .with_context(|| format!("Failed to resolve root {}/{}", root, name))?;
    if root_obj.is_none() {
        tracing::debug!("Root {}/{} not found, returning empty graph", root, name);
        return Ok(graph);
    }

    let root_identity = (root.as_kind(), name.to_string());
    let mut queue: VecDeque<(RootKind, String)> = VecDeque::new();
    let mut visited: HashSet<(ResourceKind, String)> = HashSet::new();
    queue.push_back((root, name.to_string()));
    visited.insert(root_identity.clone());

    while let Some((kind, item_name)) = queue.pop_front() {
        for resource in run_queries(lister, namespace, kind, &item_name).await {
            let Some(identity) = resource.identity() else {
                continue;
            };
            if identity == root_identity {
                continue;
            }
            if !graph.insert(resource) {
                continue;
            }
            let (child_kind, child_name) = identity;
            if let Some(child_root) = RootKind::for_kind(child_kind) {
                if visited.insert((child_kind, child_name.clone())) {
                    queue.push_back((child_root, child_name));
                }
            }
        }
    }

    Ok(graph)
}

/// Run one work item's queries: every configured label selector plus the
/// exact-name lookup, concurrently. A failed query degrades its branch to
/// empty; it never aborts the discovery.
async fn run_queries(
    lister: &dyn ResourceLister,
    namespace: &str,
    kind: RootKind,
    name: &str,
) -> Vec<K8sResource> {
    let label_queries = kind.rules().iter().map(|rule| {
        let selector = rule.selector(name);
        async move {
            match lister
                .list_resources(namespace, &selector, rule.builtin, rule.custom)
                .await
            {
                Ok(listed) => listed.into_resources(),
                Err(e) => {
                    tracing::warn!("Label query {} failed: {:#}", selector, e);
                    Vec::new()
                }
            }
        }
    });

    // Some generated children reuse the parent's literal name instead of a
    // label, so the exact-name lookup runs alongside the selector queries.
    let exact_query = async {
        match lister.get_by_exact_name(namespace, name).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Exact-name lookup for {} failed: {:#}", name, e);
                Vec::new()
            }
        }
    };

    let (label_batches, exact_items) = futures::join!(join_all(label_queries), exact_query);

    let mut resources: Vec<K8sResource> = label_batches.into_iter().flatten().collect();
    resources.extend(exact_items);
    // Schema-invalid items are excluded, not fatal
    resources
        .into_iter()
        .filter_map(|r| K8sResource::try_new(r.0))
        .collect()
}
