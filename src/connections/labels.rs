//! Label-based connection inference
//!
//! Generated objects carry a manager label naming the resource they were
//! created for. When no manager label matches, a name shared with a workload
//! is treated as a naming-convention relationship.

use crate::connections::graph::ConnectionGraph;
use crate::discovery::graph::ResourceGraph;
use crate::models::kind::{BuiltinKind, CustomKind, ResourceKind};
use crate::models::labels::{APP_DEPLOY_MANAGER_LABEL, DEVBOX_MANAGER_LABEL};
use crate::models::resource::K8sResource;

/// Infer edges from manager labels across the discovered set
pub fn infer_from_labels(graph: &ResourceGraph) -> ConnectionGraph {
    let mut connections = ConnectionGraph::default();

    for resource in graph.iter() {
        let Some((target_kind, target_name)) = resource.identity() else {
            continue;
        };
        // Workloads are sources here, not targets
        if is_workload(target_kind) {
            continue;
        }
        if let Some((source_kind, source_name)) = find_manager(graph, resource) {
            connections.add_connect_from(target_kind, &target_name, source_kind, &source_name);
        }
    }

    connections
}

/// Resolve the managing source of one resource, if any.
///
/// Precedence: devbox-manager label, then app-deploy-manager label, then
/// exact name equality against the discovered workloads.
fn find_manager(graph: &ResourceGraph, resource: &K8sResource) -> Option<(ResourceKind, String)> {
    if let Some(manager) = resource.label(DEVBOX_MANAGER_LABEL) {
        let devbox = ResourceKind::Custom(CustomKind::Devbox);
        if graph.contains(devbox, manager) {
            return Some((devbox, manager.to_string()));
        }
        tracing::debug!(
            "Manager label references unknown devbox {}, skipping",
            manager
        );
    }

    if let Some(manager) = resource.label(APP_DEPLOY_MANAGER_LABEL) {
        if let Some(kind) = workload_kind_of(graph, manager) {
            return Some((kind, manager.to_string()));
        }
        tracing::debug!(
            "Manager label references unknown workload {}, skipping",
            manager
        );
    }

    // Fallback: children generated without labels reuse the workload's name
    let name = resource.name()?;
    workload_kind_of(graph, name).map(|kind| (kind, name.to_string()))
}

/// Which discovered workload kind carries this name, Deployments first
fn workload_kind_of(graph: &ResourceGraph, name: &str) -> Option<ResourceKind> {
    let deployment = ResourceKind::Builtin(BuiltinKind::Deployment);
    let statefulset = ResourceKind::Builtin(BuiltinKind::StatefulSet);
    if graph.contains(deployment, name) {
        Some(deployment)
    } else if graph.contains(statefulset, name) {
        Some(statefulset)
    } else {
        None
    }
}

fn is_workload(kind: ResourceKind) -> bool {
    matches!(
        kind,
        ResourceKind::Builtin(BuiltinKind::Deployment)
            | ResourceKind::Builtin(BuiltinKind::StatefulSet)
    )
}
