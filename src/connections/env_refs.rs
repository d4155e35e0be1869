//! Environment-variable connection inference
//!
//! Workload containers reference other resources in their env either by
//! literal name or through a `{{ kind.name.dotted.path }}` template that
//! pulls a field out of the live resource document. References that fail to
//! resolve (stale name, malformed template, missing field) drop that single
//! edge only.

use crate::connections::graph::ConnectionGraph;
use crate::discovery::graph::ResourceGraph;
use crate::models::fieldpath;
use crate::models::kind::{CustomKind, ResourceKind};
use crate::models::resource::K8sResource;
use serde_json::Value;

/// Infer edges from container env references across all workloads
pub fn infer_from_env(graph: &ResourceGraph) -> ConnectionGraph {
    let mut connections = ConnectionGraph::default();

    for workload in graph.workloads() {
        let Some((workload_kind, workload_name)) = workload.identity() else {
            continue;
        };
        for value in env_values(workload) {
            for (source_kind, source_name) in resolve_references(graph, &value) {
                if source_kind == workload_kind && source_name == workload_name {
                    continue;
                }
                connections.add_connect_from(
                    workload_kind,
                    &workload_name,
                    source_kind,
                    &source_name,
                );
            }
        }
    }

    connections
}

/// All literal env values of a workload's pod template containers
fn env_values(workload: &K8sResource) -> Vec<String> {
    let Some(containers) = workload
        .spec()
        .and_then(|s| fieldpath::get_path(s, "template.spec.containers"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    containers
        .iter()
        .filter_map(|c| c.get("env").and_then(Value::as_array))
        .flatten()
        .filter_map(|entry| entry.get("value").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Resolve every reference inside one env value
fn resolve_references(graph: &ResourceGraph, value: &str) -> Vec<(ResourceKind, String)> {
    let mut references = Vec::new();

    for template in template_paths(value) {
        match resolve_template(graph, &template) {
            Some(reference) => references.push(reference),
            None => {
                tracing::debug!("Dropping unresolvable env reference {{{{{}}}}}", template)
            }
        }
    }

    // A bare value equal to a discovered custom resource's name counts as a
    // literal reference; builtin names collide with ordinary values too
    // easily to be trusted here
    if references.is_empty() {
        for custom in CustomKind::all() {
            let kind = ResourceKind::Custom(*custom);
            if graph.contains(kind, value) {
                references.push((kind, value.to_string()));
            }
        }
    }

    references
}

/// Extract the dotted paths inside `{{ ... }}` markers
fn template_paths(value: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut rest = value;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            // Unterminated template, ignore the remainder
            break;
        };
        paths.push(after[..end].trim().to_string());
        rest = &after[end + 2..];
    }
    paths
}

/// Resolve one `kind.name.path` template against the discovered set.
///
/// The path part may be empty (a pure identifier reference); otherwise it
/// must address an existing scalar or subtree of the live document.
fn resolve_template(graph: &ResourceGraph, template: &str) -> Option<(ResourceKind, String)> {
    let mut segments = template.splitn(3, '.');
    let kind = ResourceKind::parse_optional(segments.next()?)?;
    let name = segments.next()?;
    let resource = graph.get(kind, name)?;
    if let Some(path) = segments.next() {
        fieldpath::get_path(&resource.0, path)?;
    }
    Some((kind, name.to_string()))
}
