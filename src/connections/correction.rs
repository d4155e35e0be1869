//! Workload kind correction
//!
//! Telemetry's `app` class buckets under statefulset. After inference, any
//! statefulset-bucketed name that is not a known StatefulSet but is a known
//! Deployment moves to deployment: as a top-level target entry and inside
//! every `connectFrom`/`external` list anywhere in the graph.

use crate::connections::graph::{Connection, ConnectionGraph};
use crate::discovery::graph::ResourceGraph;
use crate::models::kind::{BuiltinKind, ResourceKind};

/// Reconcile statefulset/deployment ambiguity against the discovered set
pub fn reconcile_workload_kinds(connections: &mut ConnectionGraph, resources: &ResourceGraph) {
    let deployment = ResourceKind::Builtin(BuiltinKind::Deployment);
    let statefulset = ResourceKind::Builtin(BuiltinKind::StatefulSet);
    let misplaced = |name: &str| {
        !resources.contains(statefulset, name) && resources.contains(deployment, name)
    };

    // Top-level targets bucketed under statefulset
    let moved: Vec<(String, Connection)> = match connections.targets.get_mut(&statefulset) {
        Some(entries) => {
            let names: Vec<String> = entries
                .keys()
                .filter(|name| misplaced(name))
                .cloned()
                .collect();
            names
                .into_iter()
                .filter_map(|name| entries.remove(&name).map(|conn| (name, conn)))
                .collect()
        }
        None => Vec::new(),
    };
    for (name, connection) in moved {
        connections.entry(deployment, &name).merge(connection);
    }

    // Every reference list, connectFrom and external alike
    for entries in connections.targets.values_mut() {
        for connection in entries.values_mut() {
            move_names(&mut connection.connect_from, statefulset, deployment, &misplaced);
            for per_ns in connection.external.values_mut() {
                move_names(per_ns, statefulset, deployment, &misplaced);
            }
        }
    }
}

fn move_names(
    map: &mut std::collections::BTreeMap<ResourceKind, Vec<String>>,
    from: ResourceKind,
    to: ResourceKind,
    misplaced: &dyn Fn(&str) -> bool,
) {
    let Some(names) = map.get_mut(&from) else {
        return;
    };
    let mut moved = Vec::new();
    names.retain(|name| {
        if misplaced(name) {
            moved.push(name.clone());
            false
        } else {
            true
        }
    });
    if names.is_empty() {
        map.remove(&from);
    }
    if !moved.is_empty() {
        let list = map.entry(to).or_default();
        for name in moved {
            if !list.contains(&name) {
                list.push(name);
            }
        }
    }
}
