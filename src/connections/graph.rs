//! Connection graph structures
//!
//! Inbound-edge data for the canvas. All three inference strategies emit
//! this shape, so their results merge by unioning `connectFrom` lists per
//! target. Edges whose source lives outside the current root's namespace go
//! under `external`, keyed by that namespace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::kind::ResourceKind;

/// Inbound edges for one target resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Same-namespace sources, grouped by source kind
    #[serde(rename = "connectFrom", default)]
    pub connect_from: BTreeMap<ResourceKind, Vec<String>>,

    /// Cross-namespace sources: namespace -> source kind -> names
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub external: BTreeMap<String, BTreeMap<ResourceKind, Vec<String>>>,
}

impl Connection {
    pub fn is_empty(&self) -> bool {
        self.connect_from.is_empty() && self.external.is_empty()
    }

    /// Union another connection's edges into this one, deduplicating names
    pub fn merge(&mut self, other: Connection) {
        for (kind, names) in other.connect_from {
            let list = self.connect_from.entry(kind).or_default();
            for name in names {
                if !list.contains(&name) {
                    list.push(name);
                }
            }
        }
        for (namespace, kinds) in other.external {
            let per_ns = self.external.entry(namespace).or_default();
            for (kind, names) in kinds {
                let list = per_ns.entry(kind).or_default();
                for name in names {
                    if !list.contains(&name) {
                        list.push(name);
                    }
                }
            }
        }
    }
}

/// All inferred edges: target kind -> target name -> inbound edges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionGraph {
    pub targets: BTreeMap<ResourceKind, BTreeMap<String, Connection>>,
}

impl ConnectionGraph {
    /// The (possibly new) connection entry for a target
    pub fn entry(&mut self, target_kind: ResourceKind, target_name: &str) -> &mut Connection {
        self.targets
            .entry(target_kind)
            .or_default()
            .entry(target_name.to_string())
            .or_default()
    }

    /// Record a same-namespace edge, deduplicating
    pub fn add_connect_from(
        &mut self,
        target_kind: ResourceKind,
        target_name: &str,
        source_kind: ResourceKind,
        source_name: &str,
    ) {
        let list = self
            .entry(target_kind, target_name)
            .connect_from
            .entry(source_kind)
            .or_default();
        if !list.iter().any(|n| n == source_name) {
            list.push(source_name.to_string());
        }
    }

    /// Record a cross-namespace edge, deduplicating
    pub fn add_external(
        &mut self,
        target_kind: ResourceKind,
        target_name: &str,
        namespace: &str,
        source_kind: ResourceKind,
        source_name: &str,
    ) {
        let list = self
            .entry(target_kind, target_name)
            .external
            .entry(namespace.to_string())
            .or_default()
            .entry(source_kind)
            .or_default();
        if !list.iter().any(|n| n == source_name) {
            list.push(source_name.to_string());
        }
    }

    /// Look up a target's connection
    pub fn get(&self, target_kind: ResourceKind, target_name: &str) -> Option<&Connection> {
        self.targets.get(&target_kind)?.get(target_name)
    }

    /// Union another graph into this one
    pub fn merge(&mut self, other: ConnectionGraph) {
        for (kind, entries) in other.targets {
            for (name, connection) in entries {
                self.entry(kind, &name).merge(connection);
            }
        }
    }

    /// Total number of targets with at least one edge
    pub fn len(&self) -> usize {
        self.targets
            .values()
            .map(|entries| entries.values().filter(|c| !c.is_empty()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kind::{BuiltinKind, CustomKind};

    #[test]
    fn test_add_connect_from_dedups() {
        let mut graph = ConnectionGraph::default();
        let ingress = ResourceKind::Builtin(BuiltinKind::Ingress);
        let devbox = ResourceKind::Custom(CustomKind::Devbox);
        graph.add_connect_from(ingress, "ing-1", devbox, "db-1");
        graph.add_connect_from(ingress, "ing-1", devbox, "db-1");
        assert_eq!(
            graph.get(ingress, "ing-1").unwrap().connect_from[&devbox],
            vec!["db-1"]
        );
    }

    #[test]
    fn test_merge_unions_lists() {
        let deployment = ResourceKind::Builtin(BuiltinKind::Deployment);
        let cluster = ResourceKind::Custom(CustomKind::Cluster);

        let mut a = ConnectionGraph::default();
        a.add_connect_from(deployment, "web", cluster, "pg-1");
        let mut b = ConnectionGraph::default();
        b.add_connect_from(deployment, "web", cluster, "pg-1");
        b.add_connect_from(deployment, "web", cluster, "pg-2");
        b.add_external(deployment, "web", "ns-other", cluster, "pg-3");

        a.merge(b);
        let conn = a.get(deployment, "web").unwrap();
        assert_eq!(conn.connect_from[&cluster], vec!["pg-1", "pg-2"]);
        assert_eq!(conn.external["ns-other"][&cluster], vec!["pg-3"]);
    }

    #[test]
    fn test_serializes_with_string_keys() {
        let mut graph = ConnectionGraph::default();
        graph.add_connect_from(
            ResourceKind::Builtin(BuiltinKind::Ingress),
            "ing-1",
            ResourceKind::Custom(CustomKind::Devbox),
            "db-1",
        );
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(
            json["ingress"]["ing-1"]["connectFrom"]["devbox"],
            serde_json::json!(["db-1"])
        );
    }
}
