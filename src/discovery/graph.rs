//! Discovered resource set
//!
//! The categorized, deduplicated snapshot of everything that belongs to one
//! root resource. The shape is fixed up front: every configured kind is
//! present with a (possibly empty) list, so "root not found" and "root has
//! no children" look identical to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::kind::{BuiltinKind, CustomKind, ResourceKind};
use crate::models::resource::K8sResource;
use crate::models::target::ResourceTarget;

/// Deduplicated, categorized snapshot rooted at one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceGraph {
    pub builtin: BTreeMap<BuiltinKind, Vec<K8sResource>>,
    pub custom: BTreeMap<CustomKind, Vec<K8sResource>>,
}

/// One `{kind, name}` line of a flat inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub kind: String,
    pub name: String,
}

impl ResourceGraph {
    /// Empty graph with every given kind present
    pub fn shaped(builtin: &[BuiltinKind], custom: &[CustomKind]) -> Self {
        let mut graph = Self::default();
        for kind in builtin {
            graph.builtin.entry(*kind).or_default();
        }
        for kind in custom {
            graph.custom.entry(*kind).or_default();
        }
        graph
    }

    /// Insert a resource, deduplicating by `(kind, name)`.
    ///
    /// Returns false (and drops the resource) when the identity is already
    /// present or the kind is not part of this graph's shape.
    pub fn insert(&mut self, resource: K8sResource) -> bool {
        let Some((kind, name)) = resource.identity() else {
            return false;
        };
        if self.contains(kind, &name) {
            return false;
        }
        let slot = match kind {
            ResourceKind::Builtin(k) => self.builtin.get_mut(&k),
            ResourceKind::Custom(k) => self.custom.get_mut(&k),
        };
        match slot {
            Some(list) => {
                list.push(resource);
                true
            }
            None => false,
        }
    }

    /// Whether a `(kind, name)` pair is present
    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// The resources of one kind (empty slice for unshaped kinds)
    pub fn of_kind(&self, kind: ResourceKind) -> &[K8sResource] {
        let list = match kind {
            ResourceKind::Builtin(k) => self.builtin.get(&k),
            ResourceKind::Custom(k) => self.custom.get(&k),
        };
        list.map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of one kind, in insertion order
    pub fn names_of(&self, kind: ResourceKind) -> Vec<&str> {
        self.of_kind(kind)
            .iter()
            .filter_map(|r| r.name())
            .collect()
    }

    /// Look up one resource by identity
    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&K8sResource> {
        self.of_kind(kind)
            .iter()
            .find(|r| r.name() == Some(name))
    }

    /// Every resource in the graph, builtin then custom, kinds in key order
    pub fn iter(&self) -> impl Iterator<Item = &K8sResource> {
        self.builtin
            .values()
            .flatten()
            .chain(self.custom.values().flatten())
    }

    /// Workload resources (Deployments and StatefulSets)
    pub fn workloads(&self) -> impl Iterator<Item = &K8sResource> {
        self.of_kind(ResourceKind::Builtin(BuiltinKind::Deployment))
            .iter()
            .chain(self.of_kind(ResourceKind::Builtin(BuiltinKind::StatefulSet)).iter())
    }

    /// Total resource count
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Flat `{kind, name}` inventory, kinds in key order
    pub fn inventory(&self) -> Vec<InventoryEntry> {
        self.iter()
            .filter_map(|r| {
                Some(InventoryEntry {
                    kind: r.kind()?.key().to_string(),
                    name: r.name()?.to_string(),
                })
            })
            .collect()
    }

    /// Addressing targets for every resource in the graph
    pub fn targets(&self) -> Vec<ResourceTarget> {
        self.iter()
            .filter_map(|r| {
                let (kind, name) = r.identity()?;
                Some(ResourceTarget::for_kind(kind, &name))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(kind: &str, name: &str) -> K8sResource {
        K8sResource(json!({"kind": kind, "metadata": {"name": name}}))
    }

    #[test]
    fn test_insert_dedups_by_identity() {
        let mut graph = ResourceGraph::shaped(&[BuiltinKind::Ingress], &[]);
        assert!(graph.insert(resource("Ingress", "ing-1")));
        assert!(!graph.insert(resource("Ingress", "ing-1")));
        assert_eq!(graph.of_kind(BuiltinKind::Ingress.into()).len(), 1);
    }

    #[test]
    fn test_insert_rejects_unshaped_kind() {
        let mut graph = ResourceGraph::shaped(&[BuiltinKind::Ingress], &[]);
        assert!(!graph.insert(resource("Pod", "p-1")));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_shaped_keys_survive_empty() {
        let graph = ResourceGraph::shaped(
            &[BuiltinKind::Ingress, BuiltinKind::Service],
            &[CustomKind::Devbox],
        );
        assert_eq!(graph.builtin.len(), 2);
        assert_eq!(graph.custom.len(), 1);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_inventory_order_and_content() {
        let mut graph =
            ResourceGraph::shaped(&[BuiltinKind::Ingress], &[CustomKind::Devbox]);
        graph.insert(resource("Devbox", "db-1"));
        graph.insert(resource("Ingress", "ing-1"));
        let inventory = graph.inventory();
        assert_eq!(
            inventory,
            vec![
                InventoryEntry {
                    kind: "ingress".into(),
                    name: "ing-1".into()
                },
                InventoryEntry {
                    kind: "devbox".into(),
                    name: "db-1".into()
                },
            ]
        );
    }
}
