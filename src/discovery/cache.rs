//! Discovery summary cache
//!
//! A full discovery's `(kind, name)` membership can be cached as an
//! annotation on the root resource to short-circuit later runs. The summary
//! is read-through-verified: every cached entry is re-fetched, and any miss
//! falls back to full discovery. Write-back is a spawned best-effort side
//! effect whose failure never surfaces on the read path.

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::discovery::graph::{InventoryEntry, ResourceGraph};
use crate::discovery::lister::{AnnotationStore, ResourceLister};
use crate::discovery::resolver::discover;
use crate::discovery::rules::RootKind;
use crate::models::kind::ResourceKind;
use crate::models::labels::GRAPH_CACHE_ANNOTATION;
use crate::models::target::ResourceTarget;

/// The cached `{kind, name}` membership summary of one discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub builtin: Vec<InventoryEntry>,
    pub custom: Vec<InventoryEntry>,
    #[serde(rename = "syncedAt")]
    pub synced_at: DateTime<Utc>,
}

impl GraphSummary {
    /// Summarize a discovered graph
    pub fn from_graph(graph: &ResourceGraph) -> Self {
        let entry = |kind: &str, name: Option<&str>| InventoryEntry {
            kind: kind.to_string(),
            name: name.unwrap_or_default().to_string(),
        };
        Self {
            builtin: graph
                .builtin
                .iter()
                .flat_map(|(kind, list)| list.iter().map(|r| entry(kind.key(), r.name())))
                .collect(),
            custom: graph
                .custom
                .iter()
                .flat_map(|(kind, list)| list.iter().map(|r| entry(kind.key(), r.name())))
                .collect(),
            synced_at: Utc::now(),
        }
    }

    /// Addressing targets for every summarized entry; None when any entry
    /// names a kind outside the registry (treated as a stale summary)
    pub fn targets(&self) -> Option<Vec<ResourceTarget>> {
        self.builtin
            .iter()
            .chain(self.custom.iter())
            .map(|entry| {
                let kind = ResourceKind::parse_optional(&entry.kind)?;
                Some(ResourceTarget::for_kind(kind, &entry.name))
            })
            .collect()
    }
}

/// Discovery with the annotation cache in front.
///
/// Falls back to full discovery whenever the cached summary is absent,
/// unparseable, or stale, then schedules the write-back.
pub async fn discover_cached(
    lister: Arc<dyn ResourceLister>,
    store: Arc<dyn AnnotationStore>,
    namespace: &str,
    root: RootKind,
    name: &str,
) -> Result<ResourceGraph> {
    let root_target = ResourceTarget::for_kind(root.as_kind(), name);

    if let Some(graph) =
        try_cached(lister.as_ref(), store.as_ref(), namespace, root, &root_target).await
    {
        tracing::debug!("Serving {}/{} from cached summary", root, name);
        return Ok(graph);
    }

    let graph = discover(lister.as_ref(), namespace, root, name).await?;

    if !graph.is_empty() {
        spawn_write_back(store, namespace.to_string(), root_target, &graph);
    }

    Ok(graph)
}

/// Rebuild a graph from the cached summary if every entry still resolves
async fn try_cached(
    lister: &dyn ResourceLister,
    store: &dyn AnnotationStore,
    namespace: &str,
    root: RootKind,
    root_target: &ResourceTarget,
) -> Option<ResourceGraph> {
    let raw = match store
        .read_annotation(namespace, root_target, GRAPH_CACHE_ANNOTATION)
        .await
    {
        Ok(value) => value?,
        Err(e) => {
            tracing::debug!("Cache annotation read failed: {:#}", e);
            return None;
        }
    };

    let summary: GraphSummary = match serde_json::from_str(&raw) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("Discarding unparseable cache summary: {}", e);
            return None;
        }
    };

    // An empty summary is never written; treat one as a miss
    if summary.builtin.is_empty() && summary.custom.is_empty() {
        return None;
    }

    let targets = summary.targets()?;
    let fetches = targets.iter().map(|target| async move {
        lister.get_resource(namespace, target).await.ok().flatten()
    });

    let (builtin_kinds, custom_kinds) = root.configured_kinds();
    let mut graph = ResourceGraph::shaped(&builtin_kinds, &custom_kinds);
    for fetched in join_all(fetches).await {
        // Any summarized resource that no longer resolves makes the whole
        // summary stale
        let resource = fetched?;
        graph.insert(resource);
    }
    Some(graph)
}

/// Best-effort, non-blocking write-back of the summary annotation
fn spawn_write_back(
    store: Arc<dyn AnnotationStore>,
    namespace: String,
    root_target: ResourceTarget,
    graph: &ResourceGraph,
) {
    let summary = GraphSummary::from_graph(graph);
    let payload = match serde_json::to_string(&summary) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Failed to serialize cache summary: {}", e);
            return;
        }
    };
    tokio::spawn(async move {
        if let Err(e) = store
            .write_annotation(&namespace, &root_target, GRAPH_CACHE_ANNOTATION, &payload)
            .await
        {
            tracing::warn!("Cache annotation write-back failed: {:#}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kind::{BuiltinKind, CustomKind};
    use crate::models::resource::K8sResource;
    use serde_json::json;

    #[test]
    fn test_summary_round_trip() {
        let mut graph =
            ResourceGraph::shaped(&[BuiltinKind::Ingress], &[CustomKind::Devbox]);
        graph.insert(K8sResource(
            json!({"kind": "Ingress", "metadata": {"name": "ing-1"}}),
        ));
        graph.insert(K8sResource(
            json!({"kind": "Devbox", "metadata": {"name": "db-1"}}),
        ));

        let summary = GraphSummary::from_graph(&graph);
        assert_eq!(summary.builtin.len(), 1);
        assert_eq!(summary.custom.len(), 1);

        let raw = serde_json::to_string(&summary).unwrap();
        let back: GraphSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.builtin, summary.builtin);
        assert_eq!(back.custom, summary.custom);
    }

    #[test]
    fn test_targets_reject_unknown_kind() {
        let summary = GraphSummary {
            builtin: vec![InventoryEntry {
                kind: "widget".into(),
                name: "w-1".into(),
            }],
            custom: vec![],
            synced_at: Utc::now(),
        };
        assert!(summary.targets().is_none());
    }
}
