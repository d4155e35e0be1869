//! Graph service
//!
//! Fronts the whole pipeline for callers that own a cluster connection:
//! discovery (with the annotation cache), connection inference, and layout
//! into render-ready nodes.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::connections::{ConnectionGraph, TrafficSource, infer_connections};
use crate::discovery::{
    AnnotationStore, ResourceGraph, ResourceLister, RootKind, discover, discover_cached,
};
use crate::kube::KubeLister;
use crate::layout::{FlowEdge, FlowNode, LayoutOptions, Position, layout};

/// Service wiring discovery, inference and layout together
pub struct GraphService {
    lister: Arc<dyn ResourceLister>,
    annotations: Option<Arc<dyn AnnotationStore>>,
    traffic: Option<Arc<dyn TrafficSource>>,
    namespace: String,
}

impl GraphService {
    /// Kube-backed service with the annotation cache enabled
    pub fn new(client: kube::Client, namespace: impl Into<String>) -> Self {
        let lister = Arc::new(KubeLister::new(client));
        Self {
            annotations: Some(lister.clone()),
            lister,
            traffic: None,
            namespace: namespace.into(),
        }
    }

    /// Service over explicit collaborators (tests, alternative backends)
    pub fn from_parts(
        lister: Arc<dyn ResourceLister>,
        annotations: Option<Arc<dyn AnnotationStore>>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            lister,
            annotations,
            traffic: None,
            namespace: namespace.into(),
        }
    }

    /// Attach a traffic telemetry backend
    pub fn with_traffic(mut self, traffic: Arc<dyn TrafficSource>) -> Self {
        self.traffic = Some(traffic);
        self
    }

    /// Disable the annotation cache
    pub fn without_cache(mut self) -> Self {
        self.annotations = None;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Discover the resource set belonging to a root
    pub async fn discover(&self, root: RootKind, name: &str) -> Result<ResourceGraph> {
        match &self.annotations {
            Some(store) => discover_cached(
                self.lister.clone(),
                store.clone(),
                &self.namespace,
                root,
                name,
            )
            .await
            .context("Failed to discover resources"),
            None => discover(self.lister.as_ref(), &self.namespace, root, name)
                .await
                .context("Failed to discover resources"),
        }
    }

    /// Infer connections over a discovered set
    pub async fn connections(&self, graph: &ResourceGraph) -> ConnectionGraph {
        infer_connections(graph, &self.namespace, self.traffic.as_deref()).await
    }

    /// Lay the discovered set out as positioned nodes
    pub fn flow_graph(
        &self,
        graph: &ResourceGraph,
        connections: &ConnectionGraph,
        options: &LayoutOptions,
    ) -> Vec<FlowNode> {
        let nodes = flow_nodes(graph);
        let edges = flow_edges(graph, connections);
        layout(&nodes, &edges, options)
    }
}

/// Node id shared by nodes and edges: `kind-key:name`
pub fn node_id(kind_key: &str, name: &str) -> String {
    format!("{}:{}", kind_key, name)
}

/// Unpositioned nodes for every discovered resource
pub fn flow_nodes(graph: &ResourceGraph) -> Vec<FlowNode> {
    graph
        .iter()
        .filter_map(|resource| {
            let (kind, name) = resource.identity()?;
            Some(FlowNode {
                id: node_id(kind.key(), &name),
                node_type: kind.key().to_string(),
                position: Position::default(),
                data: serde_json::json!({
                    "kind": kind.as_str(),
                    "name": name,
                    "namespace": resource.namespace(),
                }),
            })
        })
        .collect()
}

/// Edges between discovered resources.
///
/// External (cross-namespace) references have no node in the graph and are
/// not rendered as edges.
pub fn flow_edges(graph: &ResourceGraph, connections: &ConnectionGraph) -> Vec<FlowEdge> {
    let mut edges = Vec::new();
    for (target_kind, entries) in &connections.targets {
        for (target_name, connection) in entries {
            if !graph.contains(*target_kind, target_name) {
                continue;
            }
            for (source_kind, names) in &connection.connect_from {
                for source_name in names {
                    if !graph.contains(*source_kind, source_name) {
                        continue;
                    }
                    edges.push(FlowEdge {
                        source: node_id(source_kind.key(), source_name),
                        target: node_id(target_kind.key(), target_name),
                    });
                }
            }
        }
    }
    edges
}
