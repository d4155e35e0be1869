//! Connection inference
//!
//! Computes directed "connects-from" edges between discovered resources
//! from three independent signals: manager labels, container env
//! references, and network-traffic telemetry. Strategy results share one
//! output shape and merge by union; a final pass reconciles the workload
//! kind ambiguity telemetry introduces.

pub mod correction;
pub mod env_refs;
pub mod graph;
pub mod labels;
pub mod traffic;

pub use correction::reconcile_workload_kinds;
pub use env_refs::infer_from_env;
pub use graph::{Connection, ConnectionGraph};
pub use labels::infer_from_labels;
pub use traffic::{
    ResourceTraffic, TrafficReport, TrafficResource, TrafficSource, TrafficType,
    infer_from_traffic,
};

use crate::discovery::graph::ResourceGraph;

/// Run all available strategies over a discovered set and merge the results.
///
/// Telemetry is optional; when absent, label and env inference still run.
pub async fn infer_connections(
    graph: &ResourceGraph,
    namespace: &str,
    traffic_source: Option<&dyn TrafficSource>,
) -> ConnectionGraph {
    let mut connections = infer_from_labels(graph);
    connections.merge(infer_from_env(graph));
    if let Some(source) = traffic_source {
        connections.merge(infer_from_traffic(graph, namespace, source).await);
    }
    reconcile_workload_kinds(&mut connections, graph);
    connections
}
