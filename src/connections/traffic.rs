//! Traffic-telemetry connection inference
//!
//! An external telemetry service reports observed network flows per
//! resource as `namespace/type/name` strings. Flows inside the current
//! namespace become `connectFrom` edges; flows from elsewhere are recorded
//! under `external` and may reference resources outside the discovered set.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::connections::graph::ConnectionGraph;
use crate::discovery::graph::ResourceGraph;
use crate::models::kind::{BuiltinKind, CustomKind, ResourceKind};

/// Logical resource classes the telemetry service distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficType {
    Devbox,
    Database,
    Oss,
    App,
}

impl TrafficType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficType::Devbox => "devbox",
            TrafficType::Database => "database",
            TrafficType::Oss => "oss",
            TrafficType::App => "app",
        }
    }

    pub fn parse_optional(s: &str) -> Option<Self> {
        match s {
            "devbox" => Some(TrafficType::Devbox),
            "database" => Some(TrafficType::Database),
            "oss" => Some(TrafficType::Oss),
            "app" => Some(TrafficType::App),
            _ => None,
        }
    }

    /// Traffic class of a registry kind, for kinds telemetry knows about
    pub fn for_kind(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::Custom(CustomKind::Devbox) => Some(TrafficType::Devbox),
            ResourceKind::Custom(CustomKind::Cluster) => Some(TrafficType::Database),
            ResourceKind::Custom(CustomKind::ObjectStorageBucket) => Some(TrafficType::Oss),
            ResourceKind::Builtin(BuiltinKind::Deployment)
            | ResourceKind::Builtin(BuiltinKind::StatefulSet) => Some(TrafficType::App),
            _ => None,
        }
    }

    /// Registry kind a traffic class maps back to.
    ///
    /// `app` cannot distinguish Deployment from StatefulSet; it buckets
    /// under statefulset and the correction pass moves names that only match
    /// a known Deployment.
    pub fn kind(&self) -> ResourceKind {
        match self {
            TrafficType::Devbox => ResourceKind::Custom(CustomKind::Devbox),
            TrafficType::Database => ResourceKind::Custom(CustomKind::Cluster),
            TrafficType::Oss => ResourceKind::Custom(CustomKind::ObjectStorageBucket),
            TrafficType::App => ResourceKind::Builtin(BuiltinKind::StatefulSet),
        }
    }
}

/// One resource as the telemetry service addresses it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficResource {
    pub name: String,
    #[serde(rename = "type")]
    pub traffic_type: TrafficType,
}

/// Observed flows into one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTraffic {
    pub resource: TrafficResource,
    pub flows: Vec<String>,
}

/// The telemetry service's answer for one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    pub data: Vec<ResourceTraffic>,
}

/// Telemetry collaborator
#[async_trait]
pub trait TrafficSource: Send + Sync {
    async fn get_traffic(
        &self,
        namespace: &str,
        resources: &[TrafficResource],
    ) -> Result<TrafficReport>;
}

/// Infer edges from observed traffic.
///
/// Telemetry unavailability degrades this strategy to an empty
/// contribution; it never fails the overall inference.
pub async fn infer_from_traffic(
    graph: &ResourceGraph,
    namespace: &str,
    source: &dyn TrafficSource,
) -> ConnectionGraph {
    let resources: Vec<TrafficResource> = graph
        .iter()
        .filter_map(|r| {
            let (kind, name) = r.identity()?;
            Some(TrafficResource {
                name,
                traffic_type: TrafficType::for_kind(kind)?,
            })
        })
        .collect();

    if resources.is_empty() {
        return ConnectionGraph::default();
    }

    let report = match source.get_traffic(namespace, &resources).await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Traffic telemetry unavailable: {:#}", e);
            return ConnectionGraph::default();
        }
    };

    let mut connections = ConnectionGraph::default();
    for entry in report.data {
        let target_kind = target_kind_of(graph, &entry.resource);
        for flow in &entry.flows {
            let Some((flow_ns, flow_kind, flow_name)) = parse_flow(flow) else {
                tracing::debug!("Skipping malformed traffic flow {:?}", flow);
                continue;
            };
            if flow_ns == namespace {
                connections.add_connect_from(
                    target_kind,
                    &entry.resource.name,
                    flow_kind,
                    flow_name,
                );
            } else {
                connections.add_external(
                    target_kind,
                    &entry.resource.name,
                    flow_ns,
                    flow_kind,
                    flow_name,
                );
            }
        }
    }
    connections
}

/// Resolve the concrete target kind of a reported resource. The discovered
/// set disambiguates `app` targets; everything else follows the class table.
fn target_kind_of(graph: &ResourceGraph, resource: &TrafficResource) -> ResourceKind {
    if resource.traffic_type == TrafficType::App {
        let deployment = ResourceKind::Builtin(BuiltinKind::Deployment);
        if graph.contains(deployment, &resource.name) {
            return deployment;
        }
    }
    resource.traffic_type.kind()
}

/// Split a `namespace/type/name` flow string
fn parse_flow(flow: &str) -> Option<(&str, ResourceKind, &str)> {
    let mut parts = flow.splitn(3, '/');
    let namespace = parts.next().filter(|s| !s.is_empty())?;
    let traffic_type = TrafficType::parse_optional(parts.next()?)?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    Some((namespace, traffic_type.kind(), name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flow() {
        let (ns, kind, name) = parse_flow("ns-1/database/pg-1").unwrap();
        assert_eq!(ns, "ns-1");
        assert_eq!(kind, ResourceKind::Custom(CustomKind::Cluster));
        assert_eq!(name, "pg-1");
    }

    #[test]
    fn test_parse_flow_rejects_malformed() {
        assert!(parse_flow("").is_none());
        assert!(parse_flow("ns-1/database").is_none());
        assert!(parse_flow("ns-1/widget/x").is_none());
        assert!(parse_flow("/database/pg-1").is_none());
        assert!(parse_flow("ns-1/database/").is_none());
    }

    #[test]
    fn test_app_flows_bucket_under_statefulset() {
        let (_, kind, _) = parse_flow("ns-1/app/web").unwrap();
        assert_eq!(kind, ResourceKind::Builtin(BuiltinKind::StatefulSet));
    }
}
