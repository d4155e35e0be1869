//! devgraph
//!
//! Resource relationship discovery, connection inference, and graph layout
//! for DevBox platform workspaces. The library is the core behind the
//! dashboard's topology canvas; the binary is a thin CLI over it.

pub mod cli;
pub mod config;
pub mod connections;
pub mod discovery;
pub mod kube;
pub mod layout;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use connections::{Connection, ConnectionGraph, TrafficSource, infer_connections};
pub use discovery::{ResourceGraph, ResourceLister, RootKind, discover, discover_cached};
pub use layout::{Direction, FlowEdge, FlowNode, LayoutOptions, layout};
pub use models::{BuiltinKind, CustomKind, K8sResource, ResourceKind, ResourceTarget};
pub use services::GraphService;
