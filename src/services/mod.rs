//! Service layer

pub mod graph_service;

pub use graph_service::{GraphService, flow_edges, flow_nodes};
