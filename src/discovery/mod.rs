//! Resource discovery
//!
//! Given a root resource, finds the full transitive set of Kubernetes
//! objects that belong to it: concurrent label-selector fan-out, exact-name
//! lookups, breadth-first recursion into child workspaces, and dedup into a
//! fixed-shape snapshot. An optional annotation cache can short-circuit
//! repeat discoveries.

pub mod cache;
pub mod graph;
pub mod lister;
pub mod resolver;
pub mod rules;

pub use cache::{GraphSummary, discover_cached};
pub use graph::{InventoryEntry, ResourceGraph};
pub use lister::{AnnotationStore, ListedResources, ResourceLister};
pub use resolver::discover;
pub use rules::{DiscoveryRule, RootKind};
