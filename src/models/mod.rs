//! Data model for the graph pipeline

pub mod fieldpath;
pub mod kind;
pub mod labels;
pub mod resource;
pub mod target;

pub use kind::{BuiltinKind, CustomKind, ResourceKind};
pub use resource::K8sResource;
pub use target::ResourceTarget;
