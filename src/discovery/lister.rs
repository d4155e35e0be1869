//! Resource listing collaborator
//!
//! Discovery talks to the cluster through this seam so the resolver can be
//! exercised against mocks and alternative backends.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::models::kind::{BuiltinKind, CustomKind};
use crate::models::resource::K8sResource;
use crate::models::target::ResourceTarget;

/// One label-selector query's results, grouped per concrete kind
#[derive(Debug, Clone, Default)]
pub struct ListedResources {
    pub builtin: BTreeMap<BuiltinKind, Vec<K8sResource>>,
    pub custom: BTreeMap<CustomKind, Vec<K8sResource>>,
}

impl ListedResources {
    /// Flatten into a single list, builtin then custom
    pub fn into_resources(self) -> Vec<K8sResource> {
        self.builtin
            .into_values()
            .flatten()
            .chain(self.custom.into_values().flatten())
            .collect()
    }
}

/// Server-side resource queries used by discovery
#[async_trait]
pub trait ResourceLister: Send + Sync {
    /// List resources of the given kinds matching a label selector
    async fn list_resources(
        &self,
        namespace: &str,
        selector: &str,
        builtin: &[BuiltinKind],
        custom: &[CustomKind],
    ) -> Result<ListedResources>;

    /// Fetch resources of any registry kind carrying this exact name
    async fn get_by_exact_name(&self, namespace: &str, name: &str) -> Result<Vec<K8sResource>>;

    /// Fetch one specific resource; Ok(None) when it does not exist
    async fn get_resource(
        &self,
        namespace: &str,
        target: &ResourceTarget,
    ) -> Result<Option<K8sResource>>;
}

/// Annotation read/write on a specific resource, used by the discovery cache
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    async fn read_annotation(
        &self,
        namespace: &str,
        target: &ResourceTarget,
        key: &str,
    ) -> Result<Option<String>>;

    async fn write_annotation(
        &self,
        namespace: &str,
        target: &ResourceTarget,
        key: &str,
        value: &str,
    ) -> Result<()>;
}
