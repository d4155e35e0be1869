//! Kube-backed collaborator implementations
//!
//! `KubeLister` answers discovery's listing queries with real API calls and
//! doubles as the annotation store for the discovery cache. Per-kind
//! failures degrade to empty results so one broken API group cannot take
//! down a whole discovery.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use kube::api::{Patch, PatchParams};
use kube::core::DynamicObject;
use kube::{Api, Client};

use crate::discovery::lister::{AnnotationStore, ListedResources, ResourceLister};
use crate::kube::fetch::{api_resource_for, api_resource_for_target, get_named, list_with_selector};
use crate::models::kind::{BuiltinKind, CustomKind, ResourceKind};
use crate::models::resource::K8sResource;
use crate::models::target::ResourceTarget;

/// Resource lister backed by a kube client
#[derive(Clone)]
pub struct KubeLister {
    client: Client,
}

impl KubeLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying Kubernetes client
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn list_kind(
        &self,
        namespace: &str,
        kind: ResourceKind,
        selector: &str,
    ) -> Vec<K8sResource> {
        match list_with_selector(&self.client, namespace, kind, selector).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Listing {} failed: {:#}", kind, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ResourceLister for KubeLister {
    async fn list_resources(
        &self,
        namespace: &str,
        selector: &str,
        builtin: &[BuiltinKind],
        custom: &[CustomKind],
    ) -> Result<ListedResources> {
        let builtin_queries = builtin.iter().map(|kind| async move {
            (
                *kind,
                self.list_kind(namespace, ResourceKind::Builtin(*kind), selector)
                    .await,
            )
        });
        let custom_queries = custom.iter().map(|kind| async move {
            (
                *kind,
                self.list_kind(namespace, ResourceKind::Custom(*kind), selector)
                    .await,
            )
        });

        let (builtin_results, custom_results) =
            futures::join!(join_all(builtin_queries), join_all(custom_queries));

        let mut listed = ListedResources::default();
        for (kind, items) in builtin_results {
            listed.builtin.insert(kind, items);
        }
        for (kind, items) in custom_results {
            listed.custom.insert(kind, items);
        }
        Ok(listed)
    }

    async fn get_by_exact_name(&self, namespace: &str, name: &str) -> Result<Vec<K8sResource>> {
        let lookups = BuiltinKind::all()
            .iter()
            .map(|k| ResourceKind::Builtin(*k))
            .chain(CustomKind::all().iter().map(|k| ResourceKind::Custom(*k)))
            .map(|kind| async move {
                let api_resource = api_resource_for(kind);
                match get_named(&self.client, namespace, &api_resource, name).await {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!("Exact-name fetch of {} {} failed: {:#}", kind, name, e);
                        None
                    }
                }
            });

        Ok(join_all(lookups).await.into_iter().flatten().collect())
    }

    async fn get_resource(
        &self,
        namespace: &str,
        target: &ResourceTarget,
    ) -> Result<Option<K8sResource>> {
        let api_resource = api_resource_for_target(target);
        get_named(&self.client, namespace, &api_resource, target.name()).await
    }
}

#[async_trait]
impl AnnotationStore for KubeLister {
    async fn read_annotation(
        &self,
        namespace: &str,
        target: &ResourceTarget,
        key: &str,
    ) -> Result<Option<String>> {
        let resource = self.get_resource(namespace, target).await?;
        Ok(resource.and_then(|r| r.annotation(key).map(str::to_string)))
    }

    async fn write_annotation(
        &self,
        namespace: &str,
        target: &ResourceTarget,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let api_resource = api_resource_for_target(target);
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &api_resource);
        let patch = serde_json::json!({
            "metadata": {
                "annotations": { key: value }
            }
        });
        api.patch(
            target.name(),
            &PatchParams::default(),
            &Patch::Merge(&patch),
        )
        .await
        .with_context(|| format!("Failed to annotate {}", target.name()))?;
        Ok(())
    }
}
