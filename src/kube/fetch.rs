//! Dynamic resource fetching
//!
//! Builds `ApiResource` coordinates from the kind registry and provides
//! get/list helpers over `Api<DynamicObject>`. Everything comes back as a
//! validated `K8sResource` document.

use anyhow::{Context, Result};
use kube::api::ListParams;
use kube::core::{ApiResource, DynamicObject};
use kube::{Api, Client};

use crate::models::kind::ResourceKind;
use crate::models::resource::K8sResource;
use crate::models::target::ResourceTarget;

/// ApiResource coordinates for a registry kind
pub fn api_resource_for(kind: ResourceKind) -> ApiResource {
    match kind {
        ResourceKind::Builtin(builtin) => {
            let api_version = builtin.api_version();
            let (group, version) = match api_version.split_once('/') {
                Some((group, version)) => (group, version),
                None => ("", api_version),
            };
            ApiResource {
                group: group.to_string(),
                version: version.to_string(),
                api_version: api_version.to_string(),
                kind: builtin.as_str().to_string(),
                plural: builtin.plural().to_string(),
            }
        }
        ResourceKind::Custom(custom) => ApiResource {
            group: custom.group().to_string(),
            version: custom.version().to_string(),
            api_version: format!("{}/{}", custom.group(), custom.version()),
            kind: custom.as_str().to_string(),
            plural: custom.plural().to_string(),
        },
    }
}

/// ApiResource coordinates for an addressing target
pub fn api_resource_for_target(target: &ResourceTarget) -> ApiResource {
    match target {
        ResourceTarget::Builtin { resource_type, .. } => {
            api_resource_for(ResourceKind::Builtin(*resource_type))
        }
        ResourceTarget::Custom {
            group,
            version,
            plural,
            ..
        } => ApiResource {
            group: group.clone(),
            version: version.clone(),
            api_version: format!("{}/{}", group, version),
            // Kind is not needed for URL construction; recover it from the
            // registry when the plural is known
            kind: target
                .kind()
                .map(|k| k.as_str().to_string())
                .unwrap_or_else(|| plural.clone()),
            plural: plural.clone(),
        },
    }
}

/// List resources of one kind matching a label selector
pub async fn list_with_selector(
    client: &Client,
    namespace: &str,
    kind: ResourceKind,
    selector: &str,
) -> Result<Vec<K8sResource>> {
    let api_resource = api_resource_for(kind);
    let api: Api<DynamicObject> = Api::namespaced_with(client.clone(), namespace, &api_resource);
    let list = api
        .list(&ListParams::default().labels(selector))
        .await
        .with_context(|| format!("Failed to list {} with {}", kind, selector))?;

    Ok(list
        .items
        .into_iter()
        .filter_map(|obj| to_resource(&obj))
        .collect())
}

/// Fetch one resource by name; Ok(None) for 404
pub async fn get_named(
    client: &Client,
    namespace: &str,
    api_resource: &ApiResource,
    name: &str,
) -> Result<Option<K8sResource>> {
    let api: Api<DynamicObject> = Api::namespaced_with(client.clone(), namespace, api_resource);
    match api.get(name).await {
        Ok(obj) => Ok(to_resource(&obj)),
        Err(kube::Error::Api(err)) if err.code == 404 => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to fetch {}", name)),
    }
}

/// Serialize a dynamic object into a validated document
fn to_resource(obj: &DynamicObject) -> Option<K8sResource> {
    let value = match serde_json::to_value(obj) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to serialize object: {}", e);
            return None;
        }
    };
    let resource = K8sResource::try_new(value);
    if resource.is_none() {
        tracing::debug!("Excluding schema-invalid object from results");
    }
    resource
}
