//! Semi-structured Kubernetes resource documents
//!
//! Resources flow through the pipeline as JSON documents; only specific
//! paths are read. A document that lacks `kind` or `metadata.name` fails
//! validation and is excluded from results rather than failing discovery.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::kind::ResourceKind;

/// A Kubernetes object as an opaque JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct K8sResource(pub Value);

impl K8sResource {
    /// Wrap a document, validating the fields every consumer relies on.
    /// Returns None for schema-invalid items.
    pub fn try_new(value: Value) -> Option<Self> {
        let resource = Self(value);
        if resource.kind_str().is_none() || resource.name().is_none() {
            return None;
        }
        Some(resource)
    }

    /// `kind` as written in the document
    pub fn kind_str(&self) -> Option<&str> {
        self.0.get("kind").and_then(|k| k.as_str())
    }

    /// `kind` resolved against the kind registry
    pub fn kind(&self) -> Option<ResourceKind> {
        self.kind_str().and_then(ResourceKind::parse_optional)
    }

    /// `metadata.name`
    pub fn name(&self) -> Option<&str> {
        self.metadata_field("name")
    }

    /// `metadata.namespace`
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_field("namespace")
    }

    /// Look up a label value
    pub fn label(&self, key: &str) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(|m| m.get("labels"))
            .and_then(|l| l.get(key))
            .and_then(|v| v.as_str())
    }

    /// Look up an annotation value
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(|m| m.get("annotations"))
            .and_then(|a| a.get(key))
            .and_then(|v| v.as_str())
    }

    /// `spec` subtree
    pub fn spec(&self) -> Option<&Value> {
        self.0.get("spec")
    }

    /// `status` subtree
    pub fn status(&self) -> Option<&Value> {
        self.0.get("status")
    }

    /// Dedup key: `(kind, name)`
    pub fn identity(&self) -> Option<(ResourceKind, String)> {
        Some((self.kind()?, self.name()?.to_string()))
    }

    fn metadata_field(&self, field: &str) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(|m| m.get(field))
            .and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kind::BuiltinKind;
    use serde_json::json;

    #[test]
    fn test_try_new_validates_shape() {
        assert!(K8sResource::try_new(json!({"kind": "Pod"})).is_none());
        assert!(K8sResource::try_new(json!({"metadata": {"name": "x"}})).is_none());
        assert!(
            K8sResource::try_new(json!({"kind": "Pod", "metadata": {"name": "x"}})).is_some()
        );
    }

    #[test]
    fn test_accessors() {
        let r = K8sResource(json!({
            "kind": "Deployment",
            "metadata": {
                "name": "web",
                "namespace": "ns-1",
                "labels": {"app.kubernetes.io/name": "web"},
                "annotations": {"note": "hi"}
            },
            "spec": {"replicas": 2}
        }));
        assert_eq!(r.kind(), Some(ResourceKind::Builtin(BuiltinKind::Deployment)));
        assert_eq!(r.name(), Some("web"));
        assert_eq!(r.namespace(), Some("ns-1"));
        assert_eq!(r.label("app.kubernetes.io/name"), Some("web"));
        assert_eq!(r.annotation("note"), Some("hi"));
        assert_eq!(r.spec().unwrap()["replicas"], json!(2));
        assert!(r.status().is_none());
    }
}
