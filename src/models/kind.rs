//! Resource kind registry
//!
//! Central enums for every Kubernetes kind the graph pipeline understands.
//! This eliminates hardcoded strings throughout the codebase and provides
//! type safety for kind references. Builtin kinds are native Kubernetes
//! kinds; custom kinds are the platform CRDs.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Native Kubernetes kinds the pipeline discovers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinKind {
    Deployment,
    StatefulSet,
    Service,
    Ingress,
    Secret,
    Pod,
    ConfigMap,
    PersistentVolumeClaim,
    CronJob,
}

impl BuiltinKind {
    /// Get the Kubernetes kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment => "Deployment",
            BuiltinKind::StatefulSet => "StatefulSet",
            BuiltinKind::Service => "Service",
            BuiltinKind::Ingress => "Ingress",
            BuiltinKind::Secret => "Secret",
            BuiltinKind::Pod => "Pod",
            BuiltinKind::ConfigMap => "ConfigMap",
            BuiltinKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            BuiltinKind::CronJob => "CronJob",
        }
    }

    /// Map key used in graph output ("pvc" for PersistentVolumeClaim,
    /// lowercase kind name otherwise)
    pub fn key(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment => "deployment",
            BuiltinKind::StatefulSet => "statefulset",
            BuiltinKind::Service => "service",
            BuiltinKind::Ingress => "ingress",
            BuiltinKind::Secret => "secret",
            BuiltinKind::Pod => "pod",
            BuiltinKind::ConfigMap => "configmap",
            BuiltinKind::PersistentVolumeClaim => "pvc",
            BuiltinKind::CronJob => "cronjob",
        }
    }

    /// apiVersion for this kind
    pub fn api_version(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment | BuiltinKind::StatefulSet => "apps/v1",
            BuiltinKind::Ingress => "networking.k8s.io/v1",
            BuiltinKind::CronJob => "batch/v1",
            _ => "v1",
        }
    }

    /// Plural resource name for API paths
    pub fn plural(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment => "deployments",
            BuiltinKind::StatefulSet => "statefulsets",
            BuiltinKind::Service => "services",
            BuiltinKind::Ingress => "ingresses",
            BuiltinKind::Secret => "secrets",
            BuiltinKind::Pod => "pods",
            BuiltinKind::ConfigMap => "configmaps",
            BuiltinKind::PersistentVolumeClaim => "persistentvolumeclaims",
            BuiltinKind::CronJob => "cronjobs",
        }
    }

    /// All builtin kinds
    pub fn all() -> &'static [Self] {
        &[
            BuiltinKind::Deployment,
            BuiltinKind::StatefulSet,
            BuiltinKind::Service,
            BuiltinKind::Ingress,
            BuiltinKind::Secret,
            BuiltinKind::Pod,
            BuiltinKind::ConfigMap,
            BuiltinKind::PersistentVolumeClaim,
            BuiltinKind::CronJob,
        ]
    }

    /// Try to parse a kind name or map key, returning None if unknown
    pub fn parse_optional(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .find(|k| k.as_str() == s || k.key() == s)
            .copied()
    }
}

/// Platform CRD kinds the pipeline discovers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CustomKind {
    Devbox,
    Cluster,
    ObjectStorageBucket,
    Instance,
    Backup,
    Certificate,
    Issuer,
}

impl CustomKind {
    /// Get the Kubernetes kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomKind::Devbox => "Devbox",
            CustomKind::Cluster => "Cluster",
            CustomKind::ObjectStorageBucket => "ObjectStorageBucket",
            CustomKind::Instance => "Instance",
            CustomKind::Backup => "Backup",
            CustomKind::Certificate => "Certificate",
            CustomKind::Issuer => "Issuer",
        }
    }

    /// Map key used in graph output (lowercase kind name)
    pub fn key(&self) -> &'static str {
        match self {
            CustomKind::Devbox => "devbox",
            CustomKind::Cluster => "cluster",
            CustomKind::ObjectStorageBucket => "objectstoragebucket",
            CustomKind::Instance => "instance",
            CustomKind::Backup => "backup",
            CustomKind::Certificate => "certificate",
            CustomKind::Issuer => "issuer",
        }
    }

    /// API group of the CRD
    pub fn group(&self) -> &'static str {
        match self {
            CustomKind::Devbox => "devbox.devpad.io",
            CustomKind::Cluster => "apps.kubeblocks.io",
            CustomKind::ObjectStorageBucket => "objectstorage.devpad.io",
            CustomKind::Instance => "app.devpad.io",
            CustomKind::Backup => "dataprotection.kubeblocks.io",
            CustomKind::Certificate | CustomKind::Issuer => "cert-manager.io",
        }
    }

    /// API version of the CRD
    pub fn version(&self) -> &'static str {
        match self {
            CustomKind::Devbox | CustomKind::Cluster | CustomKind::Backup => "v1alpha1",
            _ => "v1",
        }
    }

    /// Plural resource name for API paths
    pub fn plural(&self) -> &'static str {
        match self {
            CustomKind::Devbox => "devboxes",
            CustomKind::Cluster => "clusters",
            CustomKind::ObjectStorageBucket => "objectstoragebuckets",
            CustomKind::Instance => "instances",
            CustomKind::Backup => "backups",
            CustomKind::Certificate => "certificates",
            CustomKind::Issuer => "issuers",
        }
    }

    /// All custom kinds
    pub fn all() -> &'static [Self] {
        &[
            CustomKind::Devbox,
            CustomKind::Cluster,
            CustomKind::ObjectStorageBucket,
            CustomKind::Instance,
            CustomKind::Backup,
            CustomKind::Certificate,
            CustomKind::Issuer,
        ]
    }

    /// Try to parse a kind name or map key, returning None if unknown
    pub fn parse_optional(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .find(|k| k.as_str() == s || k.key() == s)
            .copied()
    }
}

/// Any kind the pipeline understands, builtin or custom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Custom(CustomKind),
    Builtin(BuiltinKind),
}

impl ResourceKind {
    /// Get the Kubernetes kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Builtin(k) => k.as_str(),
            ResourceKind::Custom(k) => k.as_str(),
        }
    }

    /// Map key used in graph output
    pub fn key(&self) -> &'static str {
        match self {
            ResourceKind::Builtin(k) => k.key(),
            ResourceKind::Custom(k) => k.key(),
        }
    }

    /// Try to parse a kind name or map key, checking custom kinds first
    pub fn parse_optional(s: &str) -> Option<Self> {
        CustomKind::parse_optional(s)
            .map(ResourceKind::Custom)
            .or_else(|| BuiltinKind::parse_optional(s).map(ResourceKind::Builtin))
    }
}

impl From<BuiltinKind> for ResourceKind {
    fn from(kind: BuiltinKind) -> Self {
        ResourceKind::Builtin(kind)
    }
}

impl From<CustomKind> for ResourceKind {
    fn from(kind: CustomKind) -> Self {
        ResourceKind::Custom(kind)
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_optional(s).ok_or_else(|| format!("Unknown resource kind: {}", s))
    }
}

// Kinds serialize as their map key so graph maps keyed by kind come out as
// plain string-keyed JSON objects.

impl Serialize for BuiltinKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for BuiltinKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BuiltinKind::parse_optional(&s)
            .ok_or_else(|| D::Error::custom(format!("unknown builtin kind: {}", s)))
    }
}

impl Serialize for CustomKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for CustomKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CustomKind::parse_optional(&s)
            .ok_or_else(|| D::Error::custom(format!("unknown custom kind: {}", s)))
    }
}

impl Serialize for ResourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for ResourceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ResourceKind::parse_optional(&s)
            .ok_or_else(|| D::Error::custom(format!("unknown resource kind: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(BuiltinKind::Deployment.as_str(), "Deployment");
        assert_eq!(
            BuiltinKind::PersistentVolumeClaim.as_str(),
            "PersistentVolumeClaim"
        );
        assert_eq!(CustomKind::Devbox.as_str(), "Devbox");
    }

    #[test]
    fn test_key() {
        assert_eq!(BuiltinKind::PersistentVolumeClaim.key(), "pvc");
        assert_eq!(BuiltinKind::StatefulSet.key(), "statefulset");
        assert_eq!(CustomKind::ObjectStorageBucket.key(), "objectstoragebucket");
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(
            BuiltinKind::parse_optional("Deployment"),
            Some(BuiltinKind::Deployment)
        );
        assert_eq!(
            BuiltinKind::parse_optional("pvc"),
            Some(BuiltinKind::PersistentVolumeClaim)
        );
        assert_eq!(BuiltinKind::parse_optional("Unknown"), None);
        assert_eq!(
            ResourceKind::parse_optional("devbox"),
            Some(ResourceKind::Custom(CustomKind::Devbox))
        );
        assert_eq!(
            ResourceKind::parse_optional("Ingress"),
            Some(ResourceKind::Builtin(BuiltinKind::Ingress))
        );
    }

    #[test]
    fn test_api_coordinates() {
        assert_eq!(BuiltinKind::Ingress.api_version(), "networking.k8s.io/v1");
        assert_eq!(BuiltinKind::Secret.api_version(), "v1");
        assert_eq!(CustomKind::Cluster.group(), "apps.kubeblocks.io");
        assert_eq!(CustomKind::Certificate.group(), "cert-manager.io");
        assert_eq!(CustomKind::Devbox.plural(), "devboxes");
    }

    #[test]
    fn test_serialize_as_key() {
        let json = serde_json::to_string(&ResourceKind::Builtin(
            BuiltinKind::PersistentVolumeClaim,
        ))
        .unwrap();
        assert_eq!(json, "\"pvc\"");
        let back: ResourceKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ResourceKind::Builtin(BuiltinKind::PersistentVolumeClaim));
    }
}
