//! Resource addressing
//!
//! A `ResourceTarget` is enough to re-fetch (or hand to a mutation
//! collaborator) one specific resource without carrying the whole document.

use serde::{Deserialize, Serialize};

use crate::models::kind::{BuiltinKind, CustomKind, ResourceKind};

/// Addressing value for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResourceTarget {
    /// CRD-backed resource, addressed by full GVR
    #[serde(rename_all = "camelCase")]
    Custom {
        group: String,
        version: String,
        plural: String,
        name: String,
    },
    /// Native resource, addressed by registry kind
    #[serde(rename_all = "camelCase")]
    Builtin {
        resource_type: BuiltinKind,
        name: String,
    },
}

impl ResourceTarget {
    /// Build the target for a registry kind + name
    pub fn for_kind(kind: ResourceKind, name: &str) -> Self {
        match kind {
            ResourceKind::Builtin(builtin) => ResourceTarget::Builtin {
                resource_type: builtin,
                name: name.to_string(),
            },
            ResourceKind::Custom(custom) => ResourceTarget::custom(custom, name),
        }
    }

    /// Build the target for a custom kind + name
    pub fn custom(kind: CustomKind, name: &str) -> Self {
        ResourceTarget::Custom {
            group: kind.group().to_string(),
            version: kind.version().to_string(),
            plural: kind.plural().to_string(),
            name: name.to_string(),
        }
    }

    /// The addressed resource's name
    pub fn name(&self) -> &str {
        match self {
            ResourceTarget::Custom { name, .. } => name,
            ResourceTarget::Builtin { name, .. } => name,
        }
    }

    /// The registry kind, if the target maps back onto one
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            ResourceTarget::Builtin { resource_type, .. } => {
                Some(ResourceKind::Builtin(*resource_type))
            }
            ResourceTarget::Custom { plural, .. } => CustomKind::all()
                .iter()
                .find(|k| k.plural() == plural)
                .copied()
                .map(ResourceKind::Custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_kind_builtin() {
        let target = ResourceTarget::for_kind(
            ResourceKind::Builtin(BuiltinKind::Ingress),
            "ing-1",
        );
        assert_eq!(target.name(), "ing-1");
        assert_eq!(target.kind(), Some(ResourceKind::Builtin(BuiltinKind::Ingress)));
    }

    #[test]
    fn test_for_kind_custom_carries_gvr() {
        let target = ResourceTarget::for_kind(ResourceKind::Custom(CustomKind::Devbox), "db-1");
        match &target {
            ResourceTarget::Custom {
                group,
                version,
                plural,
                name,
            } => {
                assert_eq!(group, "devbox.devpad.io");
                assert_eq!(version, "v1alpha1");
                assert_eq!(plural, "devboxes");
                assert_eq!(name, "db-1");
            }
            _ => panic!("expected custom target"),
        }
        assert_eq!(target.kind(), Some(ResourceKind::Custom(CustomKind::Devbox)));
    }
}
