//! Static discovery rule table
//!
//! Maps each supported root kind to the label-selector templates and default
//! sub-kinds its discovery fans out over. The table is immutable; callers
//! get `'static` slices out of plain matches.

use std::fmt;
use std::str::FromStr;

use crate::models::kind::{BuiltinKind, CustomKind, ResourceKind};
use crate::models::labels;

/// Kinds discovery can be rooted at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    Instance,
    Devbox,
    Cluster,
    Deployment,
    StatefulSet,
}

/// One label-selector query: which label keys the children of this root
/// carry, and which kinds to ask for under that label
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryRule {
    pub label_key: &'static str,
    pub builtin: &'static [BuiltinKind],
    pub custom: &'static [CustomKind],
}

impl DiscoveryRule {
    /// Render the `key=value` selector for a concrete root name
    pub fn selector(&self, name: &str) -> String {
        format!("{}={}", self.label_key, name)
    }
}

impl RootKind {
    /// The registry kind of the root object itself
    pub fn as_kind(&self) -> ResourceKind {
        match self {
            RootKind::Instance => ResourceKind::Custom(CustomKind::Instance),
            RootKind::Devbox => ResourceKind::Custom(CustomKind::Devbox),
            RootKind::Cluster => ResourceKind::Custom(CustomKind::Cluster),
            RootKind::Deployment => ResourceKind::Builtin(BuiltinKind::Deployment),
            RootKind::StatefulSet => ResourceKind::Builtin(BuiltinKind::StatefulSet),
        }
    }

    /// The root kind owning further discovery for a discovered child, if any
    pub fn for_kind(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::Custom(CustomKind::Devbox) => Some(RootKind::Devbox),
            ResourceKind::Custom(CustomKind::Cluster) => Some(RootKind::Cluster),
            ResourceKind::Builtin(BuiltinKind::Deployment) => Some(RootKind::Deployment),
            ResourceKind::Builtin(BuiltinKind::StatefulSet) => Some(RootKind::StatefulSet),
            _ => None,
        }
    }

    /// Label queries to fan out for this root.
    ///
    /// Devboxes need two passes because the platform stamps generated
    /// networking objects with the manager label but Secrets/Pods with the
    /// standard app-name label.
    pub fn rules(&self) -> &'static [DiscoveryRule] {
        match self {
            RootKind::Instance => &[DiscoveryRule {
                label_key: labels::INSTANCE_LABEL,
                builtin: &[
                    BuiltinKind::Deployment,
                    BuiltinKind::StatefulSet,
                    BuiltinKind::Service,
                    BuiltinKind::Ingress,
                    BuiltinKind::Secret,
                    BuiltinKind::ConfigMap,
                    BuiltinKind::PersistentVolumeClaim,
                    BuiltinKind::CronJob,
                ],
                custom: &[
                    CustomKind::Devbox,
                    CustomKind::Cluster,
                    CustomKind::ObjectStorageBucket,
                ],
            }],
            RootKind::Devbox => &[
                DiscoveryRule {
                    label_key: labels::DEVBOX_MANAGER_LABEL,
                    builtin: &[BuiltinKind::Ingress, BuiltinKind::Service],
                    custom: &[CustomKind::Certificate, CustomKind::Issuer],
                },
                DiscoveryRule {
                    label_key: labels::APP_KUBERNETES_NAME_LABEL,
                    builtin: &[BuiltinKind::Secret, BuiltinKind::Pod],
                    custom: &[],
                },
            ],
            RootKind::Cluster => &[DiscoveryRule {
                label_key: labels::APP_KUBERNETES_INSTANCE_LABEL,
                builtin: &[
                    BuiltinKind::Service,
                    BuiltinKind::Secret,
                    BuiltinKind::Pod,
                    BuiltinKind::PersistentVolumeClaim,
                ],
                custom: &[CustomKind::Backup],
            }],
            RootKind::Deployment | RootKind::StatefulSet => &[DiscoveryRule {
                label_key: labels::APP_DEPLOY_MANAGER_LABEL,
                builtin: &[
                    BuiltinKind::Service,
                    BuiltinKind::Ingress,
                    BuiltinKind::ConfigMap,
                    BuiltinKind::Secret,
                    BuiltinKind::PersistentVolumeClaim,
                    BuiltinKind::Pod,
                ],
                custom: &[],
            }],
        }
    }

    /// Every kind a discovery rooted here can produce, own rules plus the
    /// rules of recursable children. Used to shape the output graph so
    /// callers always see the same keys.
    pub fn configured_kinds(&self) -> (Vec<BuiltinKind>, Vec<CustomKind>) {
        let mut builtin = Vec::new();
        let mut custom = Vec::new();
        let mut collect = |root: RootKind| {
            for rule in root.rules() {
                for kind in rule.builtin {
                    if !builtin.contains(kind) {
                        builtin.push(*kind);
                    }
                }
                for kind in rule.custom {
                    if !custom.contains(kind) {
                        custom.push(*kind);
                    }
                }
            }
        };
        collect(*self);
        if matches!(self, RootKind::Instance) {
            // Instance discovery recurses into each child workspace kind
            collect(RootKind::Devbox);
            collect(RootKind::Cluster);
            collect(RootKind::Deployment);
            collect(RootKind::StatefulSet);
        }
        builtin.sort();
        custom.sort();
        (builtin, custom)
    }

    /// All root kinds
    pub fn all() -> &'static [Self] {
        &[
            RootKind::Instance,
            RootKind::Devbox,
            RootKind::Cluster,
            RootKind::Deployment,
            RootKind::StatefulSet,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RootKind::Instance => "instance",
            RootKind::Devbox => "devbox",
            RootKind::Cluster => "cluster",
            RootKind::Deployment => "deployment",
            RootKind::StatefulSet => "statefulset",
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RootKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            // Projects surface as Instance objects
            "instance" | "project" => Ok(RootKind::Instance),
            "devbox" => Ok(RootKind::Devbox),
            "cluster" => Ok(RootKind::Cluster),
            "deployment" | "deploy" => Ok(RootKind::Deployment),
            "statefulset" | "sts" => Ok(RootKind::StatefulSet),
            _ => Err(format!("Unknown root kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devbox_has_two_label_passes() {
        let rules = RootKind::Devbox.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].label_key, labels::DEVBOX_MANAGER_LABEL);
        assert_eq!(rules[1].label_key, labels::APP_KUBERNETES_NAME_LABEL);
    }

    #[test]
    fn test_selector_rendering() {
        let rule = &RootKind::Devbox.rules()[0];
        assert_eq!(
            rule.selector("db-1"),
            "cloud.devpad.io/devbox-manager=db-1"
        );
    }

    #[test]
    fn test_instance_configured_kinds_include_child_rules() {
        let (builtin, custom) = RootKind::Instance.configured_kinds();
        // Pod only appears via child rules (Devbox/Cluster/Deployment)
        assert!(builtin.contains(&BuiltinKind::Pod));
        assert!(custom.contains(&CustomKind::Devbox));
        assert!(custom.contains(&CustomKind::Backup));
        assert!(custom.contains(&CustomKind::Certificate));
        // The root's own kind is never a configured sub-kind
        assert!(!custom.contains(&CustomKind::Instance));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("project".parse::<RootKind>(), Ok(RootKind::Instance));
        assert_eq!("sts".parse::<RootKind>(), Ok(RootKind::StatefulSet));
        assert!("node".parse::<RootKind>().is_err());
    }

    #[test]
    fn test_for_kind_recursable() {
        assert_eq!(
            RootKind::for_kind(ResourceKind::Custom(CustomKind::Devbox)),
            Some(RootKind::Devbox)
        );
        assert_eq!(
            RootKind::for_kind(ResourceKind::Builtin(BuiltinKind::Ingress)),
            None
        );
    }
}
