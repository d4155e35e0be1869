//! Platform label keys
//!
//! Label keys the platform stamps onto generated objects. Which key a child
//! carries depends on what generated it, so discovery and inference both
//! need the full set.

/// Stamped on objects generated for a DevBox (Ingress, Service, certs)
pub const DEVBOX_MANAGER_LABEL: &str = "cloud.devpad.io/devbox-manager";

/// Stamped on objects generated for an app Deployment/StatefulSet
pub const APP_DEPLOY_MANAGER_LABEL: &str = "cloud.devpad.io/app-deploy-manager";

/// Stamped on every object belonging to a project/Instance
pub const INSTANCE_LABEL: &str = "app.devpad.io/instance";

/// Standard Kubernetes app-name label, used for DevBox Secrets and Pods
pub const APP_KUBERNETES_NAME_LABEL: &str = "app.kubernetes.io/name";

/// Standard Kubernetes instance label, used for database Cluster children
pub const APP_KUBERNETES_INSTANCE_LABEL: &str = "app.kubernetes.io/instance";

/// Annotation holding the cached discovery summary on a root resource
pub const GRAPH_CACHE_ANNOTATION: &str = "graph.devpad.io/resources";
