//! Discovery resolver tests
//!
//! Exercise the resolver and the annotation cache against an in-memory
//! lister that routes label-selector queries the way the API server would.

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use devgraph::discovery::{
    AnnotationStore, GraphSummary, ListedResources, ResourceLister, RootKind, discover,
    discover_cached,
};
use devgraph::models::kind::{BuiltinKind, CustomKind, ResourceKind};
use devgraph::models::labels;
use devgraph::models::resource::K8sResource;
use devgraph::models::target::ResourceTarget;

/// In-memory cluster state answering lister queries by label routing
#[derive(Default)]
struct FakeLister {
    objects: Vec<K8sResource>,
    fail_selectors: HashSet<String>,
    list_calls: AtomicUsize,
}

impl FakeLister {
    fn with_objects(objects: Vec<K8sResource>) -> Self {
        Self {
            objects,
            ..Default::default()
        }
    }

    fn failing_selector(mut self, selector: &str) -> Self {
        self.fail_selectors.insert(selector.to_string());
        self
    }
}

#[async_trait]
impl ResourceLister for FakeLister {
    async fn list_resources(
        &self,
        _namespace: &str,
        selector: &str,
        builtin: &[BuiltinKind],
        custom: &[CustomKind],
    ) -> Result<ListedResources> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_selectors.contains(selector) {
            bail!("selector query refused: {}", selector);
        }
        let (key, value) = selector.split_once('=').expect("key=value selector");
        let mut listed = ListedResources::default();
        for obj in &self.objects {
            if obj.label(key) != Some(value) {
                continue;
            }
            match obj.kind() {
                Some(ResourceKind::Builtin(kind)) if builtin.contains(&kind) => {
                    listed.builtin.entry(kind).or_default().push(obj.clone());
                }
                Some(ResourceKind::Custom(kind)) if custom.contains(&kind) => {
                    listed.custom.entry(kind).or_default().push(obj.clone());
                }
                _ => {}
            }
        }
        Ok(listed)
    }

    async fn get_by_exact_name(&self, _namespace: &str, name: &str) -> Result<Vec<K8sResource>> {
        Ok(self
            .objects
            .iter()
            .filter(|obj| obj.name() == Some(name))
            .cloned()
            .collect())
    }

    async fn get_resource(
        &self,
        _namespace: &str,
        target: &ResourceTarget,
    ) -> Result<Option<K8sResource>> {
        let kind = target.kind();
        Ok(self
            .objects
            .iter()
            .find(|obj| obj.kind() == kind && obj.name() == Some(target.name()))
            .cloned())
    }
}

/// In-memory annotation store
#[derive(Default)]
struct FakeStore {
    annotations: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[async_trait]
impl AnnotationStore for FakeStore {
    async fn read_annotation(
        &self,
        _namespace: &str,
        target: &ResourceTarget,
        key: &str,
    ) -> Result<Option<String>> {
        let annotations = self.annotations.lock().unwrap();
        Ok(annotations.get(&format!("{}/{}", target.name(), key)).cloned())
    }

    async fn write_annotation(
        &self,
        _namespace: &str,
        target: &ResourceTarget,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let mut annotations = self.annotations.lock().unwrap();
        annotations.insert(format!("{}/{}", target.name(), key), value.to_string());
        Ok(())
    }
}

fn obj(kind: &str, name: &str, object_labels: serde_json::Value) -> K8sResource {
    K8sResource(json!({
        "kind": kind,
        "metadata": {
            "name": name,
            "namespace": "ns-1",
            "labels": object_labels,
        }
    }))
}

/// The Scenario A cluster: project proj-1 owns Devbox db-1, which owns
/// Ingress ing-1
fn scenario_a_objects() -> Vec<K8sResource> {
    vec![
        obj("Instance", "proj-1", json!({})),
        obj("Devbox", "db-1", json!({ labels::INSTANCE_LABEL: "proj-1" })),
        obj("Ingress", "ing-1", json!({ labels::DEVBOX_MANAGER_LABEL: "db-1" })),
    ]
}

#[tokio::test]
async fn test_scenario_a_transitive_discovery() {
    let lister = FakeLister::with_objects(scenario_a_objects());
    let graph = discover(&lister, "ns-1", RootKind::Instance, "proj-1")
        .await
        .unwrap();

    assert_eq!(
        graph.names_of(ResourceKind::Custom(CustomKind::Devbox)),
        vec!["db-1"]
    );
    assert_eq!(
        graph.names_of(ResourceKind::Builtin(BuiltinKind::Ingress)),
        vec!["ing-1"]
    );
    // The root itself is not part of the output
    assert!(!graph.contains(ResourceKind::Custom(CustomKind::Instance), "proj-1"));
}

#[tokio::test]
async fn test_missing_root_yields_empty_fully_shaped_graph() {
    let lister = FakeLister::with_objects(scenario_a_objects());
    let graph = discover(&lister, "ns-1", RootKind::Instance, "no-such-project")
        .await
        .unwrap();

    assert!(graph.is_empty());
    // Every configured kind is present even when empty
    assert!(graph.builtin.contains_key(&BuiltinKind::Ingress));
    assert!(graph.builtin.contains_key(&BuiltinKind::Pod));
    assert!(graph.custom.contains_key(&CustomKind::Devbox));
    assert!(graph.custom.contains_key(&CustomKind::Cluster));
}

#[tokio::test]
async fn test_idempotent_membership() {
    let lister = FakeLister::with_objects(scenario_a_objects());
    let first = discover(&lister, "ns-1", RootKind::Instance, "proj-1")
        .await
        .unwrap();
    let second = discover(&lister, "ns-1", RootKind::Instance, "proj-1")
        .await
        .unwrap();
    assert_eq!(first.inventory(), second.inventory());
}

#[tokio::test]
async fn test_duplicate_matches_dedup_by_identity() {
    // The service matches both the instance label pass and the exact-name
    // lookup (it reuses the workload's name), so it is found twice
    let mut objects = scenario_a_objects();
    objects.push(obj(
        "Deployment",
        "web",
        json!({ labels::INSTANCE_LABEL: "proj-1" }),
    ));
    objects.push(obj("Service", "web", json!({ labels::INSTANCE_LABEL: "proj-1" })));
    let lister = FakeLister::with_objects(objects);

    let graph = discover(&lister, "ns-1", RootKind::Instance, "proj-1")
        .await
        .unwrap();
    assert_eq!(
        graph.names_of(ResourceKind::Builtin(BuiltinKind::Service)),
        vec!["web"]
    );
    assert_eq!(
        graph.names_of(ResourceKind::Builtin(BuiltinKind::Deployment)),
        vec!["web"]
    );
}

#[tokio::test]
async fn test_partial_failure_degrades_single_branch() {
    let failing = format!("{}=db-1", labels::DEVBOX_MANAGER_LABEL);
    let lister = FakeLister::with_objects(scenario_a_objects()).failing_selector(&failing);

    let graph = discover(&lister, "ns-1", RootKind::Instance, "proj-1")
        .await
        .unwrap();

    // The devbox branch degraded to empty, the rest of the discovery held
    assert_eq!(
        graph.names_of(ResourceKind::Custom(CustomKind::Devbox)),
        vec!["db-1"]
    );
    assert!(
        graph
            .names_of(ResourceKind::Builtin(BuiltinKind::Ingress))
            .is_empty()
    );
}

#[tokio::test]
async fn test_schema_invalid_items_are_excluded() {
    let mut objects = scenario_a_objects();
    // Named but kindless document matching the exact-name lookup
    objects.push(K8sResource(json!({ "metadata": { "name": "proj-1" } })));
    let lister = FakeLister::with_objects(objects);

    let graph = discover(&lister, "ns-1", RootKind::Instance, "proj-1")
        .await
        .unwrap();
    assert_eq!(graph.len(), 2);
}

#[tokio::test]
async fn test_devbox_root_uses_both_label_passes() {
    let objects = vec![
        obj("Devbox", "db-1", json!({})),
        obj("Ingress", "ing-1", json!({ labels::DEVBOX_MANAGER_LABEL: "db-1" })),
        obj("Secret", "db-1-secret", json!({ labels::APP_KUBERNETES_NAME_LABEL: "db-1" })),
        obj("Pod", "db-1-0", json!({ labels::APP_KUBERNETES_NAME_LABEL: "db-1" })),
    ];
    let lister = FakeLister::with_objects(objects);

    let graph = discover(&lister, "ns-1", RootKind::Devbox, "db-1")
        .await
        .unwrap();
    assert_eq!(
        graph.names_of(ResourceKind::Builtin(BuiltinKind::Ingress)),
        vec!["ing-1"]
    );
    assert_eq!(
        graph.names_of(ResourceKind::Builtin(BuiltinKind::Secret)),
        vec!["db-1-secret"]
    );
    assert_eq!(
        graph.names_of(ResourceKind::Builtin(BuiltinKind::Pod)),
        vec!["db-1-0"]
    );
}

#[tokio::test]
async fn test_cached_summary_short_circuits_discovery() {
    let lister = Arc::new(FakeLister::with_objects(scenario_a_objects()));
    let store = Arc::new(FakeStore::default());

    let first = discover_cached(
        lister.clone(),
        store.clone(),
        "ns-1",
        RootKind::Instance,
        "proj-1",
    )
    .await
    .unwrap();
    assert_eq!(first.len(), 2);

    // Wait for the spawned write-back to land
    let mut wrote = false;
    for _ in 0..100 {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        if !store.annotations.lock().unwrap().is_empty() {
            wrote = true;
            break;
        }
    }
    assert!(wrote, "write-back never landed");

    let calls_before = lister.list_calls.load(Ordering::SeqCst);
    let second = discover_cached(
        lister.clone(),
        store.clone(),
        "ns-1",
        RootKind::Instance,
        "proj-1",
    )
    .await
    .unwrap();
    assert_eq!(second.inventory(), first.inventory());
    // The cached summary answered without label queries
    assert_eq!(lister.list_calls.load(Ordering::SeqCst), calls_before);
}

#[tokio::test]
async fn test_stale_summary_falls_back_to_full_discovery() {
    let lister = Arc::new(FakeLister::with_objects(scenario_a_objects()));
    let store = Arc::new(FakeStore::default());

    // A summary naming a resource that no longer exists
    let stale = GraphSummary {
        builtin: vec![devgraph::discovery::InventoryEntry {
            kind: "ingress".into(),
            name: "gone".into(),
        }],
        custom: vec![],
        synced_at: chrono::Utc::now(),
    };
    let target = ResourceTarget::for_kind(RootKind::Instance.as_kind(), "proj-1");
    store
        .write_annotation(
            "ns-1",
            &target,
            labels::GRAPH_CACHE_ANNOTATION,
            &serde_json::to_string(&stale).unwrap(),
        )
        .await
        .unwrap();

    let graph = discover_cached(lister, store, "ns-1", RootKind::Instance, "proj-1")
        .await
        .unwrap();
    // Full discovery ran and found the real membership
    assert_eq!(graph.len(), 2);
    assert!(graph.contains(ResourceKind::Builtin(BuiltinKind::Ingress), "ing-1"));
}
