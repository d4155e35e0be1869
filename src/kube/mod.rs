//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides the
//! kube-backed implementations of the discovery collaborator traits.
//!
//! Respects standard HTTP/HTTPS proxy environment variables and adds the
//! cluster API host to `NO_PROXY` when it is clearly an internal address,
//! so corporate proxies do not swallow in-cluster traffic.

pub mod fetch;
pub mod lister;

pub use lister::KubeLister;

use anyhow::Result;
use kube::{Client, Config};
use url::Url;

/// Initialize a Kubernetes client.
///
/// Uses the default kubeconfig loading strategy: in-cluster config when
/// running in a pod, then `KUBECONFIG`, then `~/.kube/config`.
pub async fn create_client() -> Result<Client> {
    let config = Config::infer().await?;

    if let Ok(url) = Url::parse(&config.cluster_url.to_string()) {
        if let Some(host) = url.host_str() {
            ensure_no_proxy_bypass(host);
        }
    }

    let client = Client::try_from(config)?;
    Ok(client)
}

/// Add an internal cluster host to NO_PROXY unless already covered
fn ensure_no_proxy_bypass(host: &str) {
    if !is_internal_host(host) {
        return;
    }

    let current = std::env::var("NO_PROXY")
        .or_else(|_| std::env::var("no_proxy"))
        .unwrap_or_default();

    let covered = current
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .any(|pattern| {
            let suffix = pattern.strip_prefix('.').unwrap_or(pattern);
            host == suffix || host.ends_with(&format!(".{}", suffix))
        });
    if covered {
        return;
    }

    let updated = if current.is_empty() {
        host.to_string()
    } else {
        format!("{},{}", current, host)
    };
    // SAFETY: runs during client construction, before request traffic reads
    // the proxy environment
    unsafe {
        std::env::set_var("NO_PROXY", &updated);
        std::env::set_var("no_proxy", &updated);
    }
}

/// Private addresses and cluster-internal domains should never go through a
/// proxy
fn is_internal_host(host: &str) -> bool {
    if host.starts_with("10.")
        || host.starts_with("172.")
        || host.starts_with("192.168.")
        || host == "localhost"
        || host == "127.0.0.1"
        || host == "::1"
    {
        return true;
    }
    host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".cluster.local")
        || host.ends_with(".svc.cluster.local")
}
