//! Unique-by-name lookups of clusters, services, and hosts.
//!
//! Each lookup is an order-preserving linear scan that requires exactly
//! one match.

use shaddock_common::error::{ModelError, Result};
use shaddock_common::types::ApiConfig;

use crate::model::{Model, Service};
use crate::schema::Cluster;

fn exactly_one<T>(
    mut matches: Vec<T>,
    not_found: impl FnOnce() -> ModelError,
    duplicate: impl FnOnce(usize) -> ModelError,
) -> Result<T> {
    if matches.len() > 1 {
        return Err(duplicate(matches.len()));
    }
    matches.pop().ok_or_else(not_found)
}

/// Returns the unique cluster named `name`.
///
/// # Errors
///
/// Returns [`ModelError::ClusterNotFound`] for zero matches and
/// [`ModelError::DuplicateCluster`] for more than one.
pub fn resolve_cluster<'a>(clusters: &'a [Cluster], name: &str) -> Result<&'a Cluster> {
    let matches: Vec<&Cluster> = clusters.iter().filter(|c| c.name == name).collect();
    exactly_one(
        matches,
        || ModelError::ClusterNotFound {
            name: name.to_string(),
        },
        |count| ModelError::DuplicateCluster {
            name: name.to_string(),
            count,
        },
    )
}

/// Returns the unique service named `name`.
///
/// With a `scope`, only that cluster's services are searched; otherwise the
/// services of every cluster, in document order.
///
/// # Errors
///
/// Returns expansion errors, [`ModelError::ServiceNotFound`] for zero
/// matches and [`ModelError::DuplicateService`] for more than one.
pub fn resolve_service<'a>(model: &'a Model, name: &str, scope: Option<&str>) -> Result<Service<'a>> {
    tracing::info!(service = name, cluster = ?scope, "resolving service");
    let matches: Vec<Service<'a>> = model
        .services(scope)?
        .into_iter()
        .filter(|s| s.name() == name)
        .collect();
    exactly_one(
        matches,
        || ModelError::ServiceNotFound {
            name: name.to_string(),
            scope: scope.map_or_else(|| "your model".to_string(), |c| format!("cluster \"{c}\"")),
        },
        |count| ModelError::DuplicateService {
            name: name.to_string(),
            count,
        },
    )
}

/// Resolves the API endpoint of `service`.
///
/// An override always wins and the cluster's `hosts` are not consulted.
/// Otherwise the service's `host` must match exactly one host of its
/// owning cluster.
///
/// # Errors
///
/// Returns [`ModelError::MissingHost`] when there is neither an override nor
/// a declared host, and [`ModelError::HostNotFound`] or
/// [`ModelError::DuplicateHost`] when the declared host does not match
/// exactly once.
pub fn resolve_host(service: &Service<'_>, api_override: Option<&ApiConfig>) -> Result<ApiConfig> {
    if let Some(api) = api_override {
        tracing::debug!(service = service.name(), url = %api.url, "using API override");
        return Ok(api.clone());
    }

    let host = service
        .def
        .host
        .as_deref()
        .ok_or_else(|| ModelError::MissingHost {
            service: service.name().to_string(),
        })?;

    let matches: Vec<&ApiConfig> = service
        .cluster
        .hosts
        .iter()
        .filter(|h| h.name == host)
        .map(|h| &h.api)
        .collect();
    exactly_one(
        matches,
        || ModelError::HostNotFound {
            service: service.name().to_string(),
            host: host.to_string(),
        },
        |count| ModelError::DuplicateHost {
            service: service.name().to_string(),
            host: host.to_string(),
            count,
        },
    )
    .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r"
clusters:
  - name: core
    hosts:
      - name: node1
        url: tcp://node1:2375
      - name: twin
        url: tcp://twin-a:2375
      - name: twin
        url: tcp://twin-b:2375
    services:
      - name: nova
        host: node1
      - name: keystone
        host: ghost
      - name: glance
        host: twin
      - name: mysql
      - name: shared
  - name: edge
    services:
      - name: shared
      - name: horizon
  - name: edge
    services: []
";

    fn model() -> Model {
        Model::parse(MODEL, "/models").expect("should parse")
    }

    #[test]
    fn cluster_unique_match() {
        let model = model();
        let cluster = resolve_cluster(model.clusters(), "core").expect("core");
        assert_eq!(cluster.name, "core");
    }

    #[test]
    fn cluster_zero_matches() {
        let err = resolve_cluster(model().clusters(), "nope").unwrap_err();
        assert!(matches!(err, ModelError::ClusterNotFound { .. }), "got: {err}");
    }

    #[test]
    fn cluster_duplicate_matches() {
        let err = resolve_cluster(model().clusters(), "edge").unwrap_err();
        assert!(
            matches!(err, ModelError::DuplicateCluster { count: 2, .. }),
            "got: {err}"
        );
    }

    #[test]
    fn service_scoped_ignores_other_clusters() {
        let model = model();
        let svc = resolve_service(&model, "shared", Some("core")).expect("shared");
        assert_eq!(svc.cluster_name(), "core");
    }

    #[test]
    fn service_scoped_not_found_in_other_cluster() {
        let model = model();
        let err = resolve_service(&model, "horizon", Some("core")).unwrap_err();
        match err {
            ModelError::ServiceNotFound { name, scope } => {
                assert_eq!(name, "horizon");
                assert!(scope.contains("core"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn service_unscoped_duplicate_across_clusters() {
        let model = Model::parse(
            "clusters:\n  - name: a\n    services: [{name: db}]\n  - name: b\n    services: [{name: db}]\n",
            ".",
        )
        .expect("should parse");
        let err = resolve_service(&model, "db", None).unwrap_err();
        assert!(
            matches!(err, ModelError::DuplicateService { count: 2, .. }),
            "got: {err}"
        );
    }

    #[test]
    fn service_scope_must_resolve() {
        let model = model();
        let err = resolve_service(&model, "nova", Some("edge")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateCluster { .. }), "got: {err}");
    }

    #[test]
    fn host_unique_match() {
        let model = model();
        let svc = model.service("nova", Some("core")).expect("nova");
        let api = resolve_host(&svc, None).expect("host");
        assert_eq!(api.url, "tcp://node1:2375");
    }

    #[test]
    fn host_not_found_is_an_error() {
        let model = model();
        let svc = model.service("keystone", Some("core")).expect("keystone");
        let err = resolve_host(&svc, None).unwrap_err();
        assert!(
            matches!(err, ModelError::HostNotFound { ref host, .. } if host == "ghost"),
            "got: {err}"
        );
    }

    #[test]
    fn host_duplicate_is_an_error() {
        let model = model();
        let svc = model.service("glance", Some("core")).expect("glance");
        let err = resolve_host(&svc, None).unwrap_err();
        assert!(
            matches!(err, ModelError::DuplicateHost { count: 2, .. }),
            "got: {err}"
        );
    }

    #[test]
    fn undeclared_host_without_override_is_an_error() {
        let model = model();
        let svc = model.service("mysql", Some("core")).expect("mysql");
        let err = resolve_host(&svc, None).unwrap_err();
        assert!(matches!(err, ModelError::MissingHost { .. }), "got: {err}");
    }

    #[test]
    fn override_wins_over_matching_host() {
        let model = model();
        let svc = model.service("nova", Some("core")).expect("nova");
        let cli = ApiConfig::new("unix:///var/run/docker.sock");
        let api = resolve_host(&svc, Some(&cli)).expect("override");
        assert_eq!(api, cli);
    }

    #[test]
    fn override_skips_unresolvable_hosts() {
        let model = model();
        let cli = ApiConfig::new("tcp://cli:2375");
        for name in ["keystone", "glance", "mysql"] {
            let svc = model.service(name, Some("core")).expect("service");
            assert_eq!(resolve_host(&svc, Some(&cli)).expect("override").url, "tcp://cli:2375");
        }
    }
}
