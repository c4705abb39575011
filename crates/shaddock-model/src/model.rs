//! The typed cluster model and its lookup entry points.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use shaddock_common::config::ResolveOptions;
use shaddock_common::constants::CLUSTERS_KEY;
use shaddock_common::error::{ModelError, Result};

use crate::descriptor::ServiceDescriptor;
use crate::loader::{self, Document};
use crate::schema::{Cluster, ServiceDef};
use crate::{expand, normalizer, resolver, validator};

const INLINE_ORIGIN: &str = "<inline model>";

/// A loaded model: its clusters in document order plus the base directory.
///
/// Immutable once built; lookups borrow from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    source: Option<PathBuf>,
    base_dir: PathBuf,
    clusters: Vec<Cluster>,
}

/// A service entry together with the cluster that declares it.
#[derive(Debug, Clone, PartialEq)]
pub struct Service<'a> {
    /// The entry as written (after template expansion).
    pub def: ServiceDef,
    /// Owning cluster.
    pub cluster: &'a Cluster,
}

impl<'a> Service<'a> {
    /// Stamps a service entry with its owning cluster.
    #[must_use]
    pub const fn new(def: ServiceDef, cluster: &'a Cluster) -> Self {
        Self { def, cluster }
    }

    /// Service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Name of the owning cluster.
    #[must_use]
    pub fn cluster_name(&self) -> &'a str {
        &self.cluster.name
    }
}

impl Model {
    /// Loads the model rooted at `path`, including every referenced file.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the document is not a model.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_document(loader::load(path)?)
    }

    /// Builds a model from in-memory text.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the document is not a model.
    pub fn parse(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::from_document(Document::parse(text, base_dir)?)
    }

    /// Builds a model from a loaded document.
    ///
    /// Every cluster and every host entry must carry a `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] if the root has no `clusters` list or
    /// an entry has the wrong shape, and [`ModelError::MissingNameProperty`]
    /// for an unnamed cluster or host.
    pub fn from_document(doc: Document) -> Result<Self> {
        let origin = doc
            .source
            .as_ref()
            .map_or_else(|| INLINE_ORIGIN.to_string(), |p| p.display().to_string());

        let entries = match doc.root {
            Value::Mapping(mut root) => match root.remove(CLUSTERS_KEY) {
                Some(Value::Sequence(entries)) => entries,
                Some(Value::Null) => Vec::new(),
                Some(_) => return Err(not_a_model(&origin, "`clusters` must be a list")),
                None => return Err(not_a_model(&origin, "missing `clusters` list")),
            },
            _ => return Err(not_a_model(&origin, "document root must be a mapping")),
        };

        validator::require_names(&entries, "cluster", &origin)?;
        for entry in &entries {
            if let Some(hosts) = entry.get("hosts").and_then(Value::as_sequence) {
                let name = entry.get("name").and_then(Value::as_str).unwrap_or_default();
                validator::require_names(hosts, "host", &format!("cluster \"{name}\""))?;
            }
        }
        let clusters: Vec<Cluster> = validator::named_entries(entries, "cluster", &origin)?;
        tracing::info!(origin = %origin, clusters = clusters.len(), "model loaded");

        Ok(Self {
            source: doc.source,
            base_dir: doc.base_dir,
            clusters,
        })
    }

    /// File the model was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory relative paths in the model are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Clusters in document order.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Returns the unique cluster named `name`.
    ///
    /// # Errors
    ///
    /// See [`resolver::resolve_cluster`].
    pub fn cluster(&self, name: &str) -> Result<&Cluster> {
        resolver::resolve_cluster(&self.clusters, name)
    }

    /// Expands the services of one cluster, or of all clusters in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cluster cannot be resolved or a
    /// cluster's services fail to expand.
    pub fn services(&self, scope: Option<&str>) -> Result<Vec<Service<'_>>> {
        match scope {
            Some(name) => expand::expand(self.cluster(name)?),
            None => {
                let mut all = Vec::new();
                for cluster in &self.clusters {
                    all.extend(expand::expand(cluster)?);
                }
                Ok(all)
            }
        }
    }

    /// Returns the unique service named `name` within `scope`.
    ///
    /// # Errors
    ///
    /// See [`resolver::resolve_service`].
    pub fn service(&self, name: &str, scope: Option<&str>) -> Result<Service<'_>> {
        resolver::resolve_service(self, name, scope)
    }

    /// Resolves and normalizes one service, scoped by `options.cluster`.
    ///
    /// # Errors
    ///
    /// Returns the first lookup or normalization error.
    pub fn describe(&self, name: &str, options: &ResolveOptions) -> Result<ServiceDescriptor> {
        let service = self.service(name, options.cluster.as_deref())?;
        normalizer::normalize(&service, &self.base_dir, options)
    }

    /// Normalizes every service in scope, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first lookup or normalization error.
    pub fn describe_all(&self, options: &ResolveOptions) -> Result<Vec<ServiceDescriptor>> {
        self.services(options.cluster.as_deref())?
            .iter()
            .map(|service| normalizer::normalize(service, &self.base_dir, options))
            .collect()
    }
}

fn not_a_model(origin: &str, message: &str) -> ModelError {
    ModelError::Parse {
        origin: origin.to_string(),
        message: message.to_string(),
    }
}
