//! Caller-supplied options that steer resolution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::ApiConfig;

/// Overrides applied when resolving services into descriptors.
///
/// Every field is optional; the default resolves purely from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Restrict service lookups to this cluster.
    pub cluster: Option<String>,
    /// Images directory used verbatim instead of the cluster's `images` key.
    pub images_dir: Option<PathBuf>,
    /// API endpoint used instead of the service's declared host.
    pub api: Option<ApiConfig>,
}

impl ResolveOptions {
    /// Scopes lookups to one cluster.
    #[must_use]
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    /// Overrides the images directory.
    #[must_use]
    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(dir.into());
        self
    }

    /// Overrides the API endpoint for every service.
    #[must_use]
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }
}
