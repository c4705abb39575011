//! Deployment-ready service descriptors.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shaddock_common::types::{ApiConfig, Bind, HostBinding};

/// The fully resolved form of a service, ready for a runtime client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name.
    pub name: String,
    /// Owning cluster.
    pub cluster_name: String,
    /// Image reference, tag included.
    pub tag: String,
    /// Directory holding the image build contexts.
    pub images_dir: PathBuf,
    /// Build context of this image: `images_dir` joined with the untagged image.
    pub path: PathBuf,
    /// Declared host name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Exposed container ports, in declaration order.
    pub ports: Vec<u16>,
    /// Container port to host binding, in declaration order.
    pub port_bindings: Vec<(u16, HostBinding)>,
    /// Mount paths, in declaration order.
    pub volumes: Vec<String>,
    /// Host directory bound at each mount path.
    pub binds: BTreeMap<String, Bind>,
    /// Run privileged.
    pub privileged: bool,
    /// Docker network mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
    /// Endpoint of the runtime API that hosts the container.
    pub api_cfg: ApiConfig,
}

impl ServiceDescriptor {
    /// Host binding of a container port.
    #[must_use]
    pub fn binding(&self, port: u16) -> Option<&HostBinding> {
        self.port_bindings
            .iter()
            .find(|(p, _)| *p == port)
            .map(|(_, b)| b)
    }
}
