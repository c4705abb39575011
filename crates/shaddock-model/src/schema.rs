//! Typed records for the entities of a cluster model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use shaddock_common::types::ApiConfig;

/// A named group of services sharing variables, an images directory, and hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster name, unique within the document.
    pub name: String,
    /// Service list, either structured or as a template string.
    #[serde(default)]
    pub services: ServicesSource,
    /// Template variables; their presence turns `services` into a template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<BTreeMap<String, Value>>,
    /// Images directory, relative to the document's base directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<PathBuf>,
    /// Reachable container-runtime endpoints.
    #[serde(default)]
    pub hosts: Vec<HostConfig>,
}

/// How a cluster spells its services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServicesSource {
    /// YAML text, usually a block scalar carrying `{{ var }}` placeholders.
    Template(String),
    /// An already structured sequence of service entries.
    Inline(Vec<Value>),
}

impl Default for ServicesSource {
    fn default() -> Self {
        Self::Inline(Vec::new())
    }
}

/// One named container-runtime endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Name that services refer to through `host`.
    pub name: String,
    /// Connection parameters.
    #[serde(flatten)]
    pub api: ApiConfig,
}

/// A service entry as written in the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDef {
    /// Service name.
    pub name: String,
    /// Image reference, `repo/name[:tag]`.
    #[serde(default)]
    pub image: Option<String>,
    /// Name of a host declared in the owning cluster.
    #[serde(default)]
    pub host: Option<String>,
    /// Container port to host binding, in declaration order.
    #[serde(default)]
    pub ports: Option<Mapping>,
    /// Host directories to bind into the container.
    #[serde(default)]
    pub volumes: Option<Vec<VolumeDef>>,
    /// Run the container privileged.
    #[serde(default)]
    pub privileged: bool,
    /// Docker network mode (`bridge`, `host`, ...).
    #[serde(default)]
    pub network_mode: Option<String>,
}

/// A volume entry as written in the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDef {
    /// Mount path inside the container.
    #[serde(default)]
    pub mount: Option<String>,
    /// Directory on the host.
    #[serde(default)]
    pub host_dir: Option<String>,
    /// Mount read-only.
    #[serde(default)]
    pub ro: bool,
}
