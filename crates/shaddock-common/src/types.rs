//! Domain primitive types shared by the model engine and its callers.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DEFAULT_HOST_IP;

/// Connection parameters for one container-runtime API endpoint.
///
/// Declared per host in a cluster's `hosts` list, or supplied whole on the
/// command line as an override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint URL (e.g. `tcp://node1:2375` or `unix:///var/run/docker.sock`).
    pub url: String,
    /// API version to negotiate.
    ///
    /// Written either quoted or as a bare number (`version: 1.12`).
    #[serde(
        default,
        deserialize_with = "version_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Client certificate path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<PathBuf>,
    /// Client key path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
    /// CA certificate path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cacert_path: Option<PathBuf>,
    /// Verify the server certificate.
    #[serde(default)]
    pub tls_verify: bool,
    /// Use TLS at all.
    #[serde(default)]
    pub tls: bool,
    /// Endpoint is a boot2docker VM.
    #[serde(default)]
    pub boot2docker: bool,
}

impl ApiConfig {
    /// Creates a plain endpoint with no TLS settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Text(String),
    Integer(u64),
    Float(f64),
}

fn version_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(
        Option::<VersionRepr>::deserialize(deserializer)?.map(|repr| match repr {
            VersionRepr::Text(text) => text,
            VersionRepr::Integer(n) => n.to_string(),
            VersionRepr::Float(n) => n.to_string(),
        }),
    )
}

/// Host side of a published port: `(host_addr, host_port)`.
///
/// Reads either `["0.0.0.0", 8774]` or a bare `8774`, the latter bound on
/// every interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BindingRepr")]
pub struct HostBinding {
    /// Host address to bind.
    pub host_ip: String,
    /// Host port to bind.
    pub host_port: u16,
}

impl HostBinding {
    /// Creates a binding on the given address and port.
    #[must_use]
    pub fn new(host_ip: impl Into<String>, host_port: u16) -> Self {
        Self {
            host_ip: host_ip.into(),
            host_port,
        }
    }
}

impl fmt::Display for HostBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_ip, self.host_port)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BindingRepr {
    Pair(String, u16),
    Port(u16),
    Named { host_ip: String, host_port: u16 },
}

impl From<BindingRepr> for HostBinding {
    fn from(repr: BindingRepr) -> Self {
        match repr {
            BindingRepr::Pair(host_ip, host_port) | BindingRepr::Named { host_ip, host_port } => {
                Self { host_ip, host_port }
            }
            BindingRepr::Port(host_port) => Self::new(DEFAULT_HOST_IP, host_port),
        }
    }
}

/// A host directory bound into a container at some mount path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bind {
    /// Host directory.
    pub bind: String,
    /// Mount read-only.
    pub ro: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_from_pair() {
        let b: HostBinding = serde_yaml::from_str(r#"["0.0.0.0", 8774]"#).expect("parse");
        assert_eq!(b, HostBinding::new("0.0.0.0", 8774));
    }

    #[test]
    fn binding_from_bare_port_binds_everywhere() {
        let b: HostBinding = serde_yaml::from_str("8080").expect("parse");
        assert_eq!(b.host_ip, DEFAULT_HOST_IP);
        assert_eq!(b.host_port, 8080);
    }

    #[test]
    fn binding_rejects_out_of_range_port() {
        let parsed: Result<HostBinding, _> = serde_yaml::from_str(r#"["0.0.0.0", 70000]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn api_config_defaults_flags_to_false() {
        let cfg: ApiConfig = serde_yaml::from_str("url: tcp://node1:2375").expect("parse");
        assert_eq!(cfg, ApiConfig::new("tcp://node1:2375"));
        assert!(!cfg.tls && !cfg.tls_verify && !cfg.boot2docker);
    }

    #[test]
    fn api_version_accepts_bare_numbers() {
        let cfg: ApiConfig =
            serde_yaml::from_str("url: tcp://node1:2375\nversion: 1.12").expect("parse");
        assert_eq!(cfg.version.as_deref(), Some("1.12"));
        let cfg: ApiConfig = serde_yaml::from_str("url: tcp://node1:2375\nversion: '1.24'")
            .expect("parse");
        assert_eq!(cfg.version.as_deref(), Some("1.24"));
        let cfg: ApiConfig =
            serde_yaml::from_str("url: tcp://node1:2375\nversion: 2").expect("parse");
        assert_eq!(cfg.version.as_deref(), Some("2"));
    }

    #[test]
    fn api_config_omits_unset_paths_in_json() {
        let json = serde_json::to_string(&ApiConfig::new("unix:///var/run/docker.sock"))
            .expect("serialize");
        assert!(!json.contains("cert_path"), "got: {json}");
    }
}
