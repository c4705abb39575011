//! Derivation of service descriptors from resolved service entries.
//!
//! Every step can fail on its own; the first failure aborts and nothing is
//! partially populated.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use shaddock_common::config::ResolveOptions;
use shaddock_common::error::{ModelError, Result};
use shaddock_common::types::{Bind, HostBinding};

use crate::descriptor::ServiceDescriptor;
use crate::model::Service;
use crate::resolver;
use crate::schema::VolumeDef;

/// Normalizes `service` into a descriptor.
///
/// `base_dir` anchors the cluster's relative `images` path; `options`
/// carries the images directory and API endpoint overrides.
///
/// # Errors
///
/// Returns [`ModelError::MissingImagesPath`],
/// [`ModelError::MissingImageProperty`], [`ModelError::InvalidPort`],
/// [`ModelError::MalformedVolume`], or a host resolution error.
pub fn normalize(
    service: &Service<'_>,
    base_dir: &Path,
    options: &ResolveOptions,
) -> Result<ServiceDescriptor> {
    let name = service.name();
    tracing::debug!(service = name, cluster = service.cluster_name(), "normalizing service");

    let images_dir = images_dir(service, base_dir, options)?;
    let tag = service
        .def
        .image
        .clone()
        .ok_or_else(|| ModelError::MissingImageProperty {
            service: name.to_string(),
        })?;
    let path = images_dir.join(strip_tag(&tag));

    let port_bindings = match &service.def.ports {
        Some(ports) => port_bindings(name, ports)?,
        None => Vec::new(),
    };
    let ports = port_bindings.iter().map(|(port, _)| *port).collect();

    let (volumes, binds) = match &service.def.volumes {
        Some(entries) => volumes(name, entries)?,
        None => (Vec::new(), BTreeMap::new()),
    };

    let api_cfg = resolver::resolve_host(service, options.api.as_ref())?;

    Ok(ServiceDescriptor {
        name: name.to_string(),
        cluster_name: service.cluster_name().to_string(),
        tag,
        images_dir,
        path,
        host: service.def.host.clone(),
        ports,
        port_bindings,
        volumes,
        binds,
        privileged: service.def.privileged,
        network_mode: service.def.network_mode.clone(),
        api_cfg,
    })
}

fn images_dir(service: &Service<'_>, base_dir: &Path, options: &ResolveOptions) -> Result<PathBuf> {
    if let Some(dir) = &options.images_dir {
        return Ok(dir.clone());
    }
    service
        .cluster
        .images
        .as_ref()
        .map(|images| base_dir.join(images))
        .ok_or_else(|| ModelError::MissingImagesPath {
            service: service.name().to_string(),
            cluster: service.cluster_name().to_string(),
        })
}

/// Strips the tag (`:latest`) and digest (`@sha256:…`) from an image reference.
///
/// A `:` before the last `/` belongs to a registry port and is kept.
#[must_use]
pub fn strip_tag(image: &str) -> &str {
    let image = image.split_once('@').map_or(image, |(name, _)| name);
    let name_start = image.rfind('/').map_or(0, |i| i + 1);
    match image[name_start..].rfind(':') {
        Some(i) => &image[..name_start + i],
        None => image,
    }
}

fn port_bindings(service: &str, ports: &Mapping) -> Result<Vec<(u16, HostBinding)>> {
    let mut seen = BTreeSet::new();
    ports
        .iter()
        .map(|(key, binding)| {
            let port = container_port(service, key)?;
            let invalid = |reason: String| ModelError::InvalidPort {
                service: service.to_string(),
                port: port.to_string(),
                reason,
            };
            if !seen.insert(port) {
                return Err(invalid("container port is declared twice".into()));
            }
            let binding = serde_yaml::from_value::<HostBinding>(binding.clone())
                .map_err(|e| invalid(format!("invalid binding: {e}")))?;
            Ok((port, binding))
        })
        .collect()
}

fn container_port(service: &str, key: &Value) -> Result<u16> {
    let invalid = |written: String| ModelError::InvalidPort {
        service: service.to_string(),
        port: written,
        reason: "expected a port number between 1 and 65535".into(),
    };
    let port = match key {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    };
    match port {
        Some(port) if port > 0 => Ok(port),
        _ => Err(invalid(render_key(key))),
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => format!("{other:?}"),
    }
}

fn volumes(service: &str, entries: &[VolumeDef]) -> Result<(Vec<String>, BTreeMap<String, Bind>)> {
    let malformed = |reason: String| ModelError::MalformedVolume {
        service: service.to_string(),
        reason,
    };

    let mut mounts = Vec::with_capacity(entries.len());
    let mut binds = BTreeMap::new();
    for (index, entry) in entries.iter().enumerate() {
        let mount = entry
            .mount
            .clone()
            .ok_or_else(|| malformed(format!("volume #{index} is missing the mount property")))?;
        let host_dir = entry
            .host_dir
            .clone()
            .ok_or_else(|| malformed(format!("volume #{index} is missing the host_dir property")))?;
        if binds.contains_key(&mount) {
            return Err(malformed(format!("mount path {mount} is declared twice")));
        }
        let _ = binds.insert(
            mount.clone(),
            Bind {
                bind: host_dir,
                ro: entry.ro,
            },
        );
        mounts.push(mount);
    }
    Ok((mounts, binds))
}
