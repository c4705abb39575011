//! System-wide constants.

/// YAML tag that splices another file into the document.
pub const INCLUDE_TAG: &str = "include";

/// Host address used when a port binding gives only a port.
pub const DEFAULT_HOST_IP: &str = "0.0.0.0";

/// Key of the cluster sequence at the document root.
pub const CLUSTERS_KEY: &str = "clusters";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "shdk";

/// Container runtime CLI used to build images from a service path.
pub const DOCKER_BIN: &str = "docker";
