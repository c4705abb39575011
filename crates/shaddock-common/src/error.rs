//! Unified error type for model loading and resolution.
//!
//! Every failure the engine can report is a variant of [`ModelError`].
//! Callers match on the variant to decide how to present it; the engine
//! itself never recovers from one.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while loading, expanding, resolving, or normalizing a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A model file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Structured text could not be parsed, or has the wrong shape.
    #[error("parse error in {origin}: {message}")]
    Parse {
        /// File path or model location the text came from.
        origin: String,
        /// Description of the syntax or shape problem.
        message: String,
    },

    /// An `!include` directive names a file that does not exist.
    #[error("the file {path} included from {included_from} doesn't exist")]
    IncludeNotFound {
        /// Resolved path of the missing file.
        path: PathBuf,
        /// File that carries the directive.
        included_from: PathBuf,
    },

    /// An `!include` directive re-enters a file that is still being loaded.
    #[error("circular include of {path} (chain: {chain})")]
    CircularInclude {
        /// File that was included twice.
        path: PathBuf,
        /// The in-progress include chain, outermost first.
        chain: String,
    },

    /// A service template has a malformed placeholder or a non-scalar variable.
    #[error("template error in cluster \"{cluster}\": {message}")]
    TemplateSyntax {
        /// Cluster whose services template failed.
        cluster: String,
        /// Description of the problem.
        message: String,
    },

    /// A service template references a variable missing from `vars`.
    #[error("cluster \"{cluster}\" template uses undefined variable \"{variable}\"")]
    UndefinedVariable {
        /// Cluster whose services template failed.
        cluster: String,
        /// Name of the undefined variable.
        variable: String,
    },

    /// No cluster carries the requested name.
    #[error("there is no cluster definition containing 'name: {name}' in your model")]
    ClusterNotFound {
        /// Requested cluster name.
        name: String,
    },

    /// More than one cluster carries the requested name.
    #[error("there are {count} cluster definitions matching 'name: {name}' in your model")]
    DuplicateCluster {
        /// Requested cluster name.
        name: String,
        /// Number of matching definitions.
        count: usize,
    },

    /// No service carries the requested name within the search scope.
    #[error("there is no container definition containing 'name: {name}' in {scope}")]
    ServiceNotFound {
        /// Requested service name.
        name: String,
        /// Human-readable search scope.
        scope: String,
    },

    /// More than one service carries the requested name within the search scope.
    #[error("there are {count} container definitions matching 'name: {name}' in your model")]
    DuplicateService {
        /// Requested service name.
        name: String,
        /// Number of matching definitions.
        count: usize,
    },

    /// An entry that must be named has no `name` property.
    #[error("{kind} definition #{index} in {context} is missing the name property")]
    MissingNameProperty {
        /// Kind of entry (`cluster`, `service`, `host`).
        kind: &'static str,
        /// Zero-based position of the entry in its list.
        index: usize,
        /// Where the list lives.
        context: String,
    },

    /// No images directory was given and the cluster declares none.
    #[error(
        "cluster \"{cluster}\" of service \"{service}\" is missing the images key; \
         declare `images` in the cluster or pass an images directory on the command line"
    )]
    MissingImagesPath {
        /// Service being normalized.
        service: String,
        /// Owning cluster.
        cluster: String,
    },

    /// A service has no `image` property.
    #[error("container definition of \"{service}\" in your model is missing the image property")]
    MissingImageProperty {
        /// Service being normalized.
        service: String,
    },

    /// A volume entry is incomplete or repeats a mount path.
    #[error("malformed volume in service \"{service}\": {reason}")]
    MalformedVolume {
        /// Service being normalized.
        service: String,
        /// What is wrong with the entry.
        reason: String,
    },

    /// A port key or binding cannot be read.
    #[error("invalid port {port} in service \"{service}\": {reason}")]
    InvalidPort {
        /// Service being normalized.
        service: String,
        /// Offending key, as written.
        port: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The service declares no `host` and no API override was supplied.
    #[error("service \"{service}\" declares no host and no API endpoint override was given")]
    MissingHost {
        /// Service being normalized.
        service: String,
    },

    /// No host in the owning cluster carries the declared name.
    #[error("there is no Docker host definition containing 'name: {host}' for service \"{service}\"")]
    HostNotFound {
        /// Service being normalized.
        service: String,
        /// Declared host name.
        host: String,
    },

    /// More than one host in the owning cluster carries the declared name.
    #[error("there are {count} Docker host definitions matching 'name: {host}' for service \"{service}\"")]
    DuplicateHost {
        /// Service being normalized.
        service: String,
        /// Declared host name.
        host: String,
        /// Number of matching definitions.
        count: usize,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ModelError>;
