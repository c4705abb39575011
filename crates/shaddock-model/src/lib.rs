//! # shaddock-model
//!
//! Loader and resolution engine for Shaddock cluster models.
//!
//! Handles:
//! - **Loader**: Reading YAML documents and splicing `!include` files.
//! - **Template**: `{{ var }}` substitution in cluster service lists.
//! - **Expand**: Turning a cluster's service source into service entries.
//! - **Resolver**: Unique-by-name lookups of clusters, services, and hosts.
//! - **Normalizer**: Deriving deployment-ready service descriptors.
//! - **Runtime**: Interfaces of the executor, runtime client, and presenter.

pub mod descriptor;
pub mod expand;
pub mod loader;
pub mod model;
pub mod normalizer;
pub mod resolver;
pub mod runtime;
pub mod schema;
pub mod template;
pub mod validator;

pub use descriptor::ServiceDescriptor;
pub use model::{Model, Service};
