//! CLI command definitions and dispatch.

pub mod list;
pub mod plan;
pub mod show;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shaddock_common::config::ResolveOptions;
use shaddock_common::constants::BIN_NAME;
use shaddock_common::types::ApiConfig;
use shaddock_model::Model;

use crate::output::{OutputFormat, TerminalView};

/// Shaddock — resolve cluster models into container descriptors.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Model selection and overrides.
    #[command(flatten)]
    pub model: ModelArgs,

    /// Docker API endpoint override.
    #[command(flatten)]
    pub api: ApiArgs,

    /// Output format for descriptors.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

/// Which model to load and how to scope it.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ModelArgs {
    /// Path to the root model file.
    #[arg(short = 'f', long = "model", global = true, env = "SHDK_MODEL")]
    pub file: Option<PathBuf>,

    /// Restrict lookups to one cluster.
    #[arg(short, long, global = true, env = "SHDK_CLUSTER")]
    pub cluster: Option<String>,

    /// Build images from this directory instead of the cluster's `images`.
    #[arg(short = 'd', long, global = true, env = "SHDK_IMGDIR")]
    pub images_dir: Option<PathBuf>,
}

/// Docker API endpoint given on the command line.
///
/// Setting `--docker-url` makes every service use this endpoint instead of
/// its declared host.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiArgs {
    /// Docker API URL.
    #[arg(long, global = true, env = "DOCKER_HOST")]
    pub docker_url: Option<String>,

    /// Docker API version.
    #[arg(long, global = true)]
    pub docker_version: Option<String>,

    /// Client certificate path.
    #[arg(long, global = true)]
    pub docker_cert_path: Option<PathBuf>,

    /// Client key path.
    #[arg(long, global = true)]
    pub docker_key_path: Option<PathBuf>,

    /// CA certificate path.
    #[arg(long, global = true)]
    pub docker_cacert_path: Option<PathBuf>,

    /// Verify the server certificate.
    #[arg(long, global = true)]
    pub docker_tls_verify: bool,

    /// Use TLS.
    #[arg(long, global = true)]
    pub docker_tls: bool,

    /// The endpoint is a boot2docker VM.
    #[arg(long, global = true)]
    pub docker_boot2docker: bool,
}

impl ApiArgs {
    /// The override endpoint, present only when a URL was given.
    #[must_use]
    pub fn to_api_config(&self) -> Option<ApiConfig> {
        self.docker_url.as_ref().map(|url| ApiConfig {
            url: url.clone(),
            version: self.docker_version.clone(),
            cert_path: self.docker_cert_path.clone(),
            key_path: self.docker_key_path.clone(),
            cacert_path: self.docker_cacert_path.clone(),
            tls_verify: self.docker_tls_verify,
            tls: self.docker_tls,
            boot2docker: self.docker_boot2docker,
        })
    }
}

impl Cli {
    /// Resolution options assembled from the global flags.
    #[must_use]
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            cluster: self.model.cluster.clone(),
            images_dir: self.model.images_dir.clone(),
            api: self.api.to_api_config(),
        }
    }

    /// Loads the model named by `--model`.
    ///
    /// # Errors
    ///
    /// Returns an error if no model was given or it fails to load.
    pub fn load_model(&self) -> anyhow::Result<Model> {
        let Some(file) = &self.model.file else {
            anyhow::bail!(
                "no model given: pass a model file with -f or set SHDK_MODEL"
            );
        };
        Ok(Model::load(file)?)
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the services of every cluster in scope.
    List(list::ListArgs),
    /// Show the resolved descriptor of one service.
    Show(show::ShowArgs),
    /// Resolve every service in scope and display the descriptors.
    Plan(plan::PlanArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let view = TerminalView::new(cli.output);
    let model = cli.load_model()?;
    let options = cli.options();
    match cli.command {
        Command::List(args) => list::execute(&args, &model, &options, &view),
        Command::Show(args) => show::execute(&args, &model, &options, &view),
        Command::Plan(args) => plan::execute(&args, &model, &options, &view),
    }
}
