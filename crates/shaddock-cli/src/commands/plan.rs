//! `shdk plan` — Resolve every service in scope and display the descriptors.

use clap::Args;
use shaddock_common::config::ResolveOptions;
use shaddock_model::Model;
use shaddock_model::runtime::Presenter;

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Only print the build command of each service.
    #[arg(long)]
    pub build_commands: bool,
}

/// Executes the `plan` command.
///
/// Resolves the services of the selected cluster (or of every cluster),
/// stopping at the first service that fails to resolve.
///
/// # Errors
///
/// Returns an error if any service fails to resolve.
pub fn execute(
    args: &PlanArgs,
    model: &Model,
    options: &ResolveOptions,
    view: &impl Presenter,
) -> anyhow::Result<()> {
    let descriptors = model.describe_all(options)?;

    for descriptor in &descriptors {
        if args.build_commands {
            view.show_message(&shaddock_model::runtime::build_command(descriptor));
        } else {
            view.show_descriptor(descriptor);
        }
    }

    let scope = options
        .cluster
        .as_ref()
        .map_or_else(|| "all clusters".to_string(), |c| format!("cluster {c}"));
    view.show_message(&format!(
        "{} service(s) resolved in {scope}.",
        descriptors.len()
    ));
    Ok(())
}
