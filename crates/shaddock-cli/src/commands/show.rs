//! `shdk show` — Display the resolved descriptor of one service.

use clap::Args;
use shaddock_common::config::ResolveOptions;
use shaddock_model::Model;
use shaddock_model::runtime::Presenter;

/// Arguments for the `show` command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Name of the service.
    pub name: String,
}

/// Executes the `show` command.
///
/// # Errors
///
/// Returns an error if the service cannot be resolved.
pub fn execute(
    args: &ShowArgs,
    model: &Model,
    options: &ResolveOptions,
    view: &impl Presenter,
) -> anyhow::Result<()> {
    tracing::info!(service = %args.name, "showing service");
    let descriptor = model.describe(&args.name, options)?;
    view.show_descriptor(&descriptor);
    Ok(())
}
