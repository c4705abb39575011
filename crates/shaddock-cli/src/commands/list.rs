//! `shdk list` — List the services of every cluster in scope.

use clap::Args;
use shaddock_common::config::ResolveOptions;
use shaddock_model::Model;
use shaddock_model::runtime::Presenter;

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Also show each service's image.
    #[arg(short, long)]
    pub long: bool,
}

/// Executes the `list` command.
///
/// Services are expanded but not normalized, so a model with incomplete
/// services can still be listed.
///
/// # Errors
///
/// Returns an error if the scope cluster is unknown or a service list fails
/// to expand.
pub fn execute(
    args: &ListArgs,
    model: &Model,
    options: &ResolveOptions,
    view: &impl Presenter,
) -> anyhow::Result<()> {
    for line in listing(model, options, args.long)? {
        view.show_message(&line);
    }
    Ok(())
}

fn listing(model: &Model, options: &ResolveOptions, long: bool) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut current: Option<&str> = None;
    for service in model.services(options.cluster.as_deref())? {
        let cluster = service.cluster_name();
        if current != Some(cluster) {
            lines.push(format!("{cluster}:"));
            current = Some(cluster);
        }
        match (long, service.def.image.as_deref()) {
            (true, Some(image)) => lines.push(format!("  {} ({image})", service.name())),
            _ => lines.push(format!("  {}", service.name())),
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "
clusters:
  - name: core
    services:
      - {name: nova, image: shaddock/nova}
      - {name: glance}
  - name: edge
    services:
      - {name: horizon, image: shaddock/horizon}
";

    #[test]
    fn lists_services_grouped_by_cluster() {
        let model = Model::parse(MODEL, ".").expect("parse");
        let lines = listing(&model, &ResolveOptions::default(), false).expect("list");
        assert_eq!(lines, vec!["core:", "  nova", "  glance", "edge:", "  horizon"]);
    }

    #[test]
    fn long_listing_shows_images() {
        let model = Model::parse(MODEL, ".").expect("parse");
        let options = ResolveOptions::default().with_cluster("core");
        let lines = listing(&model, &options, true).expect("list");
        assert_eq!(lines, vec!["core:", "  nova (shaddock/nova)", "  glance"]);
    }

    #[test]
    fn unknown_cluster_fails() {
        let model = Model::parse(MODEL, ".").expect("parse");
        let options = ResolveOptions::default().with_cluster("nope");
        assert!(listing(&model, &options, false).is_err());
    }
}
