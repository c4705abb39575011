//! Terminal presentation of descriptors, progress streams, and messages.

use clap::ValueEnum;
use serde::Deserialize;
use shaddock_model::ServiceDescriptor;
use shaddock_model::runtime::Presenter;

/// Serialization used for descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML, the model's own format.
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Renders a descriptor in the given format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_descriptor(
    descriptor: &ServiceDescriptor,
    format: OutputFormat,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(descriptor)?,
        OutputFormat::Json => serde_json::to_string_pretty(descriptor)? + "\n",
    })
}

/// One line of a Docker JSON progress stream.
#[derive(Debug, Deserialize)]
struct StreamLine {
    stream: Option<String>,
    error: Option<String>,
}

/// Extracts the printable lines of a Docker progress stream line.
///
/// An error is listed before the stream text when a line carries both.
/// Lines that are not JSON are returned as-is.
#[must_use]
pub fn stream_text(line: &str) -> Vec<String> {
    match serde_json::from_str::<StreamLine>(line) {
        Ok(StreamLine { stream, error }) => error
            .into_iter()
            .chain(stream.map(|s| s.trim_end().to_string()))
            .collect(),
        Err(_) => vec![line.to_string()],
    }
}

/// Presenter writing to the terminal: descriptors to stdout, the rest to stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalView {
    format: OutputFormat,
}

impl TerminalView {
    /// Creates a view printing descriptors in `format`.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Presenter for TerminalView {
    fn show_descriptor(&self, service: &ServiceDescriptor) {
        match format_descriptor(service, self.format) {
            Ok(text) => print!("{text}"),
            Err(e) => tracing::error!(service = %service.name, error = %e, "cannot render descriptor"),
        }
    }

    fn show_stream(&self, line: &str) {
        for text in stream_text(line) {
            eprintln!("{text}");
        }
    }

    fn show_message(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use shaddock_common::types::{ApiConfig, HostBinding};

    use super::*;

    fn descriptor() -> ServiceDescriptor {
        ServiceDescriptor {
            name: "nova".into(),
            cluster_name: "core".into(),
            tag: "shaddock/nova:latest".into(),
            images_dir: PathBuf::from("/srv/images"),
            path: PathBuf::from("/srv/images/shaddock/nova"),
            host: Some("node1".into()),
            ports: vec![8774],
            port_bindings: vec![(8774, HostBinding::new("0.0.0.0", 8774))],
            volumes: Vec::new(),
            binds: BTreeMap::new(),
            privileged: false,
            network_mode: None,
            api_cfg: ApiConfig::new("tcp://node1:2375"),
        }
    }

    #[test]
    fn stream_line_prints_stream() {
        assert_eq!(
            stream_text(r#"{"stream": "Step 1/4 : FROM ubuntu\n"}"#),
            vec!["Step 1/4 : FROM ubuntu"]
        );
    }

    #[test]
    fn stream_line_prints_error_then_stream() {
        assert_eq!(
            stream_text(r#"{"stream": "x", "error": "build failed"}"#),
            vec!["build failed", "x"]
        );
    }

    #[test]
    fn stream_line_without_text_is_silent() {
        assert!(stream_text(r#"{"status": "Downloading"}"#).is_empty());
    }

    #[test]
    fn non_json_line_is_passed_through() {
        assert_eq!(stream_text("plain output"), vec!["plain output"]);
    }

    #[test]
    fn yaml_descriptor_round_trips() {
        let text = format_descriptor(&descriptor(), OutputFormat::Yaml).expect("yaml");
        assert!(text.contains("shaddock/nova:latest"), "got: {text}");
        let back: ServiceDescriptor = serde_yaml::from_str(&text).expect("parse back");
        assert_eq!(back, descriptor());
    }

    #[test]
    fn json_descriptor_contains_api_url() {
        let text = format_descriptor(&descriptor(), OutputFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(value["api_cfg"]["url"], "tcp://node1:2375");
        assert_eq!(value["ports"][0], 8774);
    }
}
