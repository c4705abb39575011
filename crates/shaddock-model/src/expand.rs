//! Expansion of a cluster's service source into service entries.
//!
//! With `vars`, a template string is rendered before parsing and the scalars
//! of a structured list are rendered in place. Without `vars`, text is parsed
//! as-is.

use std::collections::BTreeMap;

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use shaddock_common::error::{ModelError, Result};

use crate::model::Service;
use crate::schema::{Cluster, ServiceDef, ServicesSource};
use crate::template::TemplateError;
use crate::{template, validator};

/// Expands `cluster`'s services, preserving declaration order.
///
/// # Errors
///
/// Returns template errors, [`ModelError::Parse`] if the expanded text is
/// not a list of mappings, and [`ModelError::MissingNameProperty`] for an
/// unnamed entry.
pub fn expand(cluster: &Cluster) -> Result<Vec<Service<'_>>> {
    let context = format!("cluster \"{}\"", cluster.name);
    let entries = service_entries(cluster, &context)?;
    let defs: Vec<ServiceDef> = validator::named_entries(entries, "service", &context)?;
    tracing::debug!(cluster = %cluster.name, services = defs.len(), "expanded services");
    Ok(defs
        .into_iter()
        .map(|def| Service::new(def, cluster))
        .collect())
}

fn service_entries(cluster: &Cluster, context: &str) -> Result<Vec<Value>> {
    match (&cluster.services, &cluster.vars) {
        (ServicesSource::Inline(entries), None) => Ok(entries.clone()),
        (ServicesSource::Template(text), None) => parse_entries(text, context),
        (ServicesSource::Template(text), Some(vars)) => {
            let rendered = template::render(text, vars).map_err(|e| e.in_cluster(&cluster.name))?;
            parse_entries(&rendered, context)
        }
        (ServicesSource::Inline(entries), Some(vars)) => entries
            .iter()
            .map(|entry| render_value(entry, vars))
            .collect::<std::result::Result<Vec<_>, TemplateError>>()
            .map_err(|e| e.in_cluster(&cluster.name)),
    }
}

/// Renders every string scalar of an inline entry in place, keys included.
///
/// A rendered scalar that reads as a YAML number or boolean takes that type,
/// so `port: '{{ port }}'` yields a number.
fn render_value(
    value: &Value,
    vars: &BTreeMap<String, Value>,
) -> std::result::Result<Value, TemplateError> {
    Ok(match value {
        Value::String(text) => {
            let rendered = template::render(text, vars)?;
            if rendered == *text {
                value.clone()
            } else {
                retype(rendered)
            }
        }
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| render_value(item, vars))
                .collect::<std::result::Result<Vec<_>, TemplateError>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, item) in map {
                let _ = out.insert(render_value(key, vars)?, render_value(item, vars)?);
            }
            Value::Mapping(out)
        }
        Value::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
            tag: tagged.tag.clone(),
            value: render_value(&tagged.value, vars)?,
        })),
        other => other.clone(),
    })
}

fn retype(rendered: String) -> Value {
    match serde_yaml::from_str::<Value>(&rendered) {
        Ok(typed @ (Value::Number(_) | Value::Bool(_))) => typed,
        _ => Value::String(rendered),
    }
}

fn parse_entries(text: &str, context: &str) -> Result<Vec<Value>> {
    match serde_yaml::from_str::<Value>(text).map_err(|e| parse_error(context, &e))? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(entries) => Ok(entries),
        _ => Err(ModelError::Parse {
            origin: context.to_string(),
            message: "services must be a list".into(),
        }),
    }
}

fn parse_error(context: &str, e: &serde_yaml::Error) -> ModelError {
    ModelError::Parse {
        origin: context.to_string(),
        message: e.to_string(),
    }
}
