//! `{{ var }}` substitution for cluster service templates.
//!
//! Variables come from a cluster's `vars` mapping and must be scalars.
//! Every placeholder must name a defined variable; unused variables are
//! ignored.

pub mod lexer;

use std::collections::BTreeMap;

use serde_yaml::Value;
use shaddock_common::error::ModelError;
use thiserror::Error;

use self::lexer::Segment;

/// Failure while rendering a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` does not open a well-formed placeholder.
    #[error("malformed placeholder at offset {offset}: \"{snippet}\"")]
    Syntax {
        /// Byte offset of the `{{`.
        offset: usize,
        /// Start of the offending text.
        snippet: String,
    },
    /// A placeholder names a variable that is not defined.
    #[error("undefined variable \"{0}\"")]
    Undefined(String),
    /// A placeholder names a sequence or mapping.
    #[error("variable \"{0}\" is not a scalar")]
    NotScalar(String),
}

impl TemplateError {
    /// Attaches the owning cluster, producing the workspace error.
    #[must_use]
    pub fn in_cluster(self, cluster: &str) -> ModelError {
        match self {
            Self::Undefined(variable) => ModelError::UndefinedVariable {
                cluster: cluster.to_string(),
                variable,
            },
            other => ModelError::TemplateSyntax {
                cluster: cluster.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Renders `template`, replacing each placeholder with its variable's value.
///
/// # Errors
///
/// Returns a [`TemplateError`] for malformed placeholders, undefined
/// variables, or non-scalar values.
pub fn render(template: &str, vars: &BTreeMap<String, Value>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for segment in lexer::tokenize(template)? {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Variable(name) => {
                let value = vars
                    .get(name)
                    .ok_or_else(|| TemplateError::Undefined(name.to_string()))?;
                out.push_str(&scalar_text(name, value)?);
            }
        }
    }
    Ok(out)
}

fn scalar_text(name: &str, value: &Value) -> Result<String, TemplateError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Tagged(tagged) => scalar_text(name, &tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(TemplateError::NotScalar(name.to_string())),
    }
}
