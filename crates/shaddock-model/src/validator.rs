//! Shape checks on raw model entries before they become typed records.
//!
//! Named entries (clusters, services, hosts) are checked here so that a
//! missing `name` is reported as such rather than as a generic parse error.

use serde::de::DeserializeOwned;
use serde_yaml::Value;
use shaddock_common::error::{ModelError, Result};

/// Checks that every entry is a mapping with a string `name` property.
///
/// # Errors
///
/// Returns [`ModelError::MissingNameProperty`] for the first offending entry.
pub fn require_names(entries: &[Value], kind: &'static str, context: &str) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        let named = entry
            .as_mapping()
            .and_then(|m| m.get("name"))
            .is_some_and(Value::is_string);
        if !named {
            return Err(ModelError::MissingNameProperty {
                kind,
                index,
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

/// Checks names, then deserializes every entry into `T`.
///
/// # Errors
///
/// Returns [`ModelError::MissingNameProperty`] or a [`ModelError::Parse`]
/// naming `context` when an entry does not fit `T`.
pub fn named_entries<T: DeserializeOwned>(
    entries: Vec<Value>,
    kind: &'static str,
    context: &str,
) -> Result<Vec<T>> {
    require_names(&entries, kind, context)?;
    entries
        .into_iter()
        .map(|entry| {
            serde_yaml::from_value(entry).map_err(|e| ModelError::Parse {
                origin: context.to_string(),
                message: format!("invalid {kind} definition: {e}"),
            })
        })
        .collect()
}
