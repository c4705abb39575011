//! Model document loading and `!include` resolution.
//!
//! Loading happens in two phases. The text is first parsed into a generic
//! [`Value`] tree, then [`resolve_includes`] walks that tree and replaces
//! every `!include <path>` node with the parsed content of the named file.
//! Paths are relative to the directory of the file that carries the
//! directive.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use shaddock_common::constants::INCLUDE_TAG;
use shaddock_common::error::{ModelError, Result};

/// A parsed model document with every include spliced in.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File the document was read from, if any.
    pub source: Option<PathBuf>,
    /// Directory relative paths in the document are resolved against.
    pub base_dir: PathBuf,
    /// The include-free tree.
    pub root: Value,
}

impl Document {
    /// Parses in-memory text, resolving includes against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text or an included file cannot be parsed,
    /// or an include target is missing or circular.
    pub fn parse(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let root = parse_yaml(text, "<inline model>")?;
        let mut chain = IncludeChain::default();
        let root = resolve_includes(root, &base_dir, &mut chain)?;
        Ok(Self {
            source: None,
            base_dir,
            root,
        })
    }
}

/// Reads the root document at `path` and resolves all includes.
///
/// # Errors
///
/// Returns [`ModelError::Io`] if the root file cannot be read,
/// [`ModelError::Parse`] on malformed YAML, and the include errors of
/// [`resolve_includes`].
pub fn load(path: &Path) -> Result<Document> {
    tracing::info!(path = %path.display(), "loading model document");

    let text = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = parent_dir(path);
    let root = parse_yaml(&text, &path.display().to_string())?;

    let mut chain = IncludeChain::default();
    chain.push(canonical(path));
    let root = resolve_includes(root, &base_dir, &mut chain)?;

    Ok(Document {
        source: Some(path.to_path_buf()),
        base_dir,
        root,
    })
}

/// Files currently being loaded, outermost first.
#[derive(Debug, Default)]
pub struct IncludeChain {
    files: Vec<PathBuf>,
}

impl IncludeChain {
    fn push(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    fn pop(&mut self) {
        let _ = self.files.pop();
    }

    fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }

    fn describe(&self, last: &Path) -> String {
        self.files
            .iter()
            .map(|p| p.display().to_string())
            .chain(std::iter::once(last.display().to_string()))
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn current(&self) -> Option<&Path> {
        self.files.last().map(PathBuf::as_path)
    }
}

/// Replaces every `!include` node in `value`, depth-first.
///
/// Included content is itself resolved relative to its own directory.
/// Tags other than `!include` are kept, with their content resolved.
///
/// # Errors
///
/// Returns [`ModelError::IncludeNotFound`] for a missing target,
/// [`ModelError::CircularInclude`] when a file includes itself through any
/// chain, and [`ModelError::Parse`] for a non-string include argument or
/// malformed included text.
pub fn resolve_includes(value: Value, base_dir: &Path, chain: &mut IncludeChain) -> Result<Value> {
    match value {
        Value::Tagged(tagged) if is_include(&tagged.tag) => {
            let TaggedValue { value, .. } = *tagged;
            include(value, base_dir, chain)
        }
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            Ok(Value::Tagged(Box::new(TaggedValue {
                tag,
                value: resolve_includes(value, base_dir, chain)?,
            })))
        }
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| resolve_includes(item, base_dir, chain))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Value::Mapping(map) => {
            let mut resolved = Mapping::with_capacity(map.len());
            for (key, item) in map {
                let _ = resolved.insert(key, resolve_includes(item, base_dir, chain)?);
            }
            Ok(Value::Mapping(resolved))
        }
        scalar => Ok(scalar),
    }
}

fn include(target: Value, base_dir: &Path, chain: &mut IncludeChain) -> Result<Value> {
    let included_from = chain
        .current()
        .map_or_else(|| base_dir.to_path_buf(), Path::to_path_buf);

    let relative = match target {
        Value::String(relative) => relative,
        other => {
            return Err(ModelError::Parse {
                origin: included_from.display().to_string(),
                message: format!("!{INCLUDE_TAG} expects a file path, got {other:?}"),
            });
        }
    };

    let path = base_dir.join(&relative);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ModelError::IncludeNotFound {
                path,
                included_from,
            });
        }
        Err(source) => return Err(ModelError::Io { path, source }),
    };

    let key = canonical(&path);
    if chain.contains(&key) {
        return Err(ModelError::CircularInclude {
            chain: chain.describe(&key),
            path,
        });
    }
    tracing::debug!(path = %path.display(), from = %included_from.display(), "including file");

    let parsed = parse_yaml(&text, &path.display().to_string())?;
    chain.push(key);
    let resolved = resolve_includes(parsed, &parent_dir(&path), chain);
    chain.pop();
    resolved
}

fn is_include(tag: &Tag) -> bool {
    tag.to_string().trim_start_matches('!') == INCLUDE_TAG
}

fn parse_yaml(text: &str, origin: &str) -> Result<Value> {
    serde_yaml::from_str(text).map_err(|e| ModelError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map_or_else(PathBuf::new, Path::to_path_buf)
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
