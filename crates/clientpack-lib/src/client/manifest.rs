//! Bundler manifest (`package.json`) editing
//!
//! The bundler learns which aliased modules to emit from a list inside
//! `package.json`, `snowpack.install` by default. Only that list is touched;
//! every other key keeps its value and position.

use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Where in `package.json` the install list lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallListLocation {
    pub section: String,
    pub key: String,
}

impl Default for InstallListLocation {
    fn default() -> Self {
        Self {
            section: "snowpack".to_string(),
            key: "install".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest '{path}': {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write manifest '{path}': {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Manifest '{path}' is not valid JSON: {source}")]
    Parse {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error("Manifest '{path}' has a non-object or non-array at '{location}'")]
    Shape {
        path: std::path::PathBuf,
        location: String,
    },
}

/// Append `aliases` not already present to the install list in `manifest`.
///
/// Returns how many aliases were added. A missing manifest is created holding
/// only the install list.
pub fn merge_install_list(
    path: &Path,
    location: &InstallListLocation,
    aliases: &[String],
) -> Result<usize, ManifestError> {
    let mut root = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<Value>(&raw).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Object(Map::new()),
        Err(source) => {
            return Err(ManifestError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let added = merge_into(&mut root, location, aliases).ok_or_else(|| ManifestError::Shape {
        path: path.to_path_buf(),
        location: format!("{}.{}", location.section, location.key),
    })?;

    let mut rendered = serde_json::to_string_pretty(&root).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    rendered.push('\n');
    std::fs::write(path, rendered).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Merged {} new aliases into {}.{} of {}",
        added,
        location.section,
        location.key,
        path.display()
    );
    Ok(added)
}

/// `None` when the manifest shape does not allow a list at `location`.
fn merge_into(root: &mut Value, location: &InstallListLocation, aliases: &[String]) -> Option<usize> {
    let section = root
        .as_object_mut()?
        .entry(location.section.clone())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()?;
    let list = section
        .entry(location.key.clone())
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()?;

    let mut added = 0;
    for alias in aliases {
        if !list.iter().any(|v| v.as_str() == Some(alias.as_str())) {
            list.push(Value::String(alias.clone()));
            added += 1;
        }
    }
    Some(added)
}

#[cfg(test)]
mod tests {
    include!("manifest.test.rs");
}
