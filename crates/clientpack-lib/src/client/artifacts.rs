//! Read-only lookups against the published output tree

use super::exports::find_js_module_exports;
use super::layout::{ClientLayout, WEB_MODULES_DIR};
use super::store::ConfigStore;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A caller asked for a path that is not relative to the output tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid client build path '{path}': expected a relative path")]
pub struct InvalidPathError {
    pub path: String,
}

/// Accessor for modules and files in the live output tree
pub struct BuildArtifacts<'a> {
    store: &'a ConfigStore,
    layout: &'a ClientLayout,
}

impl<'a> BuildArtifacts<'a> {
    pub fn new(store: &'a ConfigStore, layout: &'a ClientLayout) -> Self {
        Self { store, layout }
    }

    /// Export names of the built module for the pair, followed by its declared
    /// extra exports. Empty when the pair is unknown or the module is absent.
    pub fn module_exports(&self, contributor: &str, package_name: &str) -> Vec<String> {
        let Some(entry) = self.store.get_entry(contributor, package_name) else {
            return Vec::new();
        };
        let Some(alias) = entry.alias.as_deref() else {
            return Vec::new();
        };

        let module = self.layout.module_file(alias);
        let source = match std::fs::read_to_string(&module) {
            Ok(source) => source,
            Err(e) => {
                debug!("No readable module at {}: {}", module.display(), e);
                return Vec::new();
            }
        };

        let mut names = find_js_module_exports(&source);
        for extra in entry.extra_exports {
            if !names.contains(&extra) {
                names.push(extra);
            }
        }
        names
    }

    /// URL of the built module for the pair, if it has been built
    pub fn module_url(&self, contributor: &str, package_name: &str) -> Option<String> {
        let alias = self.store.get_alias(contributor, package_name)?;
        if !self.layout.module_file(&alias).is_file() {
            return None;
        }
        Some(format!(
            "{}{}/{}.js",
            self.layout.url_prefix, WEB_MODULES_DIR, alias
        ))
    }

    /// Resolve a `/`-separated path relative to the output tree.
    ///
    /// Absolute input is rejected before the filesystem is touched; `None`
    /// means the path is well formed but nothing exists there.
    pub fn resolve_path(&self, relative: &str) -> Result<Option<PathBuf>, InvalidPathError> {
        let invalid = || InvalidPathError {
            path: relative.to_string(),
        };

        if relative.starts_with('/') || Path::new(relative).is_absolute() {
            return Err(invalid());
        }

        let mut resolved = self.layout.build_dir.clone();
        for part in relative.split('/').filter(|p| !p.is_empty()) {
            match Path::new(part).components().next() {
                Some(Component::Normal(_)) | Some(Component::CurDir) => resolved.push(part),
                _ => return Err(invalid()),
            }
        }

        Ok(resolved.exists().then_some(resolved))
    }
}

#[cfg(test)]
mod tests {
    include!("artifacts.test.rs");
}
