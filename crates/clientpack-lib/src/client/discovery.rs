//! Contributor discovery
//!
//! Contributors are independently installed backend packages that declare the
//! JS dependencies they need. The registry invokes each one in turn; a failing
//! or panicking contributor is recorded and skipped so the others still count.

use super::store::DependencyEntry;
use anyhow::Context;
use serde::Deserialize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// A source of JS dependency declarations
pub trait Contributor {
    fn name(&self) -> &str;

    fn dependencies(&self) -> anyhow::Result<Vec<DependencyEntry>>;
}

/// One contributor failed to report its dependencies
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{contributor} failed because {cause}")]
pub struct DiscoveryError {
    pub contributor: String,
    pub cause: String,
}

/// Outcome of a discovery pass
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub entries: Vec<DependencyEntry>,
    pub errors: Vec<DiscoveryError>,
}

/// Contributor registered programmatically with a fixed list
#[derive(Debug, Clone)]
pub struct StaticContributor {
    name: String,
    entries: Vec<DependencyEntry>,
}

impl StaticContributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        let entry = DependencyEntry::new(self.name.clone(), package_name);
        self.entries.push(entry);
        self
    }

    pub fn with_entry(mut self, entry: DependencyEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

impl Contributor for StaticContributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> anyhow::Result<Vec<DependencyEntry>> {
        Ok(self.entries.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Declaration {
    name: Option<String>,
    #[serde(default, rename = "dependency")]
    dependencies: Vec<DeclaredDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclaredDependency {
    package: String,
    alias: Option<String>,
    #[serde(default)]
    extra_exports: Vec<String>,
}

/// Contributor backed by a TOML declaration file
///
/// ```toml
/// name = "widgets"
///
/// [[dependency]]
/// package = "left-pad@^1.3.0"
/// extra_exports = ["leftPad"]
/// ```
#[derive(Debug)]
pub struct ManifestContributor {
    path: PathBuf,
    name: String,
    declaration: Result<Declaration, String>,
}

impl ManifestContributor {
    /// Read the declaration eagerly so `name` can come from the file.
    ///
    /// A file that cannot be read or parsed still yields a contributor named
    /// after its stem; the problem surfaces from `dependencies()`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let declaration = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|raw| {
                toml::from_str::<Declaration>(&raw)
                    .with_context(|| format!("Invalid declaration {}", path.display()))
            })
            .map_err(|e| format!("{:#}", e));

        let name = match &declaration {
            Ok(Declaration {
                name: Some(name), ..
            }) if !name.trim().is_empty() => name.clone(),
            _ => stem,
        };

        Self {
            path,
            name,
            declaration,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Contributor for ManifestContributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> anyhow::Result<Vec<DependencyEntry>> {
        let declaration = self
            .declaration
            .as_ref()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(declaration
            .dependencies
            .iter()
            .map(|dep| {
                let entry = DependencyEntry::new(self.name.clone(), dep.package.clone())
                    .with_extra_exports(dep.extra_exports.iter().cloned());
                match &dep.alias {
                    Some(alias) => entry.with_alias(alias.clone()),
                    None => entry,
                }
            })
            .collect())
    }
}

/// Ordered set of contributors
#[derive(Default)]
pub struct ContributorRegistry {
    contributors: Vec<Box<dyn Contributor>>,
}

impl ContributorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `ManifestContributor` per `*.toml` file in `dir`, sorted by file name.
    /// A missing directory yields an empty registry.
    pub fn from_directory(dir: &Path) -> std::io::Result<Self> {
        let mut registry = Self::new();

        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No contributors directory at {}", dir.display());
                return Ok(registry);
            }
            Err(e) => return Err(e),
        };

        let mut files = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            registry.register(ManifestContributor::load(path));
        }

        debug!(
            "Registered {} contributors from {}",
            registry.len(),
            dir.display()
        );
        Ok(registry)
    }

    pub fn register(&mut self, contributor: impl Contributor + 'static) {
        self.contributors.push(Box::new(contributor));
    }

    pub fn with(mut self, contributor: impl Contributor + 'static) -> Self {
        self.register(contributor);
        self
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.contributors.iter().map(|c| c.name()).collect()
    }

    /// Invoke every contributor in registration order.
    ///
    /// Entries are re-tagged with the name of the contributor that returned
    /// them. Errors, panics and invalid entries become `DiscoveryError`s.
    pub fn discover(&self) -> Discovery {
        let mut discovery = Discovery::default();

        for contributor in &self.contributors {
            let name = contributor.name().to_string();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| contributor.dependencies()));

            let cause = match outcome {
                Ok(Ok(entries)) => {
                    let entries: Vec<DependencyEntry> = entries
                        .into_iter()
                        .map(|entry| DependencyEntry {
                            contributor: name.clone(),
                            ..entry
                        })
                        .collect();

                    // One bad entry drops everything this contributor declared
                    match entries.iter().try_for_each(DependencyEntry::validate) {
                        Ok(()) => {
                            debug!("Contributor {} declared {} dependencies", name, entries.len());
                            discovery.entries.extend(entries);
                            continue;
                        }
                        Err(e) => e.to_string(),
                    }
                }
                Ok(Err(e)) => format!("{:#}", e),
                Err(payload) => panic_message(payload.as_ref()),
            };

            warn!("Contributor {} failed: {}", name, cause);
            discovery.errors.push(DiscoveryError {
                contributor: name,
                cause,
            });
        }

        discovery
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panic: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panic: {}", msg)
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    include!("discovery.test.rs");
}
