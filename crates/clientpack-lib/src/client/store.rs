//! Transactional build configuration store
//!
//! Records which JS dependencies the client needs and the alias each one is
//! installed under. Changes go through a [`Transaction`] that holds a working
//! copy; the copy replaces the committed state only after it validates and has
//! been written to disk.

use super::alias;
use super::fsutil;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, trace};

/// On-disk schema version
pub const STORE_VERSION: u64 = 1;

/// One JS dependency requested by a contributor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    pub contributor: String,
    /// npm package spec, optionally with a version requirement
    pub package_name: String,
    /// Preferred alias on input, assigned alias on output
    pub alias: Option<String>,
    pub extra_exports: Vec<String>,
}

impl DependencyEntry {
    pub fn new(contributor: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            contributor: contributor.into(),
            package_name: package_name.into(),
            alias: None,
            extra_exports: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_extra_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_exports = dedup(exports.into_iter().map(Into::into));
        self
    }

    /// Check the entry on its own, before it reaches a transaction.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.contributor.trim().is_empty() {
            return Err(ConfigValidationError::EmptyContributor {
                package_name: self.package_name.clone(),
            });
        }
        if self.package_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPackage {
                contributor: self.contributor.clone(),
            });
        }
        if let Some(preferred) = &self.alias {
            if !alias::is_filesystem_safe(&alias::normalize(preferred)) {
                return Err(ConfigValidationError::InvalidAlias {
                    alias: preferred.clone(),
                    contributor: self.contributor.clone(),
                    package_name: self.package_name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Alias and extra exports recorded for a `(contributor, package)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub alias: String,
    #[serde(default)]
    pub extra_exports: Vec<String>,
}

/// Insertion-ordered contents of the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildConfig {
    dependencies: IndexMap<String, IndexMap<String, AliasRecord>>,
}

impl BuildConfig {
    pub fn is_empty(&self) -> bool {
        self.dependencies.values().all(IndexMap::is_empty)
    }

    pub fn len(&self) -> usize {
        self.dependencies.values().map(IndexMap::len).sum()
    }

    pub fn clear(&mut self) {
        self.dependencies.clear();
    }

    /// Alias already recorded for the pair
    pub fn resolve(&self, contributor: &str, package_name: &str) -> Option<&str> {
        self.dependencies
            .get(contributor)
            .and_then(|packages| packages.get(package_name))
            .map(|record| record.alias.as_str())
    }

    pub fn record(&self, contributor: &str, package_name: &str) -> Option<&AliasRecord> {
        self.dependencies
            .get(contributor)
            .and_then(|packages| packages.get(package_name))
    }

    /// Return the recorded alias for the pair, or pick and record a new one.
    pub fn assign(
        &mut self,
        contributor: &str,
        package_name: &str,
        preferred: Option<&str>,
    ) -> String {
        if let Some(existing) = self.resolve(contributor, package_name) {
            return existing.to_string();
        }

        let base = match preferred {
            Some(preferred) => alias::normalize(preferred),
            None => alias::derive_alias(contributor, package_name),
        };
        let chosen = alias::first_free(&base, |candidate| self.alias_in_use(candidate));

        trace!(
            "Assigned alias '{}' to {}/{}",
            chosen, contributor, package_name
        );
        self.dependencies
            .entry(contributor.to_string())
            .or_default()
            .insert(
                package_name.to_string(),
                AliasRecord {
                    alias: chosen.clone(),
                    extra_exports: Vec::new(),
                },
            );
        chosen
    }

    /// Register an entry; an existing pair keeps its alias and only has its
    /// extra exports replaced.
    pub fn upsert(&mut self, entry: &DependencyEntry) -> String {
        let alias = self.assign(
            &entry.contributor,
            &entry.package_name,
            entry.alias.as_deref(),
        );
        if let Some(record) = self
            .dependencies
            .get_mut(&entry.contributor)
            .and_then(|packages| packages.get_mut(&entry.package_name))
        {
            record.extra_exports = dedup(entry.extra_exports.iter().cloned());
        }
        alias
    }

    pub fn aliases(&self) -> Vec<String> {
        self.iter().map(|(_, _, record)| record.alias.clone()).collect()
    }

    /// npm alias install specs: `{alias}@npm:{package_name}`
    pub fn aliased_dependencies(&self) -> Vec<String> {
        self.iter()
            .map(|(_, package, record)| format!("{}@npm:{}", record.alias, package))
            .collect()
    }

    pub fn entries(&self) -> Vec<DependencyEntry> {
        self.iter()
            .map(|(contributor, package, record)| DependencyEntry {
                contributor: contributor.to_string(),
                package_name: package.to_string(),
                alias: Some(record.alias.clone()),
                extra_exports: record.extra_exports.clone(),
            })
            .collect()
    }

    /// Check names, alias shape and alias uniqueness.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let mut owners: IndexMap<String, String> = IndexMap::new();

        for (contributor, package, record) in self.iter() {
            if contributor.trim().is_empty() {
                return Err(ConfigValidationError::EmptyContributor {
                    package_name: package.to_string(),
                });
            }
            if package.trim().is_empty() {
                return Err(ConfigValidationError::EmptyPackage {
                    contributor: contributor.to_string(),
                });
            }
            if !alias::is_filesystem_safe(&record.alias) {
                return Err(ConfigValidationError::InvalidAlias {
                    alias: record.alias.clone(),
                    contributor: contributor.to_string(),
                    package_name: package.to_string(),
                });
            }

            let owner = format!("{}/{}", contributor, package);
            let key = record.alias.to_ascii_lowercase();
            if let Some(first) = owners.get(&key) {
                return Err(ConfigValidationError::DuplicateAlias {
                    alias: record.alias.clone(),
                    first: first.clone(),
                    second: owner,
                });
            }
            owners.insert(key, owner);
        }

        Ok(())
    }

    fn alias_in_use(&self, candidate: &str) -> bool {
        self.iter()
            .any(|(_, _, record)| alias::same_alias(&record.alias, candidate))
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str, &AliasRecord)> {
        self.dependencies.iter().flat_map(|(contributor, packages)| {
            packages
                .iter()
                .map(move |(package, record)| (contributor.as_str(), package.as_str(), record))
        })
    }
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[derive(Serialize, Deserialize)]
struct StoreFile {
    version: u64,
    #[serde(default)]
    dependencies: BuildConfig,
}

/// Validation failures that abort a commit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("Dependency '{package_name}' has an empty contributor name")]
    EmptyContributor { package_name: String },

    #[error("Contributor '{contributor}' declared an empty package name")]
    EmptyPackage { contributor: String },

    #[error("Alias '{alias}' for {contributor}/{package_name} is not filesystem safe")]
    InvalidAlias {
        alias: String,
        contributor: String,
        package_name: String,
    },

    #[error("Alias '{alias}' is assigned to both {first} and {second}")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
}

/// Configuration store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access build config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse build config '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported build config version {found} in '{path}' (expected 1)")]
    UnsupportedVersion { path: PathBuf, found: String },

    #[error("A build config transaction is already open")]
    TransactionInProgress,

    #[error("Invalid build config: {0}")]
    Validation(#[from] ConfigValidationError),
}

/// Authoritative store, constructed once per process and passed by reference
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    committed: RwLock<BuildConfig>,
    in_transaction: AtomicBool,
}

impl ConfigStore {
    /// Load the store at `path`; a missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let config = Self::load(&path)?;
        debug!(
            "Opened build config {} with {} entries",
            path.display(),
            config.len()
        );

        Ok(Self {
            path,
            committed: RwLock::new(config),
            in_transaction: AtomicBool::new(false),
        })
    }

    fn load(path: &Path) -> Result<BuildConfig, StoreError> {
        let raw = match std::fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BuildConfig::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let value: serde_json::Value =
            serde_json::from_slice(&raw).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        match value.get("version").and_then(serde_json::Value::as_u64) {
            Some(STORE_VERSION) => {}
            _ => {
                return Err(StoreError::UnsupportedVersion {
                    path: path.to_path_buf(),
                    found: value
                        .get("version")
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "<missing>".to_string()),
                });
            }
        }

        let file: StoreFile = serde_json::from_value(value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.dependencies)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the committed state
    pub fn snapshot(&self) -> BuildConfig {
        self.read().clone()
    }

    pub fn get_alias(&self, contributor: &str, package_name: &str) -> Option<String> {
        self.read()
            .resolve(contributor, package_name)
            .map(str::to_string)
    }

    pub fn get_entry(&self, contributor: &str, package_name: &str) -> Option<DependencyEntry> {
        self.read()
            .record(contributor, package_name)
            .map(|record| DependencyEntry {
                contributor: contributor.to_string(),
                package_name: package_name.to_string(),
                alias: Some(record.alias.clone()),
                extra_exports: record.extra_exports.clone(),
            })
    }

    pub fn all_aliases(&self) -> Vec<String> {
        self.read().aliases()
    }

    pub fn all_aliased_dependencies(&self) -> Vec<String> {
        self.read().aliased_dependencies()
    }

    pub fn entries(&self) -> Vec<DependencyEntry> {
        self.read().entries()
    }

    pub fn is_transaction_open(&self) -> bool {
        self.in_transaction.load(Ordering::Acquire)
    }

    /// Open the single transaction this store allows.
    pub fn begin_transaction(&self) -> Result<Transaction<'_>, StoreError> {
        if self
            .in_transaction
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StoreError::TransactionInProgress);
        }

        trace!("Opened build config transaction");
        Ok(Transaction {
            store: self,
            working: self.snapshot(),
            state: TransactionState::Open,
        })
    }

    /// Run `f` inside a transaction, committing on `Ok` and rolling back on `Err`.
    pub fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut tx = self.begin_transaction()?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tx.rollback();
                Err(e)
            }
        }
    }

    fn publish(&self, config: BuildConfig) -> Result<(), StoreError> {
        config.validate()?;

        let file = StoreFile {
            version: STORE_VERSION,
            dependencies: config,
        };
        let mut bytes = serde_json::to_vec_pretty(&file).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        bytes.push(b'\n');
        fsutil::atomic_write(&self.path, &bytes).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            "Committed {} build config entries to {}",
            file.dependencies.len(),
            self.path.display()
        );
        *self
            .committed
            .write()
            .unwrap_or_else(PoisonError::into_inner) = file.dependencies;
        Ok(())
    }

    fn release(&self) {
        self.in_transaction.store(false, Ordering::Release);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BuildConfig> {
        self.committed.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lifecycle of a [`Transaction`]; the store is idle when none is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Open,
    Committed,
    RolledBack,
}

/// Working copy of the store; dropping an open transaction rolls it back
#[derive(Debug)]
pub struct Transaction<'a> {
    store: &'a ConfigStore,
    working: BuildConfig,
    state: TransactionState,
}

impl Transaction<'_> {
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Apply entries to the working copy, returning their aliases.
    pub fn update<I>(&mut self, entries: I) -> Vec<String>
    where
        I: IntoIterator<Item = DependencyEntry>,
    {
        entries
            .into_iter()
            .map(|entry| self.working.upsert(&entry))
            .collect()
    }

    /// Drop every entry from the working copy
    pub fn clear(&mut self) {
        self.working.clear();
    }

    pub fn get_alias(&self, contributor: &str, package_name: &str) -> Option<String> {
        self.working
            .resolve(contributor, package_name)
            .map(str::to_string)
    }

    pub fn working(&self) -> &BuildConfig {
        &self.working
    }

    /// Validate, persist and publish the working copy.
    ///
    /// On failure the store keeps its last committed state on disk and in memory.
    pub fn commit(mut self) -> Result<(), StoreError> {
        let working = std::mem::take(&mut self.working);
        let result = self.store.publish(working);
        self.state = match result {
            Ok(()) => TransactionState::Committed,
            Err(_) => TransactionState::RolledBack,
        };
        self.store.release();
        result
    }

    pub fn rollback(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if self.state == TransactionState::Open {
            self.state = TransactionState::RolledBack;
            self.store.release();
            trace!("Rolled back build config transaction");
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    include!("store.test.rs");
}
