//! Staged client rebuilds
//!
//! A rebuild never works in the live tree. The template is copied into a
//! temporary staging directory, the bundler manifest is extended with the
//! registered aliases, and the external install and build steps run there.
//! Only a finished staged output replaces the live output tree.

use super::discovery::{ContributorRegistry, Discovery, DiscoveryError};
use super::fsutil;
use super::layout::ClientLayout;
use super::manifest::{self, InstallListLocation, ManifestError};
use super::store::{ConfigStore, DependencyEntry, StoreError};
use super::tools::{ExternalTool, ToolStep};
use crate::display::DisplayProvider;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};

/// Build system errors
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Client {step} failed: `{command}` exited with {}\n{stderr}", exit_label(.status))]
    ExternalTool {
        step: ToolStep,
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Failed to run client {step} `{command}`: {reason}")]
    ToolSpawn {
        step: ToolStep,
        command: String,
        reason: String,
    },

    #[error("Client build produced no output at '{path}'")]
    MissingOutput { path: PathBuf },

    #[error("Client template directory '{path}' does not exist")]
    MissingTemplate { path: PathBuf },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl BuildError {
    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BuildError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Summary of a successful build or restore
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// npm alias specs handed to the install step
    pub installed: Vec<String>,
    pub aliases: Vec<String>,
    pub discovery_errors: Vec<DiscoveryError>,
    /// Digest of the published output tree
    pub output_digest: String,
}

/// Coordinates discovery, staging, external tools and publication
pub struct BuildOrchestrator<'a> {
    store: &'a ConfigStore,
    registry: &'a ContributorRegistry,
    tool: &'a dyn ExternalTool,
    layout: &'a ClientLayout,
    display: &'a dyn DisplayProvider,
    install_list: InstallListLocation,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(
        store: &'a ConfigStore,
        registry: &'a ContributorRegistry,
        tool: &'a dyn ExternalTool,
        layout: &'a ClientLayout,
        display: &'a dyn DisplayProvider,
    ) -> Self {
        Self {
            store,
            registry,
            tool,
            layout,
            display,
            install_list: InstallListLocation::default(),
        }
    }

    /// Use a different `package.json` section/key for the install list
    pub fn with_install_list(mut self, location: InstallListLocation) -> Self {
        self.install_list = location;
        self
    }

    /// Register `extra_entries` and discovered dependencies, then rebuild.
    ///
    /// Until the final swap the live output tree is left untouched, so any
    /// failure leaves the previous bundle servable.
    pub fn build(&self, extra_entries: Vec<DependencyEntry>) -> Result<BuildReport, BuildError> {
        let discovery = self.update_store(extra_entries)?;

        let packages = self.store.all_aliased_dependencies();
        let aliases = self.store.all_aliases();
        info!("Building client with {} aliased dependencies", packages.len());

        let staging = self.stage()?;
        let staged_app = staging.path().join("app");
        manifest::merge_install_list(
            &staged_app.join("package.json"),
            &self.install_list,
            &aliases,
        )?;

        let install_message = if packages.is_empty() {
            "Installing dependencies".to_string()
        } else {
            format!("Installing {} dependencies", packages.len())
        };
        self.run_step(ToolStep::Install, &packages, &staged_app, &install_message)?;
        self.run_step(ToolStep::Build, &[], &staged_app, "Building client")?;

        let output_digest = self.publish(&staged_app)?;

        Ok(BuildReport {
            installed: packages,
            aliases,
            discovery_errors: discovery.errors,
            output_digest,
        })
    }

    /// Rebuild the pristine template and forget every registered alias.
    pub fn restore(&self) -> Result<BuildReport, BuildError> {
        info!("Restoring client from {}", self.layout.app_dir.display());

        let staging = self.stage()?;
        let staged_app = staging.path().join("app");

        self.run_step(ToolStep::Install, &[], &staged_app, "Installing dependencies")?;
        self.run_step(ToolStep::Build, &[], &staged_app, "Building client")?;

        let output_digest = self.publish(&staged_app)?;

        self.store.transact(|tx| {
            tx.clear();
            Ok::<_, BuildError>(())
        })?;

        Ok(BuildReport {
            output_digest,
            ..BuildReport::default()
        })
    }

    fn update_store(&self, extra_entries: Vec<DependencyEntry>) -> Result<Discovery, BuildError> {
        let spinner = self.display.progress().spinner("Discovering dependencies");

        let result = self.store.transact(|tx| {
            tx.update(extra_entries);
            let discovery = self.registry.discover();
            tx.update(discovery.entries.iter().cloned());
            Ok::<_, BuildError>(discovery)
        });

        let discovery = match result {
            Ok(discovery) => {
                spinner.finish_clear();
                discovery
            }
            Err(e) => {
                spinner.abandon("Dependency discovery failed");
                return Err(e);
            }
        };

        for error in &discovery.errors {
            self.display.status().error(&error.to_string(), "");
        }
        Ok(discovery)
    }

    /// Copy the template into a fresh staging directory as `<staging>/app`.
    fn stage(&self) -> Result<TempDir, BuildError> {
        let template = &self.layout.app_dir;
        if !template.is_dir() {
            return Err(BuildError::MissingTemplate {
                path: template.clone(),
            });
        }

        let staging = tempfile::Builder::new()
            .prefix("clientpack-")
            .tempdir()
            .map_err(|e| BuildError::io("Failed to create staging directory", e))?;
        let staged_app = staging.path().join("app");

        fsutil::copy_tree(template, &staged_app, &self.layout.staging_exclusions()).map_err(
            |e| {
                BuildError::io(
                    format!("Failed to copy {} into staging", template.display()),
                    e,
                )
            },
        )?;

        debug!("Staged {} at {}", template.display(), staged_app.display());
        Ok(staging)
    }

    fn run_step(
        &self,
        step: ToolStep,
        packages: &[String],
        cwd: &Path,
        message: &str,
    ) -> Result<(), BuildError> {
        let spinner = self.display.progress().spinner(message);
        let command = self.tool.command_line(step, packages);

        let result = match step {
            ToolStep::Install => self.tool.install(packages, cwd),
            ToolStep::Build => self.tool.build(cwd),
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                spinner.abandon(&format!("{} failed", message));
                return Err(BuildError::ToolSpawn {
                    step,
                    command,
                    reason: format!("{:#}", e),
                });
            }
        };

        if !output.success {
            spinner.abandon(&format!("{} failed", message));
            return Err(BuildError::ExternalTool {
                step,
                command,
                status: output.status,
                stderr: output.stderr,
            });
        }

        spinner.finish(message);
        Ok(())
    }

    /// Swap the staged output into the live tree and fingerprint the result.
    fn publish(&self, staged_app: &Path) -> Result<String, BuildError> {
        let staged_output = self.layout.staged_output(staged_app);
        if !staged_output.is_dir() {
            return Err(BuildError::MissingOutput {
                path: staged_output,
            });
        }

        let live = &self.layout.build_dir;
        fsutil::replace_tree(&staged_output, live).map_err(|e| {
            BuildError::io(format!("Failed to publish client build to {}", live.display()), e)
        })?;

        let digest = fsutil::tree_digest(live)
            .map_err(|e| BuildError::io(format!("Failed to fingerprint {}", live.display()), e))?;
        info!("Published client build to {} ({})", live.display(), digest);
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    include!("builds.test.rs");
}
