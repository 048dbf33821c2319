//! External package manager and bundler adapter
//!
//! The orchestrator never spawns processes itself; it talks to an
//! [`ExternalTool`]. [`NpmTool`] is the production adapter and runs through the
//! session's `ProcessProvider`, so hermetic tests can swap in mock executables.

use crate::application::session::{ProcessOutput, ProcessProvider};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Which external invocation a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStep {
    Install,
    Build,
}

impl fmt::Display for ToolStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStep::Install => write!(f, "install"),
            ToolStep::Build => write!(f, "build"),
        }
    }
}

/// Dependency installer plus bundler, invoked as black boxes
pub trait ExternalTool {
    /// Program name used when reporting failures
    fn program(&self) -> &str;

    /// Install `packages` (npm alias specs) into the tree at `cwd`
    fn install(&self, packages: &[String], cwd: &Path) -> anyhow::Result<ProcessOutput>;

    /// Produce the bundle for the tree at `cwd`
    fn build(&self, cwd: &Path) -> anyhow::Result<ProcessOutput>;

    /// Human readable command line for `step`
    fn command_line(&self, step: ToolStep, packages: &[String]) -> String {
        let args = match step {
            ToolStep::Install => install_args(packages),
            ToolStep::Build => build_args(),
        };
        std::iter::once(self.program().to_string())
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn install_args(packages: &[String]) -> Vec<String> {
    std::iter::once("install".to_string())
        .chain(packages.iter().cloned())
        .collect()
}

fn build_args() -> Vec<String> {
    vec!["run".to_string(), "build".to_string()]
}

/// `npm install <packages...>` and `npm run build`
pub struct NpmTool<'a> {
    program: String,
    process: &'a dyn ProcessProvider,
}

impl<'a> NpmTool<'a> {
    pub fn new(program: impl Into<String>, process: &'a dyn ProcessProvider) -> Self {
        Self {
            program: program.into(),
            process,
        }
    }

    fn run(&self, args: Vec<String>, cwd: &Path) -> anyhow::Result<ProcessOutput> {
        debug!("Running {} {} in {}", self.program, args.join(" "), cwd.display());
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.process.execute(&self.program, &args, cwd)
    }
}

impl ExternalTool for NpmTool<'_> {
    fn program(&self) -> &str {
        &self.program
    }

    fn install(&self, packages: &[String], cwd: &Path) -> anyhow::Result<ProcessOutput> {
        self.run(install_args(packages), cwd)
    }

    fn build(&self, cwd: &Path) -> anyhow::Result<ProcessOutput> {
        self.run(build_args(), cwd)
    }
}

#[cfg(test)]
mod tests {
    include!("tools.test.rs");
}
