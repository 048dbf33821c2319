//! Command execution handlers
//!
//! Implements the Session-Scoped Dependency Injection Pattern: handlers only
//! reach the terminal, processes and configuration through the session.

use crate::application::session::{CommandSession, Session};
use crate::application::{CliConfig, Commands};
use crate::client::{
    BuildArtifacts, BuildOrchestrator, BuildReport, ClientLayout, ConfigStore,
    ContributorRegistry, DependencyEntry, NpmTool,
};
use anyhow::{Context, Result};
use tracing::debug;

/// Execute CLI commands using the session-based architecture
pub fn execute_command(config: CliConfig) -> Result<()> {
    // Create command session (owns all ephemeral state)
    let session = CommandSession::new(config.app_config);

    let command = match config.command {
        Some(cmd) => cmd,
        None => {
            session
                .display()
                .status()
                .message("clientpack - browser client bundle management");
            session
                .display()
                .status()
                .info("Run 'clientpack --help' for usage information");
            return Ok(());
        }
    };

    execute_command_with_session(command, &session)
}

/// Execute a specific command with a provided session (for testing)
pub fn execute_command_with_session(command: Commands, session: &dyn Session) -> Result<()> {
    if command.runs_external_tools() {
        debug!(
            "Using package manager '{}'",
            session.config().app_config().npm
        );
    }

    match command {
        Commands::Build {
            packages,
            contributor,
        } => handle_build(session, packages, contributor),
        Commands::Restore => handle_restore(session),
        Commands::List => handle_list(session),
        Commands::Discover => handle_discover(session),
        Commands::Exports {
            contributor,
            package,
        } => handle_exports(session, &contributor, &package),
        Commands::Url {
            contributor,
            package,
        } => handle_url(session, &contributor, &package),
        Commands::Path { relative_path } => handle_path(session, &relative_path),
        Commands::Version => handle_version(session),
    }
}

fn open_store(layout: &ClientLayout) -> Result<ConfigStore> {
    ConfigStore::open(&layout.store_path).with_context(|| {
        format!(
            "Failed to open build config at {}",
            layout.store_path.display()
        )
    })
}

fn load_registry(layout: &ClientLayout) -> Result<ContributorRegistry> {
    ContributorRegistry::from_directory(&layout.contrib_dir).with_context(|| {
        format!(
            "Failed to read contributors from {}",
            layout.contrib_dir.display()
        )
    })
}

fn handle_build(session: &dyn Session, packages: Vec<String>, contributor: String) -> Result<()> {
    let config = session.config().app_config();
    let layout = config.layout();
    let store = open_store(&layout)?;
    let registry = load_registry(&layout)?;
    let tool = NpmTool::new(config.npm.as_str(), session.process());

    let extra_entries: Vec<DependencyEntry> = packages
        .into_iter()
        .map(|package| DependencyEntry::new(contributor.as_str(), package))
        .collect();

    let report = BuildOrchestrator::new(&store, &registry, &tool, &layout, session.display())
        .build(extra_entries)
        .context("Client build failed")?;

    report_build(session, &layout, &report, "Client built");
    Ok(())
}

fn handle_restore(session: &dyn Session) -> Result<()> {
    let config = session.config().app_config();
    let layout = config.layout();
    let store = open_store(&layout)?;
    // Restore never consults contributors
    let registry = ContributorRegistry::new();
    let tool = NpmTool::new(config.npm.as_str(), session.process());

    let report = BuildOrchestrator::new(&store, &registry, &tool, &layout, session.display())
        .restore()
        .context("Client restore failed")?;

    report_build(session, &layout, &report, "Client restored");
    Ok(())
}

fn report_build(session: &dyn Session, layout: &ClientLayout, report: &BuildReport, what: &str) {
    let status = session.display().status();
    let details = if report.aliases.is_empty() {
        layout.build_dir.display().to_string()
    } else {
        format!(
            "{} ({} aliases)",
            layout.build_dir.display(),
            report.aliases.len()
        )
    };
    status.success(what, &details);
    if !report.discovery_errors.is_empty() {
        status.warning(&format!(
            "{} contributor(s) failed during discovery",
            report.discovery_errors.len()
        ));
    }
}

fn handle_list(session: &dyn Session) -> Result<()> {
    let layout = session.config().app_config().layout();
    let store = open_store(&layout)?;

    let entries = store.entries();
    if entries.is_empty() {
        session
            .display()
            .status()
            .info("No client dependencies registered");
        return Ok(());
    }

    let lines: Vec<String> = entries.iter().map(describe_entry).collect();
    let items: Vec<&str> = lines.iter().map(String::as_str).collect();
    session.display().status().list(&items);
    Ok(())
}

fn describe_entry(entry: &DependencyEntry) -> String {
    let alias = entry.alias.as_deref().unwrap_or("-");
    let mut line = format!("{} {} -> {}", entry.contributor, entry.package_name, alias);
    if !entry.extra_exports.is_empty() {
        line.push_str(&format!(" (+{})", entry.extra_exports.join(", ")));
    }
    line
}

fn handle_discover(session: &dyn Session) -> Result<()> {
    let layout = session.config().app_config().layout();
    let store = open_store(&layout)?;
    let registry = load_registry(&layout)?;

    if registry.is_empty() {
        session.display().status().info(&format!(
            "No contributors found in {}",
            layout.contrib_dir.display()
        ));
        return Ok(());
    }

    let discovery = registry.discover();

    // Preview the aliases a build would assign without touching the store
    let mut preview = store.snapshot();
    for entry in &discovery.entries {
        let alias = preview.upsert(entry);
        session.display().status().success(
            &format!("{} {}", entry.contributor, entry.package_name),
            &alias,
        );
    }
    for error in &discovery.errors {
        session.display().status().error(&error.to_string(), "");
    }

    session.display().status().info(&format!(
        "{} dependencies from {} contributors, {} failed",
        discovery.entries.len(),
        registry.len(),
        discovery.errors.len()
    ));
    Ok(())
}

fn handle_exports(session: &dyn Session, contributor: &str, package: &str) -> Result<()> {
    let layout = session.config().app_config().layout();
    let store = open_store(&layout)?;
    let artifacts = BuildArtifacts::new(&store, &layout);

    let exports = artifacts.module_exports(contributor, package);
    if exports.is_empty() {
        session.display().status().info(&format!(
            "No exports found for {} {}",
            contributor, package
        ));
        return Ok(());
    }

    let items: Vec<&str> = exports.iter().map(String::as_str).collect();
    session.display().status().list(&items);
    Ok(())
}

fn handle_url(session: &dyn Session, contributor: &str, package: &str) -> Result<()> {
    let layout = session.config().app_config().layout();
    let store = open_store(&layout)?;
    let artifacts = BuildArtifacts::new(&store, &layout);

    match artifacts.module_url(contributor, package) {
        Some(url) => {
            session.display().status().message(&url);
            Ok(())
        }
        None => anyhow::bail!(
            "No built module for {} {}; run 'clientpack build' first",
            contributor,
            package
        ),
    }
}

fn handle_path(session: &dyn Session, relative_path: &str) -> Result<()> {
    let layout = session.config().app_config().layout();
    let store = open_store(&layout)?;
    let artifacts = BuildArtifacts::new(&store, &layout);

    match artifacts.resolve_path(relative_path)? {
        Some(path) => {
            session.display().status().message(&path.display().to_string());
            Ok(())
        }
        None => anyhow::bail!(
            "Nothing at '{}' in {}",
            relative_path,
            layout.build_dir.display()
        ),
    }
}

fn handle_version(session: &dyn Session) -> Result<()> {
    session
        .display()
        .status()
        .message(&format!("clientpack {}", env!("CARGO_PKG_VERSION")));
    session
        .display()
        .status()
        .message("Builds browser client bundles from contributed JS dependencies");
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
