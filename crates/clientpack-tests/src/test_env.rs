//! Hermetic test environment for E2E testing
//!
//! Creates isolated working directories with mock executables on a private
//! PATH, so client builds run the real process plumbing without npm.

use anyhow::{Context, Result};
use clientpack_lib::application::config::AppConfig;
use clientpack_lib::application::session::{
    CommandSession, LiveConfigProvider, LiveProcessProvider,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Template `package.json` written by [`TestEnvironment::init_client_project`]
pub const TEMPLATE_PACKAGE_JSON: &str = r#"{
  "name": "client",
  "private": true,
  "scripts": {
    "build": "snowpack build"
  },
  "snowpack": {
    "install": ["htm"]
  }
}
"#;

/// Hermetic test environment with mock executables
pub struct TestEnvironment {
    /// Temporary directory for the test environment
    pub temp_dir: TempDir,
    /// Path to the test environment root
    pub root_path: PathBuf,
    /// Path to the bin directory containing mock executables
    pub bin_path: PathBuf,
    /// Path to the work directory for test projects
    pub work_path: PathBuf,
    /// Mock executable configurations
    mock_executables: HashMap<String, MockExecutable>,
}

/// Configuration for a mock executable
#[derive(Debug, Clone)]
pub struct MockExecutable {
    /// Name of the executable
    pub name: String,
    /// Mock implementation behavior
    pub behavior: MockBehavior,
    /// Log file path for recording calls
    pub log_path: PathBuf,
}

/// Mock executable behavior configuration
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeed with empty output
    AlwaysSucceed,
    /// Always fail with error message
    AlwaysFail { error: String },
    /// Succeed with specific output
    SucceedWithOutput { stdout: String, stderr: String },
    /// Write `build/web_modules/<alias>.js` for each alias, relative to the
    /// working directory, the way the bundler would
    EmitModules { aliases: Vec<String> },
    /// Conditional behavior based on arguments
    Conditional { rules: Vec<ConditionalRule> },
}

/// Conditional rule for mock executable behavior
#[derive(Debug, Clone)]
pub struct ConditionalRule {
    /// Arguments pattern to match
    pub args_pattern: Vec<String>,
    /// Behavior when pattern matches
    pub behavior: MockBehavior,
}

impl ConditionalRule {
    pub fn new(args: &[&str], behavior: MockBehavior) -> Self {
        Self {
            args_pattern: args.iter().map(|s| s.to_string()).collect(),
            behavior,
        }
    }
}

impl MockBehavior {
    /// npm that installs anything and bundles `aliases`
    pub fn npm_bundling(aliases: &[&str]) -> Self {
        MockBehavior::Conditional {
            rules: vec![ConditionalRule::new(
                &["run", "build"],
                MockBehavior::EmitModules {
                    aliases: aliases.iter().map(|s| s.to_string()).collect(),
                },
            )],
        }
    }

    /// npm whose install step fails with `error`
    pub fn npm_failing_install(error: &str) -> Self {
        MockBehavior::Conditional {
            rules: vec![ConditionalRule {
                args_pattern: vec!["install".to_string()],
                behavior: MockBehavior::AlwaysFail {
                    error: error.to_string(),
                },
            }],
        }
    }
}

impl TestEnvironment {
    /// Create a new hermetic test environment
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root_path = temp_dir.path().to_path_buf();
        let bin_path = root_path.join("bin");
        let work_path = root_path.join("work");

        fs::create_dir_all(&bin_path)?;
        fs::create_dir_all(&work_path)?;

        Ok(Self {
            temp_dir,
            root_path,
            bin_path,
            work_path,
            mock_executables: HashMap::new(),
        })
    }

    /// Add a mock executable to the environment
    pub fn add_mock_executable(&mut self, name: &str, behavior: MockBehavior) -> Result<()> {
        let log_path = self.root_path.join(format!("{}.log", name));
        let executable_path = self.bin_path.join(name);

        let script_content = generate_mock_script(name, &behavior, &log_path)?;
        fs::write(&executable_path, script_content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&executable_path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&executable_path, perms)?;
        }

        self.mock_executables.insert(
            name.to_string(),
            MockExecutable {
                name: name.to_string(),
                behavior,
                log_path,
            },
        );
        Ok(())
    }

    /// Registered mock executable, if any
    pub fn mock_executable(&self, name: &str) -> Option<&MockExecutable> {
        self.mock_executables.get(name)
    }

    /// Get the PATH environment variable for this test environment
    pub fn get_path_env(&self) -> String {
        format!(
            "{}:{}",
            self.bin_path.display(),
            std::env::var("PATH").unwrap_or_default()
        )
    }

    /// Get the log contents for a mock executable
    pub fn get_mock_log(&self, executable_name: &str) -> Result<String> {
        let log_path = self.root_path.join(format!("{}.log", executable_name));
        if log_path.exists() {
            Ok(fs::read_to_string(log_path)?)
        } else {
            Ok(String::new())
        }
    }

    /// Arguments of every call made to a mock executable, in order
    pub fn get_mock_calls(&self, executable_name: &str) -> Result<Vec<String>> {
        let log_content = self.get_mock_log(executable_name)?;
        let prefix = format!("{} ", executable_name);
        Ok(log_content
            .lines()
            .filter_map(|line| {
                // Lines look like "<date> <time> <name> <args...>"
                let mut parts = line.splitn(3, ' ');
                let _date = parts.next()?;
                let _time = parts.next()?;
                let call = parts.next()?;
                Some(
                    call.strip_prefix(&prefix)
                        .unwrap_or_else(|| call.trim_start_matches(executable_name))
                        .to_string(),
                )
            })
            .collect())
    }

    /// Verify that a mock executable was called with specific arguments
    pub fn verify_mock_call(&self, executable_name: &str, args: &[&str]) -> Result<bool> {
        let expected = args.join(" ");
        Ok(self.get_mock_calls(executable_name)?.contains(&expected))
    }

    /// Create a client working directory with a template at `app/`
    pub fn init_client_project(&self, project_name: &str) -> Result<PathBuf> {
        let project_path = self.work_path.join(project_name);
        let app_dir = project_path.join("app");
        fs::create_dir_all(app_dir.join("src"))?;
        fs::write(app_dir.join("package.json"), TEMPLATE_PACKAGE_JSON)?;
        fs::write(
            app_dir.join("src").join("index.js"),
            "import htm from 'htm';\nexport default htm;\n",
        )?;
        Ok(project_path)
    }

    /// Declare a contributor in `<project>/contributors/<stem>.toml`
    pub fn add_contributor(&self, project_path: &Path, stem: &str, declaration: &str) -> Result<()> {
        let dir = project_path.join("contributors");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{}.toml", stem)), declaration)
            .with_context(|| format!("Failed to write contributor {}", stem))
    }
}

/// Generate mock script content for an executable
fn generate_mock_script(name: &str, behavior: &MockBehavior, log_path: &Path) -> Result<String> {
    let log_path_str = log_path
        .to_str()
        .context("Mock log path is not valid UTF-8")?;

    let behavior_code = match behavior {
        MockBehavior::Conditional { rules } => {
            let mut code = String::new();
            for rule in rules {
                let pattern = rule.args_pattern.join(" ");
                // A single-word pattern matches the subcommand regardless of its arguments
                let test = if rule.args_pattern.len() == 1 {
                    format!("[ \"$1\" = \"{}\" ]", pattern)
                } else {
                    format!("[ \"$*\" = \"{}\" ]", pattern)
                };
                code.push_str(&format!("if {}; then\n", test));
                code.push_str(&format!("  {}\n", generate_behavior_code(&rule.behavior)));
                code.push_str("fi\n");
            }
            code.push_str("exit 0"); // Default success
            code
        }
        other => generate_behavior_code(other),
    };

    Ok(format!(
        r#"#!/bin/bash
# Mock executable: {name}
# Log all calls to: {log}

# Log the call
echo "$(date '+%Y-%m-%d %H:%M:%S') {name} $*" >> "{log}"

# Execute behavior
{behavior}
"#,
        name = name,
        log = log_path_str,
        behavior = behavior_code
    ))
}

/// Generate one-line behavior code
fn generate_behavior_code(behavior: &MockBehavior) -> String {
    match behavior {
        MockBehavior::AlwaysSucceed => "exit 0".to_string(),
        MockBehavior::AlwaysFail { error } => format!("echo '{}' >&2; exit 1", error),
        MockBehavior::SucceedWithOutput { stdout, stderr } => {
            let mut code = String::new();
            if !stdout.is_empty() {
                code.push_str(&format!("echo '{}'; ", stdout));
            }
            if !stderr.is_empty() {
                code.push_str(&format!("echo '{}' >&2; ", stderr));
            }
            code.push_str("exit 0");
            code
        }
        MockBehavior::EmitModules { aliases } => {
            let mut code = String::from("mkdir -p build/web_modules; ");
            for alias in aliases {
                code.push_str(&format!(
                    "printf 'export default \"%s\";\\n' '{alias}' > build/web_modules/{alias}.js; ",
                    alias = alias
                ));
            }
            code.push_str("echo '<!doctype html>' > build/index.html; exit 0");
            code
        }
        MockBehavior::Conditional { .. } => "exit 0".to_string(), // Nested conditionals not supported
    }
}

/// Builder for hermetic sessions running against mock executables
pub struct HermeticSessionBuilder {
    test_env: TestEnvironment,
    app_config: AppConfig,
}

impl HermeticSessionBuilder {
    /// Create a new hermetic session builder
    pub fn new() -> Result<Self> {
        Ok(Self {
            test_env: TestEnvironment::new()?,
            app_config: AppConfig::default(),
        })
    }

    /// Add a mock executable to the test environment
    pub fn with_mock_executable(mut self, name: &str, behavior: MockBehavior) -> Result<Self> {
        self.test_env.add_mock_executable(name, behavior)?;
        Ok(self)
    }

    /// Set the working directory for the app config
    pub fn with_workdir(mut self, workdir: PathBuf) -> Self {
        self.app_config.workdir = Some(workdir);
        self
    }

    /// Initialize a client project and use it as the working directory
    pub fn with_client_project(mut self, project_name: &str) -> Result<Self> {
        let project_path = self.test_env.init_client_project(project_name)?;
        self.app_config.workdir = Some(project_path);
        Ok(self)
    }

    /// Declare a contributor in the current working directory
    pub fn with_contributor(self, stem: &str, declaration: &str) -> Result<Self> {
        let workdir = self
            .app_config
            .workdir
            .clone()
            .context("with_contributor needs a working directory")?;
        self.test_env.add_contributor(&workdir, stem, declaration)?;
        Ok(self)
    }

    /// Build the hermetic session
    pub fn build(
        self,
    ) -> Result<(
        CommandSession<LiveProcessProvider, LiveConfigProvider>,
        TestEnvironment,
    )> {
        let session = CommandSession::new_with_providers(
            LiveProcessProvider::new_for_test(Some(
                self.test_env.bin_path.to_string_lossy().to_string(),
            )),
            LiveConfigProvider::new(self.app_config),
        );

        Ok((session, self.test_env))
    }

    /// Get a reference to the test environment
    pub fn test_env(&self) -> &TestEnvironment {
        &self.test_env
    }
}
