//! In-process stand-in for the package manager and bundler

use crate::application::session::ProcessOutput;
use crate::client::{ExternalTool, ToolStep};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// One recorded invocation of [`FakeTool`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCall {
    pub step: ToolStep,
    pub packages: Vec<String>,
    pub cwd: PathBuf,
}

/// Emulates `npm install` and `npm run build` against a staged template.
///
/// The build step runs [`emit_bundle`].
#[derive(Debug, Default)]
pub struct FakeTool {
    calls: RefCell<Vec<FakeCall>>,
    install_failure: Option<String>,
    build_failure: Option<String>,
    skip_output: bool,
}

impl FakeTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the install step exit 1 with `stderr`
    pub fn failing_install(mut self, stderr: &str) -> Self {
        self.install_failure = Some(stderr.to_string());
        self
    }

    /// Make the build step exit 1 with `stderr`
    pub fn failing_build(mut self, stderr: &str) -> Self {
        self.build_failure = Some(stderr.to_string());
        self
    }

    /// Succeed without writing any output tree
    pub fn without_output(mut self) -> Self {
        self.skip_output = true;
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, step: ToolStep, packages: &[String], cwd: &Path) {
        self.calls.borrow_mut().push(FakeCall {
            step,
            packages: packages.to_vec(),
            cwd: cwd.to_path_buf(),
        });
    }
}

impl ExternalTool for FakeTool {
    fn program(&self) -> &str {
        "fake-npm"
    }

    fn install(&self, packages: &[String], cwd: &Path) -> anyhow::Result<ProcessOutput> {
        self.record(ToolStep::Install, packages, cwd);
        match &self.install_failure {
            Some(stderr) => Ok(ProcessOutput::failure(1, stderr.clone())),
            None => Ok(ProcessOutput::succeeded("")),
        }
    }

    fn build(&self, cwd: &Path) -> anyhow::Result<ProcessOutput> {
        self.record(ToolStep::Build, &[], cwd);
        if let Some(stderr) = &self.build_failure {
            return Ok(ProcessOutput::failure(1, stderr.clone()));
        }
        if !self.skip_output {
            emit_bundle(cwd)?;
        }
        Ok(ProcessOutput::succeeded(""))
    }
}

/// Write the bundle `npm run build` would produce for the staged tree at `cwd`.
///
/// One `build/web_modules/<alias>.js` per alias in `snowpack.install` of
/// `package.json`, plus `build/index.html`.
pub fn emit_bundle(cwd: &Path) -> anyhow::Result<()> {
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(cwd.join("package.json"))?)?;
    let aliases: Vec<String> = manifest["snowpack"]["install"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let web_modules = cwd.join("build").join("web_modules");
    fs::create_dir_all(&web_modules)?;
    for alias in aliases {
        fs::write(
            web_modules.join(format!("{}.js", alias)),
            format!("export default \"{}\";\nexport const name = \"{}\";\n", alias, alias),
        )?;
    }
    fs::write(cwd.join("build").join("index.html"), "<!doctype html>\n")?;
    Ok(())
}
