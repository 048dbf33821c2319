//! Resolved filesystem layout of the managed client

use std::path::{Path, PathBuf};

/// Directory holding the build config, relative to the working directory
pub const STATE_DIR: &str = ".clientpack";
/// Build config file name inside [`STATE_DIR`]
pub const STORE_FILE: &str = "build-config.json";
/// Directory of bundled modules inside the output tree
pub const WEB_MODULES_DIR: &str = "web_modules";

/// Absolute paths every client operation works against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLayout {
    /// Template tree containing `package.json`
    pub app_dir: PathBuf,
    /// Live output tree served to browsers
    pub build_dir: PathBuf,
    pub store_path: PathBuf,
    pub contrib_dir: PathBuf,
    /// Prefix for module URLs handed to the frontend
    pub url_prefix: String,
}

impl ClientLayout {
    /// Conventional layout rooted at `workdir`
    pub fn for_workdir(workdir: &Path) -> Self {
        let app_dir = workdir.join("app");
        Self {
            build_dir: app_dir.join("build"),
            app_dir,
            store_path: workdir.join(STATE_DIR).join(STORE_FILE),
            contrib_dir: workdir.join("contributors"),
            url_prefix: "../".to_string(),
        }
    }

    /// Where the build step leaves its output inside a staged copy of the template
    pub fn staged_output(&self, staged_app: &Path) -> PathBuf {
        match self.build_dir.strip_prefix(&self.app_dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => staged_app.join(rel),
            _ => staged_app.join(
                self.build_dir
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("build")),
            ),
        }
    }

    /// Paths inside the template that must not be copied into staging
    pub fn staging_exclusions(&self) -> Vec<PathBuf> {
        let mut skip = Vec::new();
        if self.build_dir.starts_with(&self.app_dir) {
            skip.push(self.build_dir.clone());
        }
        if let Some(state_dir) = self.store_path.parent() {
            if state_dir.starts_with(&self.app_dir) {
                skip.push(state_dir.to_path_buf());
            }
        }
        skip
    }

    pub fn web_modules_dir(&self) -> PathBuf {
        self.build_dir.join(WEB_MODULES_DIR)
    }

    /// Built module file for `alias`
    pub fn module_file(&self, alias: &str) -> PathBuf {
        self.web_modules_dir().join(format!("{}.js", alias))
    }
}

#[cfg(test)]
mod tests {
    include!("layout.test.rs");
}
