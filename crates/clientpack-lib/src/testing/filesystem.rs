//! Filesystem fixtures for client build tests

use crate::client::{ClientLayout, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Template manifest written by [`ClientFixture::new`]
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

/// Working directory holding a client template at `app/`
pub struct ClientFixture {
    /// The temporary directory (automatically cleaned up on drop)
    pub temp_dir: TempDir,
    pub layout: ClientLayout,
}

impl ClientFixture {
    /// Create a working directory with a minimal template
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let layout = ClientLayout::for_workdir(temp_dir.path());

        let fixture = Self { temp_dir, layout };
        fixture.write_file("app/package.json", TEMPLATE_PACKAGE_JSON)?;
        fixture.write_file("app/src/index.js", "import htm from 'htm';\nexport default htm;\n")?;
        Ok(fixture)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn open_store(&self) -> anyhow::Result<ConfigStore> {
        Ok(ConfigStore::open(&self.layout.store_path)?)
    }

    /// Write a file relative to the working directory, creating parents
    pub fn write_file(&self, relative: &str, content: &str) -> anyhow::Result<PathBuf> {
        let full_path = self.path().join(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)?;
        Ok(full_path)
    }

    /// Declare a contributor in the contributors directory
    pub fn write_contributor(&self, file_stem: &str, declaration: &str) -> anyhow::Result<PathBuf> {
        self.write_file(&format!("contributors/{}.toml", file_stem), declaration)
    }

    /// Put a module into the live output tree as if an earlier build produced it
    pub fn write_live_module(&self, alias: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.layout.module_file(alias);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read_file(&self, relative: &str) -> anyhow::Result<String> {
        Ok(fs::read_to_string(self.path().join(relative))?)
    }

    pub fn file_exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }
}
