//! Record of packages installed into a project.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::PackageDescriptor;

/// Location of the record, relative to the vendor directory.
pub const INSTALLED_FILE: &str = "plugsync/installed.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstalledPackage {
    #[serde(flatten)]
    pub package: PackageDescriptor,
    pub install_path: PathBuf,
}

/// Installed packages, persisted as JSON under the vendor directory.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InstalledRepository {
    packages: Vec<InstalledPackage>,
}

impl InstalledRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the record for a vendor directory.
    pub fn path_in(vendor_dir: &Path) -> PathBuf {
        vendor_dir.join(INSTALLED_FILE)
    }

    /// Load the record. A missing file is an empty repository.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        if !runtime.exists(path) {
            return Ok(Self::default());
        }
        let content = runtime.read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid installed package record {:?}", path))
    }

    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !runtime.exists(parent)
        {
            runtime.create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        runtime
            .write(path, content.as_bytes())
            .with_context(|| format!("Failed to save installed package record to {:?}", path))
    }

    pub fn packages(&self) -> &[InstalledPackage] {
        &self.packages
    }

    pub fn find(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.iter().find(|p| p.package.name == name)
    }

    pub fn has_package(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Record a package, replacing any previous entry with the same name.
    pub fn add(&mut self, package: &PackageDescriptor, install_path: &Path) {
        let entry = InstalledPackage {
            package: package.clone(),
            install_path: install_path.to_path_buf(),
        };
        match self
            .packages
            .iter_mut()
            .find(|p| p.package.name == package.name)
        {
            Some(existing) => *existing = entry,
            None => self.packages.push(entry),
        }
    }

    /// Forget a package. Returns the removed entry, if any.
    pub fn remove(&mut self, name: &str) -> Option<InstalledPackage> {
        let index = self.packages.iter().position(|p| p.package.name == name)?;
        Some(self.packages.remove(index))
    }
}
