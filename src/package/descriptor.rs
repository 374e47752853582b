//! Package descriptors as supplied by the host package manager.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::PluginDeclaration;

/// Manifest file name inside a package or project directory.
pub const MANIFEST_FILE: &str = "composer.json";

/// Package type tag handled by this installer.
pub const PLUGIN_PACKAGE_TYPE: &str = "think-admin-plugin";

/// Type of a root package that is a consuming application.
pub const PROJECT_TYPE: &str = "project";

fn default_package_type() -> String {
    "library".to_string()
}

/// Identifies a package and carries its free-form `extra` metadata bag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type", default = "default_package_type")]
    pub package_type: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub extra: Value,
    /// Directory the descriptor was loaded from, when it came from disk.
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, package_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            package_type: package_type.into(),
            extra: Value::Null,
            source_dir: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Parse the `extra.plugin` section. Derived fresh on every call.
    pub fn plugin(&self) -> PluginDeclaration {
        PluginDeclaration::from_extra(&self.extra)
    }

    /// Load a descriptor from a manifest file.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, manifest_path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(manifest_path)
            .with_context(|| format!("Failed to read manifest {:?}", manifest_path))?;
        let mut descriptor: PackageDescriptor = serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest {:?}", manifest_path))?;
        validate_name(&descriptor.name)
            .with_context(|| format!("Invalid manifest {:?}", manifest_path))?;
        descriptor.source_dir = manifest_path.parent().map(Path::to_path_buf);
        Ok(descriptor)
    }

    /// Load the descriptor of a package directory (`<dir>/composer.json`).
    pub fn load_dir<R: Runtime>(runtime: &R, dir: &Path) -> Result<Self> {
        Self::load(runtime, &dir.join(MANIFEST_FILE))
    }
}

/// Package names are `vendor/name`: two plain path segments. The name becomes
/// part of the default install path, so nothing else is accepted.
pub fn validate_name(name: &str) -> Result<()> {
    let segments: Vec<&str> = name.split('/').collect();
    let plain = |segment: &&str| {
        !segment.is_empty()
            && *segment != "."
            && *segment != ".."
            && !segment.contains(['\\', ':'])
    };
    if segments.len() != 2 || !segments.iter().all(plain) {
        bail!("Package name {:?} is not of the form vendor/name", name);
    }
    Ok(())
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} ({})", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
