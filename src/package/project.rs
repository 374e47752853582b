//! Type of the root project the packages are installed into.

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::runtime::Runtime;

use super::{MANIFEST_FILE, PROJECT_TYPE};

/// Whether the root package is a consuming application or something else
/// (a library or plugin under development).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    Project,
    Other(String),
}

#[derive(Deserialize)]
struct RootManifest {
    #[serde(rename = "type", default)]
    package_type: Option<String>,
}

impl ProjectKind {
    pub fn from_type(package_type: &str) -> Self {
        if package_type == PROJECT_TYPE {
            ProjectKind::Project
        } else {
            ProjectKind::Other(package_type.to_string())
        }
    }

    pub fn is_project(&self) -> bool {
        matches!(self, ProjectKind::Project)
    }

    /// Read the project type from `<root>/composer.json`.
    ///
    /// A missing `type` field or a missing manifest both mean `library`.
    pub fn detect<R: Runtime>(runtime: &R, root: &Path) -> Result<Self> {
        let manifest = root.join(MANIFEST_FILE);
        if !runtime.exists(&manifest) {
            warn!(
                "No {} found in {:?}, treating the root package as a library",
                MANIFEST_FILE, root
            );
            return Ok(ProjectKind::Other("library".to_string()));
        }

        let content = runtime.read_to_string(&manifest)?;
        let parsed: RootManifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest {:?}", manifest))?;
        Ok(Self::from_type(
            parsed.package_type.as_deref().unwrap_or("library"),
        ))
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Project => f.write_str(PROJECT_TYPE),
            ProjectKind::Other(t) => f.write_str(t),
        }
    }
}
