use std::path::PathBuf;

use crate::package::{PackageDescriptor, ProjectKind};

/// Install directory for a package.
///
/// Inside a project, a `plugin.path` override is returned verbatim; otherwise
/// the host's default location is used.
pub fn resolve_install_path(
    package: &PackageDescriptor,
    project_kind: &ProjectKind,
    default_path: PathBuf,
) -> PathBuf {
    if project_kind.is_project()
        && let Some(path) = package.plugin().path
    {
        return PathBuf::from(path);
    }
    default_path
}
