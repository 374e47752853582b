//! The host package manager as seen by the installer.
//!
//! The host owns version solving, downloads and the installed-package record.
//! The installer only asks it to materialize or remove package files and to
//! answer a few questions about the project.

mod local;

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::package::{InstalledRepository, PackageDescriptor, ProjectKind};

pub use local::LocalHost;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageHost: Send + Sync {
    /// Type of the root package.
    fn project_kind(&self) -> ProjectKind;

    /// Root directory of the consuming project.
    fn project_root(&self) -> PathBuf;

    fn vendor_dir(&self) -> PathBuf;

    /// Install path the host would use without any override.
    fn default_install_path(&self, package: &PackageDescriptor) -> PathBuf;

    /// The host's own installed-state check.
    fn default_is_installed(
        &self,
        repo: &InstalledRepository,
        package: &PackageDescriptor,
        install_path: &Path,
    ) -> bool;

    /// Place the package files at `install_path` and record the package.
    async fn materialize_install(
        &self,
        repo: &mut InstalledRepository,
        package: &PackageDescriptor,
        install_path: &Path,
    ) -> Result<()>;

    /// Replace `initial` with `target` at `install_path`.
    async fn materialize_update(
        &self,
        repo: &mut InstalledRepository,
        initial: &PackageDescriptor,
        target: &PackageDescriptor,
        install_path: &Path,
    ) -> Result<()>;

    /// Remove the package files and forget the package.
    async fn materialize_uninstall(
        &self,
        repo: &mut InstalledRepository,
        package: &PackageDescriptor,
        install_path: &Path,
    ) -> Result<()>;
}
