//! Host backed by package directories on the local filesystem.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

use crate::package::{InstalledRepository, PackageDescriptor, ProjectKind};
use crate::runtime::Runtime;
use crate::runtime::path::normalize_path;

use super::PackageHost;

/// Installs packages by copying their source directory into the install path.
///
/// A package's source directory is the directory its manifest was loaded from.
pub struct LocalHost<'a, R: Runtime> {
    runtime: &'a R,
    project_root: PathBuf,
    vendor_dir: PathBuf,
    project_kind: ProjectKind,
}

impl<'a, R: Runtime> LocalHost<'a, R> {
    pub fn new(
        runtime: &'a R,
        project_root: PathBuf,
        vendor_dir: PathBuf,
        project_kind: ProjectKind,
    ) -> Self {
        Self {
            runtime,
            project_root,
            vendor_dir,
            project_kind,
        }
    }

    /// Replace whatever is at `install_path` with the package's files.
    fn place(&self, package: &PackageDescriptor, install_path: &Path) -> Result<()> {
        let source = package
            .source_dir
            .as_deref()
            .ok_or_else(|| anyhow!("Package {} has no source directory", package.name))?;

        if normalize_path(source) == normalize_path(install_path) {
            debug!("{} is already in place at {:?}", package.name, install_path);
            return Ok(());
        }

        if self.runtime.exists(install_path) {
            debug!("Removing previous files at {:?}", install_path);
            self.runtime.remove_dir_all(install_path)?;
        }
        if let Some(parent) = install_path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }

        self.runtime
            .copy_dir_all(source, install_path)
            .with_context(|| format!("Failed to install {} into {:?}", package.name, install_path))?;
        Ok(())
    }

    /// Remove the directory recorded for `name` when the package is moving to a
    /// different install path.
    fn remove_previous(
        &self,
        repo: &InstalledRepository,
        name: &str,
        install_path: &Path,
    ) -> Result<()> {
        let Some(previous) = repo.find(name) else {
            return Ok(());
        };
        let previous = &previous.install_path;
        if normalize_path(previous) == normalize_path(install_path)
            || !self.runtime.exists(previous)
        {
            return Ok(());
        }

        debug!(
            "{} moved from {:?} to {:?}, removing the old directory",
            name, previous, install_path
        );
        self.runtime
            .remove_dir_all(previous)
            .with_context(|| format!("Failed to remove previous install of {} at {:?}", name, previous))
    }
}

#[async_trait]
impl<'a, R: Runtime> PackageHost for LocalHost<'a, R> {
    fn project_kind(&self) -> ProjectKind {
        self.project_kind.clone()
    }

    fn project_root(&self) -> PathBuf {
        self.project_root.clone()
    }

    fn vendor_dir(&self) -> PathBuf {
        self.vendor_dir.clone()
    }

    fn default_install_path(&self, package: &PackageDescriptor) -> PathBuf {
        self.vendor_dir.join(&package.name)
    }

    fn default_is_installed(
        &self,
        repo: &InstalledRepository,
        package: &PackageDescriptor,
        install_path: &Path,
    ) -> bool {
        repo.has_package(&package.name) && self.runtime.is_dir(install_path)
    }

    async fn materialize_install(
        &self,
        repo: &mut InstalledRepository,
        package: &PackageDescriptor,
        install_path: &Path,
    ) -> Result<()> {
        self.remove_previous(repo, &package.name, install_path)?;
        self.place(package, install_path)?;
        repo.add(package, install_path);
        Ok(())
    }

    async fn materialize_update(
        &self,
        repo: &mut InstalledRepository,
        initial: &PackageDescriptor,
        target: &PackageDescriptor,
        install_path: &Path,
    ) -> Result<()> {
        self.remove_previous(repo, &initial.name, install_path)?;
        self.place(target, install_path)?;
        repo.remove(&initial.name);
        repo.add(target, install_path);
        Ok(())
    }

    async fn materialize_uninstall(
        &self,
        repo: &mut InstalledRepository,
        package: &PackageDescriptor,
        install_path: &Path,
    ) -> Result<()> {
        if self.runtime.exists(install_path) {
            self.runtime.remove_dir_all(install_path)?;
        }
        repo.remove(&package.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PLUGIN_PACKAGE_TYPE;
    use crate::runtime::RealRuntime;
    use std::fs;
    use tempfile::tempdir;

    fn package(source: &Path, version: &str) -> PackageDescriptor {
        PackageDescriptor::new("acme/theme", PLUGIN_PACKAGE_TYPE)
            .with_version(version)
            .with_source_dir(source)
    }

    #[tokio::test]
    async fn test_install_update_uninstall() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app");
        let src_v1 = dir.path().join("src/v1");
        let src_v2 = dir.path().join("src/v2");
        fs::create_dir_all(src_v1.join("assets")).unwrap();
        fs::write(src_v1.join("assets/old.css"), "v1").unwrap();
        fs::create_dir_all(src_v2.join("assets")).unwrap();
        fs::write(src_v2.join("assets/new.css"), "v2").unwrap();

        let host = LocalHost::new(
            &RealRuntime,
            root.clone(),
            root.join("vendor"),
            ProjectKind::Project,
        );
        let mut repo = InstalledRepository::new();
        let v1 = package(&src_v1, "1.0.0");
        let install_path = host.default_install_path(&v1);
        assert_eq!(install_path, root.join("vendor/acme/theme"));
        assert!(!host.default_is_installed(&repo, &v1, &install_path));

        host.materialize_install(&mut repo, &v1, &install_path)
            .await
            .unwrap();
        assert_eq!(
            fs::read_to_string(install_path.join("assets/old.css")).unwrap(),
            "v1"
        );
        assert!(host.default_is_installed(&repo, &v1, &install_path));

        let v2 = package(&src_v2, "2.0.0");
        host.materialize_update(&mut repo, &v1, &v2, &install_path)
            .await
            .unwrap();
        assert!(!install_path.join("assets/old.css").exists());
        assert!(install_path.join("assets/new.css").exists());
        assert_eq!(
            repo.find("acme/theme").unwrap().package.version.as_deref(),
            Some("2.0.0")
        );

        host.materialize_uninstall(&mut repo, &v2, &install_path)
            .await
            .unwrap();
        assert!(!install_path.exists());
        assert!(!repo.has_package("acme/theme"));
    }

    #[tokio::test]
    async fn test_update_to_new_path_removes_old_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app");
        let src = dir.path().join("src/theme");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("theme.css"), "body{}").unwrap();

        let host = LocalHost::new(
            &RealRuntime,
            root.clone(),
            root.join("vendor"),
            ProjectKind::Project,
        );
        let mut repo = InstalledRepository::new();
        let v1 = package(&src, "1.0.0");
        let old_path = root.join("public/theme");
        host.materialize_install(&mut repo, &v1, &old_path)
            .await
            .unwrap();

        let v2 = package(&src, "2.0.0");
        let new_path = host.default_install_path(&v2);
        host.materialize_update(&mut repo, &v1, &v2, &new_path)
            .await
            .unwrap();

        assert!(!old_path.exists());
        assert!(new_path.join("theme.css").is_file());
        assert_eq!(repo.find("acme/theme").unwrap().install_path, new_path);

        // Reinstalling at yet another path also retires the recorded directory
        let moved = root.join("plugin/theme");
        host.materialize_install(&mut repo, &v2, &moved)
            .await
            .unwrap();
        assert!(!new_path.exists());
        assert!(moved.join("theme.css").is_file());
    }

    #[tokio::test]
    async fn test_installed_check_requires_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let host = LocalHost::new(
            &RealRuntime,
            root.clone(),
            root.join("vendor"),
            ProjectKind::Project,
        );
        let pkg = package(&root.join("src"), "1.0.0");
        let mut repo = InstalledRepository::new();
        repo.add(&pkg, &root.join("vendor/acme/theme"));

        assert!(!host.default_is_installed(&repo, &pkg, &root.join("vendor/acme/theme")));
    }

    #[tokio::test]
    async fn test_install_without_source_dir_fails() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let host = LocalHost::new(
            &RealRuntime,
            root.clone(),
            root.join("vendor"),
            ProjectKind::Project,
        );
        let pkg = PackageDescriptor::new("acme/theme", PLUGIN_PACKAGE_TYPE);
        let mut repo = InstalledRepository::new();

        let err = host
            .materialize_install(&mut repo, &pkg, &root.join("vendor/acme/theme"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no source directory"));
        assert!(!repo.has_package("acme/theme"));
    }
}
