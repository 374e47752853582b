//! Plugin installer - drives the host, the sync engine and package hooks through
//! the install, update and uninstall lifecycle.

mod install_path;

use anyhow::{Result, bail};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::hooks::{HookEvent, HookRegistry};
use crate::host::PackageHost;
use crate::package::{InstalledRepository, PLUGIN_PACKAGE_TYPE, PackageDescriptor};
use crate::runtime::Runtime;
use crate::runtime::is_path_under;
use crate::runtime::path::{normalize_path, resolve_relative_path};
use crate::sync::{SyncEngine, SyncReport};

pub use install_path::resolve_install_path;

pub struct PluginInstaller<'a, R: Runtime, H: PackageHost> {
    runtime: &'a R,
    host: &'a H,
    hooks: &'a HookRegistry,
}

impl<'a, R: Runtime, H: PackageHost> PluginInstaller<'a, R, H> {
    pub fn new(runtime: &'a R, host: &'a H, hooks: &'a HookRegistry) -> Self {
        Self {
            runtime,
            host,
            hooks,
        }
    }

    /// Only plugin packages are handled here; the host routes other types elsewhere.
    pub fn supports(&self, package_type: &str) -> bool {
        package_type == PLUGIN_PACKAGE_TYPE
    }

    /// Install path as declared: either the host default or a `plugin.path` override.
    pub fn install_path(&self, package: &PackageDescriptor) -> PathBuf {
        resolve_install_path(
            package,
            &self.host.project_kind(),
            self.host.default_install_path(package),
        )
    }

    /// Install path resolved against the project root.
    fn resolved_install_path(&self, package: &PackageDescriptor) -> PathBuf {
        resolve_relative_path(&self.host.project_root(), &self.install_path(package))
    }

    /// Resolved install path for an operation that writes or deletes it. Without a
    /// `plugin.path` override the path must lie strictly inside the vendor directory.
    fn checked_install_path(&self, package: &PackageDescriptor) -> Result<PathBuf> {
        let root = self.host.project_root();
        let install_path = self.resolved_install_path(package);
        let default_path = resolve_relative_path(&root, &self.host.default_install_path(package));
        if install_path != default_path {
            return Ok(install_path);
        }

        let vendor_dir = resolve_relative_path(&root, &self.host.vendor_dir());
        if !is_path_under(&install_path, &vendor_dir)
            || normalize_path(&install_path) == normalize_path(&vendor_dir)
        {
            bail!(
                "Refusing to use {:?} for {}: not inside the vendor directory {:?}",
                install_path,
                package.name,
                vendor_dir
            );
        }
        Ok(install_path)
    }

    fn sync(&self, package: &PackageDescriptor, install_path: &Path) -> Result<SyncReport> {
        SyncEngine::new(self.runtime, self.host.project_root()).sync(
            install_path,
            &package.plugin(),
            &self.host.project_kind(),
        )
    }

    /// Materialize the package, synchronize its files, then run `onInstall` hooks.
    #[tracing::instrument(skip(self, repo, package), fields(package = %package.name))]
    pub async fn install(
        &self,
        repo: &mut InstalledRepository,
        package: &PackageDescriptor,
    ) -> Result<SyncReport> {
        let install_path = self.checked_install_path(package)?;
        info!("Installing {} into {:?}", package, install_path);
        if package.plugin().is_empty() {
            debug!("{} has no plugin declarations", package.name);
        }

        self.host
            .materialize_install(repo, package, &install_path)
            .await?;
        let report = self.sync(package, &install_path)?;
        self.hooks
            .dispatch(HookEvent::Install, &package.plugin().event)
            .await?;

        debug!("Installed {}: {}", package.name, report);
        Ok(report)
    }

    /// Update in place when the install directory is present, otherwise install
    /// `target` from scratch.
    #[tracing::instrument(skip(self, repo, initial, target), fields(package = %target.name))]
    pub async fn update(
        &self,
        repo: &mut InstalledRepository,
        initial: &PackageDescriptor,
        target: &PackageDescriptor,
    ) -> Result<SyncReport> {
        let install_path = self.checked_install_path(target)?;
        if !self.runtime.is_dir(&install_path) {
            info!(
                "{:?} is missing, installing {} instead of updating",
                install_path, target
            );
            return self.install(repo, target).await;
        }

        info!("Updating {} to {}", initial, target);
        self.host
            .materialize_update(repo, initial, target, &install_path)
            .await?;
        self.sync(target, &install_path)
    }

    /// Run `onRemove` hooks while the package files still exist, then remove them.
    #[tracing::instrument(skip(self, repo, package), fields(package = %package.name))]
    pub async fn uninstall(
        &self,
        repo: &mut InstalledRepository,
        package: &PackageDescriptor,
    ) -> Result<()> {
        let install_path = self.checked_install_path(package)?;
        self.hooks
            .dispatch(HookEvent::Remove, &package.plugin().event)
            .await?;

        info!("Removing {} from {:?}", package, install_path);
        self.host
            .materialize_uninstall(repo, package, &install_path)
            .await
    }

    /// Packages that clear their own directory are always reported as installed.
    pub fn is_installed(&self, repo: &InstalledRepository, package: &PackageDescriptor) -> bool {
        if package.plugin().clear {
            return true;
        }
        self.host
            .default_is_installed(repo, package, &self.resolved_install_path(package))
    }
}
