use anyhow::{Result, bail};
use log::debug;
use std::path::PathBuf;

use crate::installer::PluginInstaller;
use crate::package::PackageDescriptor;
use crate::runtime::Runtime;

use super::paths::package_dir;
use super::{GlobalOptions, Settings, print_report};

/// Install plugin packages from their source directories. A package that is
/// already recorded as installed is updated instead.
#[tracing::instrument(skip(runtime, options))]
pub async fn install<R: Runtime>(
    runtime: R,
    packages: &[PathBuf],
    options: &GlobalOptions,
) -> Result<()> {
    let settings = Settings::load(&runtime, options)?;
    let host = settings.host(&runtime);
    let hooks = settings.hooks();
    let installer = PluginInstaller::new(&runtime, &host, &hooks);
    let mut repo = settings.load_repo(&runtime)?;

    for dir in packages {
        let dir = package_dir(&runtime, dir)?;
        let package = PackageDescriptor::load_dir(&runtime, &dir)?;
        if !installer.supports(&package.package_type) {
            bail!(
                "{} is a {:?} package, not a plugin package",
                package.name,
                package.package_type
            );
        }

        let initial = repo.find(&package.name).map(|p| p.package.clone());
        let result = match &initial {
            Some(initial) => {
                debug!("{} is already installed, updating", initial);
                installer.update(&mut repo, initial, &package).await
            }
            None => installer.install(&mut repo, &package).await,
        };
        // Files may already be in place even when a hook failed.
        settings.save_repo(&runtime, &repo)?;

        let report = result?;
        print_report(&package, &report, settings.root());
        println!("Installed {}", package);
    }

    Ok(())
}
