use anyhow::{Result, anyhow};
use log::debug;

use crate::installer::PluginInstaller;
use crate::runtime::Runtime;

use super::{GlobalOptions, Settings};

/// Uninstall a plugin package by name.
#[tracing::instrument(skip(runtime, options))]
pub async fn remove<R: Runtime>(runtime: R, name: &str, options: &GlobalOptions) -> Result<()> {
    let settings = Settings::load(&runtime, options)?;
    let host = settings.host(&runtime);
    let hooks = settings.hooks();
    let installer = PluginInstaller::new(&runtime, &host, &hooks);
    let mut repo = settings.load_repo(&runtime)?;

    let package = repo
        .find(name)
        .map(|p| p.package.clone())
        .ok_or_else(|| anyhow!("Package {} is not installed", name))?;
    debug!("Removing {}", package);

    installer.uninstall(&mut repo, &package).await?;
    settings.save_repo(&runtime, &repo)?;

    println!("Removed {}", package);
    Ok(())
}
