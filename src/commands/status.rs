use anyhow::Result;

use crate::installer::PluginInstaller;
use crate::runtime::{Runtime, display_path};

use super::{GlobalOptions, Settings};

/// Show whether a package is installed and where.
#[tracing::instrument(skip(runtime, options))]
pub fn status<R: Runtime>(runtime: R, name: &str, options: &GlobalOptions) -> Result<()> {
    let settings = Settings::load(&runtime, options)?;
    let host = settings.host(&runtime);
    let hooks = settings.hooks();
    let installer = PluginInstaller::new(&runtime, &host, &hooks);
    let repo = settings.load_repo(&runtime)?;

    let Some(entry) = repo.find(name) else {
        println!("{} is not installed", name);
        return Ok(());
    };

    let installed = installer.is_installed(&repo, &entry.package);
    println!("{}", entry.package);
    println!("  installed: {}", if installed { "yes" } else { "no" });
    println!(
        "  path: {}",
        display_path(&entry.install_path, settings.root()).display()
    );
    let plugin = entry.package.plugin();
    if plugin.clear {
        println!("  cleared after install");
    }
    if !plugin.event.is_empty() {
        println!("  hooks: {}", plugin.event.join(", "));
    }
    Ok(())
}

