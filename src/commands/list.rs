use anyhow::Result;
use log::debug;

use crate::runtime::{Runtime, display_path};

use super::{GlobalOptions, Settings};

/// List installed plugin packages.
#[tracing::instrument(skip(runtime, options))]
pub fn list<R: Runtime>(runtime: R, options: &GlobalOptions) -> Result<()> {
    let settings = Settings::load(&runtime, options)?;
    let repo = settings.load_repo(&runtime)?;

    if repo.packages().is_empty() {
        println!("No plugin packages installed.");
        return Ok(());
    }

    debug!("Found {} package(s)", repo.packages().len());
    for entry in repo.packages() {
        println!(
            "{} {}",
            entry.package,
            display_path(&entry.install_path, settings.root()).display()
        );
    }
    Ok(())
}

