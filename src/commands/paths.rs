use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;
use crate::runtime::path::resolve_relative_path;

/// Project root: the `--root` option, resolved against the current directory,
/// or the current directory itself.
#[tracing::instrument(skip(runtime))]
pub fn project_root<R: Runtime>(runtime: &R, root: Option<&Path>) -> Result<PathBuf> {
    let cwd = runtime.current_dir()?;
    let root = match root {
        Some(path) => resolve_relative_path(&cwd, path),
        None => cwd,
    };
    info!("Using project root: {}", root.display());
    Ok(root)
}

/// Vendor directory: the command line wins over the config file; relative paths
/// are taken from the project root.
pub fn vendor_dir(root: &Path, from_cli: Option<&Path>, from_config: &Path) -> PathBuf {
    resolve_relative_path(root, from_cli.unwrap_or(from_config))
}

/// Package directories given on the command line are relative to the current
/// directory, not the project root.
pub fn package_dir<R: Runtime>(runtime: &R, dir: &Path) -> Result<PathBuf> {
    Ok(resolve_relative_path(&runtime.current_dir()?, dir))
}
