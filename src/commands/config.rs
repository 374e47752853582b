use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE, Config};
use crate::hooks::HookRegistry;
use crate::host::LocalHost;
use crate::package::{InstalledRepository, ProjectKind};
use crate::runtime::Runtime;

use super::paths::{project_root, vendor_dir};

/// Options shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub vendor_dir: Option<PathBuf>,
}

/// Everything a command needs to know about the project it runs in.
pub struct Settings {
    pub root: PathBuf,
    pub vendor_dir: PathBuf,
    pub project_kind: ProjectKind,
    pub config: Config,
}

impl Settings {
    pub fn load<R: Runtime>(runtime: &R, options: &GlobalOptions) -> Result<Self> {
        let root = project_root(runtime, options.root.as_deref())?;
        let config_path = match &options.config {
            Some(path) => path.clone(),
            None => root.join(CONFIG_FILE),
        };
        let config = Config::load_or_default(runtime, &config_path)?;
        let vendor_dir = vendor_dir(&root, options.vendor_dir.as_deref(), &config.vendor_dir);
        let project_kind = ProjectKind::detect(runtime, &root)?;

        debug!(
            "Project {:?} ({}), vendor dir {:?}",
            root, project_kind, vendor_dir
        );

        Ok(Self {
            root,
            vendor_dir,
            project_kind,
            config,
        })
    }

    pub fn host<'a, R: Runtime>(&self, runtime: &'a R) -> LocalHost<'a, R> {
        LocalHost::new(
            runtime,
            self.root.clone(),
            self.vendor_dir.clone(),
            self.project_kind.clone(),
        )
    }

    pub fn hooks(&self) -> HookRegistry {
        self.config.hook_registry(&self.root)
    }

    pub fn repo_path(&self) -> PathBuf {
        InstalledRepository::path_in(&self.vendor_dir)
    }

    pub fn load_repo<R: Runtime>(&self, runtime: &R) -> Result<InstalledRepository> {
        InstalledRepository::load(runtime, &self.repo_path())
    }

    pub fn save_repo<R: Runtime>(&self, runtime: &R, repo: &InstalledRepository) -> Result<()> {
        InstalledRepository::save(repo, runtime, &self.repo_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_settings_from_project_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("composer.json"),
            r#"{ "name": "acme/app", "type": "project" }"#,
        )
        .unwrap();
        fs::write(
            root.join(CONFIG_FILE),
            r#"{ "vendor-dir": "lib", "hooks": { "Acme\\Setup": { "onInstall": "true" } } }"#,
        )
        .unwrap();

        let options = GlobalOptions {
            root: Some(root.to_path_buf()),
            ..GlobalOptions::default()
        };
        let settings = Settings::load(&RealRuntime, &options).unwrap();

        assert_eq!(settings.root(), root);
        assert_eq!(settings.vendor_dir, root.join("lib"));
        assert!(settings.project_kind.is_project());
        assert_eq!(settings.repo_path(), root.join("lib/plugsync/installed.json"));
        assert!(settings.hooks().has_class("Acme\\Setup"));
    }

    #[test]
    fn test_settings_without_project_files() {
        let dir = tempdir().unwrap();
        let options = GlobalOptions {
            root: Some(dir.path().to_path_buf()),
            vendor_dir: Some(PathBuf::from("deps")),
            ..GlobalOptions::default()
        };

        let settings = Settings::load(&RealRuntime, &options).unwrap();

        assert_eq!(settings.vendor_dir, dir.path().join("deps"));
        assert!(!settings.project_kind.is_project());
        assert!(settings.hooks().is_empty());
        assert!(settings.load_repo(&RealRuntime).unwrap().packages().is_empty());
    }
}
