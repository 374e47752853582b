//! Temporary project layouts for command tests.

use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

use super::GlobalOptions;
use crate::package::PLUGIN_PACKAGE_TYPE;

pub struct Project {
    _dir: TempDir,
    pub root: PathBuf,
    pub packages: PathBuf,
}

impl Project {
    /// An empty project whose root manifest declares `project_type`.
    pub fn new(project_type: &str) -> Self {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app");
        let packages = dir.path().join("packages");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&packages).unwrap();
        write_json(
            &root.join("composer.json"),
            &json!({ "name": "acme/app", "type": project_type }),
        );
        Self {
            _dir: dir,
            root,
            packages,
        }
    }

    pub fn options(&self) -> GlobalOptions {
        GlobalOptions {
            root: Some(self.root.clone()),
            ..GlobalOptions::default()
        }
    }

    /// Write a plugin package source directory and return its path.
    pub fn plugin(&self, dir: &str, name: &str, version: &str, plugin: Value) -> PathBuf {
        let path = self.packages.join(dir);
        fs::create_dir_all(&path).unwrap();
        write_json(
            &path.join("composer.json"),
            &json!({
                "name": name,
                "version": version,
                "type": PLUGIN_PACKAGE_TYPE,
                "extra": { "plugin": plugin }
            }),
        );
        path
    }

    pub fn installed_record(&self) -> Value {
        let content =
            fs::read_to_string(self.root.join("vendor/plugsync/installed.json")).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}
