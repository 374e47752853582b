//! Project configuration (`plugsync.json`).
//!
//! ```json
//! {
//!   "vendor-dir": "vendor",
//!   "hooks": {
//!     "Acme\\Theme\\Setup": {
//!       "onInstall": "php think theme:install",
//!       "onRemove": "php think theme:remove",
//!       "timeout-secs": 120
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::hooks::{CommandHook, HookEvent, HookRegistry};
use crate::runtime::Runtime;

pub const CONFIG_FILE: &str = "plugsync.json";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Vendor directory, relative to the project root unless absolute.
    pub vendor_dir: PathBuf,
    /// Hook classes by identifier.
    pub hooks: BTreeMap<String, HookClassConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vendor_dir: PathBuf::from("vendor"),
            hooks: BTreeMap::new(),
        }
    }
}

/// Shell commands implementing a hook class's event methods.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HookClassConfig {
    #[serde(rename = "onInstall")]
    pub on_install: Option<String>,
    #[serde(rename = "onRemove")]
    pub on_remove: Option<String>,
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl HookClassConfig {
    fn command(&self, event: HookEvent) -> Option<&str> {
        match event {
            HookEvent::Install => self.on_install.as_deref(),
            HookEvent::Remove => self.on_remove.as_deref(),
        }
    }
}

impl Config {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        serde_json::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        if runtime.exists(path) {
            Self::load(runtime, path)
        } else {
            debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Build the hook registry. Every configured class is resolvable, even one
    /// without commands; commands run in `project_root`.
    pub fn hook_registry(&self, project_root: &Path) -> HookRegistry {
        let mut registry = HookRegistry::new();
        for (class, methods) in &self.hooks {
            registry.declare_class(class);
            for &event in HookEvent::all() {
                if let Some(command) = methods.command(event) {
                    let mut hook = CommandHook::new(command, project_root);
                    if let Some(secs) = methods.timeout_secs {
                        hook = hook.with_timeout(secs);
                    }
                    registry.register(class, event, hook);
                }
            }
        }
        registry
    }
}
