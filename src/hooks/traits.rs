//! Hook traits and types.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle events a package can hook into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    /// After the package has been materialized and synchronized
    #[serde(rename = "onInstall")]
    Install,

    /// Before the package files are removed
    #[serde(rename = "onRemove")]
    Remove,
}

impl HookEvent {
    /// Name of the hook method a class implements for this event.
    pub fn method_name(&self) -> &'static str {
        match self {
            HookEvent::Install => "onInstall",
            HookEvent::Remove => "onRemove",
        }
    }

    pub fn all() -> &'static [HookEvent] {
        &[HookEvent::Install, HookEvent::Remove]
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// A callable hook method registered for one class and event.
#[async_trait]
pub trait Hook: Send + Sync {
    async fn call(&self, class: &str, event: HookEvent) -> Result<()>;
}

type HookFn = dyn Fn() -> Result<()> + Send + Sync;

/// Hook backed by a closure.
#[derive(Clone)]
pub struct FnHook {
    handler: Arc<HookFn>,
}

impl FnHook {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl Hook for FnHook {
    async fn call(&self, _class: &str, _event: HookEvent) -> Result<()> {
        (self.handler)()
    }
}
