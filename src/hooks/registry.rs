//! Registry of hook classes and dispatch of lifecycle events.
//!
//! A package lists hook class identifiers in `extra.plugin.event`. The host
//! registers which classes exist and which event methods each implements; dispatch
//! calls the matching methods in declaration order and skips everything else.

use anyhow::{Context, Result};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Hook, HookEvent};

type HookBox = Arc<dyn Hook>;
type MethodMap = HashMap<HookEvent, HookBox>;

#[derive(Default, Clone)]
pub struct HookRegistry {
    classes: HashMap<String, MethodMap>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook method for a class.
    pub fn register<H: Hook + 'static>(
        &mut self,
        class: impl Into<String>,
        event: HookEvent,
        hook: H,
    ) -> &mut Self {
        self.register_arc(class, event, Arc::new(hook))
    }

    pub fn register_arc(
        &mut self,
        class: impl Into<String>,
        event: HookEvent,
        hook: Arc<dyn Hook>,
    ) -> &mut Self {
        self.classes
            .entry(class.into())
            .or_default()
            .insert(event, hook);
        self
    }

    /// Make a class resolvable without any hook methods.
    pub fn declare_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.classes.entry(class.into()).or_default();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn resolve(&self, class: &str, event: HookEvent) -> Option<&HookBox> {
        self.classes.get(class)?.get(&event)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Invoke `event` on each class in order. Unknown classes and classes without
    /// the method are skipped. The first failing hook aborts the dispatch.
    ///
    /// Returns the number of hooks invoked.
    pub async fn dispatch(&self, event: HookEvent, classes: &[String]) -> Result<usize> {
        let mut invoked = 0;
        for class in classes {
            let Some(methods) = self.classes.get(class) else {
                debug!("Hook class {} not found, skipping {}", class, event);
                continue;
            };
            let Some(hook) = methods.get(&event) else {
                debug!("Hook class {} has no {} method", class, event);
                continue;
            };

            debug!("Running {}::{}", class, event);
            hook.call(class, event)
                .await
                .with_context(|| format!("Hook {}::{} failed", class, event))?;
            invoked += 1;
        }
        Ok(invoked)
    }
}
