//! Package lifecycle hooks.

mod command;
mod registry;
mod traits;

pub use command::{CommandHook, DEFAULT_TIMEOUT_SECS};
pub use registry::HookRegistry;
pub use traits::{FnHook, Hook, HookEvent};
