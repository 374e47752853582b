//! Synchronization of package-bundled files into the project tree.

mod engine;
mod report;

pub use engine::{IGNORE_MARKER, SyncEngine};
pub use report::{ClearOutcome, MappingOutcome, MappingRecord, Phase, SyncReport};
