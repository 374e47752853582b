//! Outcome of a synchronization run.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::runtime::display_path;

/// Which mapping table a pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Copy,
}

/// Terminal state of a single mapping pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOutcome {
    /// Init target already present
    SkippedExists,
    /// Source not shipped by the package
    SkippedNoSource,
    /// An `ignore` marker protects the target
    SkippedIgnored,
    Copied,
    /// Existing target removed before copying (force mode)
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
    pub phase: Phase,
    pub source: String,
    pub target: PathBuf,
    pub outcome: MappingOutcome,
}

impl MappingRecord {
    /// Progress line for this pair, if the pair did anything worth reporting.
    pub fn progress_line(&self) -> Option<String> {
        let verb = match (self.phase, self.outcome) {
            (Phase::Init, MappingOutcome::Copied) => "Init Source",
            (Phase::Copy, MappingOutcome::SkippedIgnored) => "Skip Copy",
            (Phase::Copy, MappingOutcome::Copied) => "Copy Source",
            (Phase::Copy, MappingOutcome::Replaced) => "Push Source",
            _ => return None,
        };
        Some(format!(
            "  > {} {} to {}",
            verb,
            self.source,
            self.target.display()
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClearOutcome {
    #[default]
    NotRequested,
    Cleared(PathBuf),
    Failed { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// True when the root package is not a project and nothing was done.
    pub skipped: bool,
    pub mappings: Vec<MappingRecord>,
    pub clear: ClearOutcome,
}

impl SyncReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn count(&self, outcome: MappingOutcome) -> usize {
        self.mappings.iter().filter(|m| m.outcome == outcome).count()
    }

    /// Human-readable progress lines, with the cleared path shown relative to `root`.
    pub fn progress_lines(&self, root: &Path) -> Vec<String> {
        let mut lines: Vec<String> = self
            .mappings
            .iter()
            .filter_map(MappingRecord::progress_line)
            .collect();
        if let ClearOutcome::Cleared(path) | ClearOutcome::Failed { path, .. } = &self.clear {
            lines.push(format!(
                "  > Clear Vendor {}",
                display_path(path, root).display()
            ));
        }
        lines
    }

    /// Error line for a failed clear phase.
    pub fn clear_error(&self) -> Option<String> {
        match &self.clear {
            ClearOutcome::Failed { message, .. } => Some(format!("  > {}", message)),
            _ => None,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped {
            return f.write_str("skipped");
        }
        write!(
            f,
            "{} copied, {} replaced, {} skipped",
            self.count(MappingOutcome::Copied),
            self.count(MappingOutcome::Replaced),
            self.mappings.len()
                - self.count(MappingOutcome::Copied)
                - self.count(MappingOutcome::Replaced)
        )
    }
}
