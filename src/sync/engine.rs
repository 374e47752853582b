//! Applies a package's `init`, `copy` and `clear` declarations to the project tree.

use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::package::{CopyTarget, MappingPair, PluginDeclaration, ProjectKind};
use crate::runtime::Runtime;
use crate::runtime::path::resolve_relative_path;

use super::{ClearOutcome, MappingOutcome, MappingRecord, Phase, SyncReport};

/// Name of the marker file that opts a directory out of copy updates.
pub const IGNORE_MARKER: &str = "ignore";

pub struct SyncEngine<'a, R: Runtime> {
    runtime: &'a R,
    project_root: PathBuf,
}

impl<'a, R: Runtime> SyncEngine<'a, R> {
    /// Relative targets are resolved against `project_root`.
    pub fn new(runtime: &'a R, project_root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            project_root: project_root.into(),
        }
    }

    /// Synchronize one package. Phases run in the fixed order init, copy, clear.
    ///
    /// Does nothing unless the root package is a project. Filesystem errors during
    /// init and copy propagate; a failed clear is downgraded to a warning.
    #[tracing::instrument(skip(self, declaration))]
    pub fn sync(
        &self,
        install_path: &Path,
        declaration: &PluginDeclaration,
        project_kind: &ProjectKind,
    ) -> Result<SyncReport> {
        if !project_kind.is_project() {
            debug!(
                "Root package is {}, skipping synchronization of {:?}",
                project_kind, install_path
            );
            return Ok(SyncReport::skipped());
        }

        let mut report = SyncReport::default();

        for pair in &declaration.init {
            report.mappings.push(self.init_pair(install_path, pair)?);
        }

        for pair in &declaration.copy {
            report.mappings.push(self.copy_pair(install_path, pair)?);
        }

        if declaration.clear {
            report.clear = self.clear(install_path);
        }

        Ok(report)
    }

    fn init_pair(&self, install_path: &Path, pair: &MappingPair) -> Result<MappingRecord> {
        let target = resolve_relative_path(&self.project_root, Path::new(&pair.target));
        let source = install_path.join(&pair.source);

        let outcome = if self.runtime.exists(&target) {
            MappingOutcome::SkippedExists
        } else if !self.runtime.is_file(&source) {
            MappingOutcome::SkippedNoSource
        } else {
            info!("Init {:?} -> {:?}", source, target);
            self.ensure_parent(&target)?;
            self.runtime.copy(&source, &target)?;
            MappingOutcome::Copied
        };

        debug!("init {} -> {:?}: {:?}", pair.source, target, outcome);
        Ok(MappingRecord {
            phase: Phase::Init,
            source: pair.source.clone(),
            target,
            outcome,
        })
    }

    fn copy_pair(&self, install_path: &Path, pair: &MappingPair) -> Result<MappingRecord> {
        let spec = CopyTarget::parse(&pair.target);
        let target = resolve_relative_path(&self.project_root, Path::new(spec.path));
        let record = |outcome| MappingRecord {
            phase: Phase::Copy,
            source: pair.source.clone(),
            target: target.clone(),
            outcome,
        };

        // Force mode only applies when there is something to replace
        let force = spec.force_marker && self.runtime.exists(&target);

        if self.is_ignored(&target) {
            debug!("Ignore marker protects {:?}", target);
            return Ok(record(MappingOutcome::SkippedIgnored));
        }

        let mut outcome = MappingOutcome::Copied;
        if force {
            info!("Removing {:?} before replacing it", target);
            if self.runtime.is_file(&target) {
                self.runtime.remove_file(&target)?;
            } else {
                self.runtime.remove_dir_all(&target)?;
            }
            outcome = MappingOutcome::Replaced;
        }

        let source = install_path.join(&pair.source);
        if !self.runtime.exists(&source) {
            debug!("Source {:?} not shipped, skipping", source);
            return Ok(record(MappingOutcome::SkippedNoSource));
        }

        info!("Copy {:?} -> {:?}", source, target);
        self.ensure_parent(&target)?;
        if self.runtime.is_dir(&source) {
            self.runtime.copy_dir_all(&source, &target)?;
        } else {
            self.runtime.copy(&source, &target)?;
        }

        Ok(record(outcome))
    }

    /// An `ignore` file next to the target or directly inside it.
    fn is_ignored(&self, target: &Path) -> bool {
        target
            .parent()
            .is_some_and(|parent| self.runtime.exists(&parent.join(IGNORE_MARKER)))
            || self.runtime.exists(&target.join(IGNORE_MARKER))
    }

    fn ensure_parent(&self, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }
        Ok(())
    }

    fn clear(&self, install_path: &Path) -> ClearOutcome {
        if !self.runtime.exists(install_path) {
            return ClearOutcome::Cleared(install_path.to_path_buf());
        }

        match self.runtime.remove_dir_all(install_path) {
            Ok(()) => ClearOutcome::Cleared(install_path.to_path_buf()),
            Err(e) => {
                warn!("Failed to clear {:?}: {:#}", install_path, e);
                ClearOutcome::Failed {
                    path: install_path.to_path_buf(),
                    message: format!("{:#}", e),
                }
            }
        }
    }
}
