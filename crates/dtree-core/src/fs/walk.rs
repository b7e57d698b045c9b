//! Physical, depth-first, pre-order directory walk.
//!
//! The [`Walker`] visits the root first, then every entry below it, handing
//! each one to an [`EntryVisitor`]. Symbolic links are reported as their own
//! entries and never followed.

use std::fs::ReadDir;
use std::path::Path;

use crate::config::WalkConfig;
use crate::error::{CoreError, CoreResult};
use crate::fs::entry::Entry;

/// What the walk should do after a visitor has seen an entry.
#[derive(Debug)]
pub enum VisitOutcome {
    /// Keep going; descend if the entry is a directory.
    Continue,
    /// Keep going, but do not descend into this directory entry.
    SkipSubtree,
    /// The entry could not be handled. Logged and counted; the walk continues.
    Failed(CoreError),
    /// Stop the walk and return this error.
    Abort(CoreError),
}

/// Receives every entry of a walk.
pub trait EntryVisitor {
    fn visit(&mut self, entry: &Entry) -> VisitOutcome;

    /// Called when the walk itself fails on a path below the root, e.g. a
    /// child that cannot be stat'ed or a sub-directory that cannot be read.
    ///
    /// The default records a soft failure.
    fn on_error(&mut self, _path: &Path, err: CoreError) -> VisitOutcome {
        VisitOutcome::Failed(err)
    }
}

impl<V: EntryVisitor + ?Sized> EntryVisitor for &mut V {
    fn visit(&mut self, entry: &Entry) -> VisitOutcome {
        (**self).visit(entry)
    }

    fn on_error(&mut self, path: &Path, err: CoreError) -> VisitOutcome {
        (**self).on_error(path, err)
    }
}

/// Totals gathered by the engine itself, independent of the visitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Entries handed to the visitor.
    pub visited: usize,
    /// Soft failures reported either by the visitor or by the walk.
    pub soft_failures: usize,
}

impl WalkSummary {
    /// `true` when nothing was skipped because of a soft failure.
    pub fn is_complete(&self) -> bool {
        self.soft_failures == 0
    }
}

/// The traversal engine.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkConfig,
}

enum Flow {
    Continue,
    Skip,
}

impl Walker {
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walks the tree rooted at `root`, calling `visitor` once per entry.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] / [`CoreError::PermissionDenied`] — the root
    ///   cannot be stat'ed, or the root directory cannot be read.
    /// - [`CoreError::DepthLimitExceeded`] — a directory deeper than the
    ///   configured bound would have to be read.
    /// - Any error a visitor returns through [`VisitOutcome::Abort`].
    pub fn walk<V: EntryVisitor>(&self, root: &Path, mut visitor: V) -> CoreResult<WalkSummary> {
        let metadata =
            std::fs::symlink_metadata(root).map_err(|e| CoreError::from_io(root, e))?;
        let entry = Entry::new(root.to_path_buf(), &metadata, 0);

        let mut summary = WalkSummary::default();
        if let Flow::Skip = self.dispatch(&entry, &mut visitor, &mut summary)? {
            return Ok(summary);
        }
        if entry.is_dir() {
            self.check_depth(&entry)?;
            let read_dir = std::fs::read_dir(root).map_err(|e| CoreError::from_io(root, e))?;
            self.walk_dir(root, read_dir, 1, &mut visitor, &mut summary)?;
        }

        tracing::debug!(
            root = %root.display(),
            visited = summary.visited,
            soft_failures = summary.soft_failures,
            "walk finished"
        );
        Ok(summary)
    }

    /// Visits every child of an already-opened directory whose children sit
    /// at `depth`. The `ReadDir` handle stays open while descending.
    fn walk_dir<V: EntryVisitor>(
        &self,
        dir: &Path,
        read_dir: ReadDir,
        depth: usize,
        visitor: &mut V,
        summary: &mut WalkSummary,
    ) -> CoreResult<()> {
        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(e) => {
                    let err = CoreError::from_io(dir, e);
                    self.handle_error(dir, err, visitor, summary)?;
                    continue;
                }
            };
            let path = dir.join(dir_entry.file_name());

            let metadata = match std::fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    let err = CoreError::from_io(&path, e);
                    self.handle_error(&path, err, visitor, summary)?;
                    continue;
                }
            };
            let entry = Entry::new(path, &metadata, depth);

            if let Flow::Skip = self.dispatch(&entry, visitor, summary)? {
                continue;
            }
            if !entry.is_dir() {
                continue;
            }

            self.check_depth(&entry)?;
            match std::fs::read_dir(entry.path()) {
                Ok(child) => self.walk_dir(entry.path(), child, depth + 1, visitor, summary)?,
                Err(e) => {
                    let err = CoreError::from_io(entry.path(), e);
                    self.handle_error(entry.path(), err, visitor, summary)?;
                }
            }
        }
        Ok(())
    }

    fn check_depth(&self, entry: &Entry) -> CoreResult<()> {
        if entry.depth() >= self.config.max_depth() {
            return Err(CoreError::DepthLimitExceeded {
                path: entry.path().to_path_buf(),
                limit: self.config.max_depth(),
            });
        }
        Ok(())
    }

    fn dispatch<V: EntryVisitor>(
        &self,
        entry: &Entry,
        visitor: &mut V,
        summary: &mut WalkSummary,
    ) -> CoreResult<Flow> {
        summary.visited += 1;
        let outcome = visitor.visit(entry);
        self.apply(entry.path(), outcome, summary)
    }

    fn handle_error<V: EntryVisitor>(
        &self,
        path: &Path,
        err: CoreError,
        visitor: &mut V,
        summary: &mut WalkSummary,
    ) -> CoreResult<()> {
        let outcome = visitor.on_error(path, err);
        self.apply(path, outcome, summary).map(|_| ())
    }

    fn apply(&self, path: &Path, outcome: VisitOutcome, summary: &mut WalkSummary) -> CoreResult<Flow> {
        match outcome {
            VisitOutcome::Continue => Ok(Flow::Continue),
            VisitOutcome::SkipSubtree => Ok(Flow::Skip),
            VisitOutcome::Failed(err) => {
                summary.soft_failures += 1;
                tracing::warn!(path = %path.display(), "{err}");
                Ok(Flow::Skip)
            }
            VisitOutcome::Abort(err) => {
                tracing::error!(path = %path.display(), "walk aborted: {err}");
                Err(err)
            }
        }
    }
}
