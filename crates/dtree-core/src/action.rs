//! Visit actions and the state they share during one invocation.
//!
//! An [`Operation`] names what to do. [`OperationContext`] carries the
//! filters, destination and counters. [`ActionVisitor`] applies one operation
//! to every entry the walk produces, writing per-entry report lines to a sink.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::WalkConfig;
use crate::error::{CoreError, CoreResult};
use crate::fs::entry::{Entry, EntryKind};
use crate::fs::{ensure_disjoint, ops, DestinationMapper, EntryVisitor, Extension, VisitOutcome};
use crate::fs::{WalkSummary, Walker};

/// One of the eight tree operations, with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Print every entry's path.
    List,
    /// Count regular files.
    CountFiles,
    /// Count directories, the root included.
    CountDirs,
    /// Sum the sizes of regular files.
    Size,
    /// Print files whose extension matches.
    FindByExtension(Extension),
    /// Remove files whose extension matches.
    DeleteByExtension(Extension),
    /// Copy the tree under `destination`, skipping files with the `exclude`
    /// extension. Directories are always created.
    CopyTree {
        destination: PathBuf,
        exclude: Option<Extension>,
    },
    /// Rename the tree to `destination`.
    MoveTree { destination: PathBuf },
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::CountFiles => "count-files",
            Operation::CountDirs => "count-dirs",
            Operation::Size => "size",
            Operation::FindByExtension(_) => "find-by-extension",
            Operation::DeleteByExtension(_) => "delete-by-extension",
            Operation::CopyTree { .. } => "copy-tree",
            Operation::MoveTree { .. } => "move-tree",
        }
    }

    /// Whether a partial result must fail the whole operation.
    pub fn is_strict(&self) -> bool {
        matches!(self, Operation::CopyTree { .. } | Operation::MoveTree { .. })
    }
}

/// Running totals mutated by the actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
    pub matched: u64,
    pub deleted: u64,
    pub created_dirs: u64,
    pub copied_files: u64,
    pub copied_bytes: u64,
    pub skipped: u64,
    pub moved: u64,
}

/// Shared state for one invocation: filters, destination and counters.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    search: Option<Extension>,
    exclude: Option<Extension>,
    destination: Option<DestinationMapper>,
    chunk_size: usize,
    counters: Counters,
}

impl OperationContext {
    /// Builds the context an operation needs when walking from `root`.
    pub fn new(operation: &Operation, root: &Path, config: &WalkConfig) -> Self {
        let mut ctx = Self {
            chunk_size: config.copy_chunk_size(),
            ..Self::default()
        };
        match operation {
            Operation::FindByExtension(ext) | Operation::DeleteByExtension(ext) => {
                ctx.search = Some(ext.clone());
            }
            Operation::CopyTree {
                destination,
                exclude,
            } => {
                ctx.exclude = exclude.clone();
                ctx.destination = Some(DestinationMapper::new(root, destination));
            }
            Operation::MoveTree { destination } => {
                ctx.destination = Some(DestinationMapper::new(root, destination));
            }
            Operation::List | Operation::CountFiles | Operation::CountDirs | Operation::Size => {}
        }
        ctx
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    fn search_matches(&self, path: &Path) -> bool {
        self.search.as_ref().is_some_and(|ext| ext.matches(path))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.as_ref().is_some_and(|ext| ext.matches(path))
    }

    fn destination_for(&self, path: &Path) -> CoreResult<PathBuf> {
        match &self.destination {
            Some(mapper) => mapper.map(path),
            None => Err(CoreError::OutsideSourceRoot {
                path: path.to_path_buf(),
                root: PathBuf::new(),
            }),
        }
    }
}

/// Applies one [`Operation`] to every visited entry.
pub struct ActionVisitor<'a, W: Write> {
    operation: &'a Operation,
    ctx: &'a mut OperationContext,
    out: W,
}

impl<'a, W: Write> ActionVisitor<'a, W> {
    pub fn new(operation: &'a Operation, ctx: &'a mut OperationContext, out: W) -> Self {
        Self {
            operation,
            ctx,
            out,
        }
    }

    fn report(&mut self, line: std::fmt::Arguments<'_>) -> VisitOutcome {
        match writeln!(self.out, "{line}") {
            Ok(()) => VisitOutcome::Continue,
            Err(e) => VisitOutcome::Abort(CoreError::Output(e)),
        }
    }

    fn list(&mut self, entry: &Entry) -> VisitOutcome {
        self.report(format_args!("{}", entry.path().display()))
    }

    fn find(&mut self, entry: &Entry) -> VisitOutcome {
        if !entry.is_file() || !self.ctx.search_matches(entry.path()) {
            return VisitOutcome::Continue;
        }
        self.ctx.counters.matched += 1;
        self.report(format_args!("{}", entry.path().display()))
    }

    fn delete(&mut self, entry: &Entry) -> VisitOutcome {
        if !entry.is_file() || !self.ctx.search_matches(entry.path()) {
            return VisitOutcome::Continue;
        }
        self.ctx.counters.matched += 1;
        match ops::remove_file(entry.path()) {
            Ok(()) => {
                self.ctx.counters.deleted += 1;
                self.report(format_args!("Deleted: {}", entry.path().display()))
            }
            Err(err) => VisitOutcome::Failed(err),
        }
    }

    fn copy(&mut self, entry: &Entry) -> VisitOutcome {
        let dest = match self.ctx.destination_for(entry.path()) {
            Ok(dest) => dest,
            Err(err) => return VisitOutcome::Abort(err),
        };
        match entry.kind() {
            EntryKind::Directory => match ops::make_dir(&dest, entry.mode()) {
                Ok(()) => {
                    self.ctx.counters.created_dirs += 1;
                    VisitOutcome::Continue
                }
                Err(err) => VisitOutcome::Abort(err),
            },
            EntryKind::File if self.ctx.is_excluded(entry.path()) => {
                tracing::debug!(path = %entry.path().display(), "excluded from copy");
                self.ctx.counters.skipped += 1;
                VisitOutcome::Continue
            }
            EntryKind::File => {
                match ops::copy_file_chunked(entry.path(), &dest, entry.mode(), self.ctx.chunk_size)
                {
                    Ok(bytes) => {
                        self.ctx.counters.copied_files += 1;
                        self.ctx.counters.copied_bytes += bytes;
                        VisitOutcome::Continue
                    }
                    Err(err) => VisitOutcome::Abort(err),
                }
            }
            #[cfg(unix)]
            EntryKind::Symlink => match ops::copy_symlink(entry.path(), &dest) {
                Ok(()) => VisitOutcome::Continue,
                Err(err) => VisitOutcome::Abort(err),
            },
            _ => {
                tracing::debug!(path = %entry.path().display(), kind = ?entry.kind(), "not copied");
                self.ctx.counters.skipped += 1;
                VisitOutcome::Continue
            }
        }
    }

    fn relocate(&mut self, entry: &Entry) -> VisitOutcome {
        let dest = match self.ctx.destination_for(entry.path()) {
            Ok(dest) => dest,
            Err(err) => return VisitOutcome::Abort(err),
        };
        match ops::rename(entry.path(), &dest) {
            Ok(()) => {
                self.ctx.counters.moved += 1;
                tracing::debug!(from = %entry.path().display(), to = %dest.display(), "renamed");
                // The rename carried the directory's contents along.
                if entry.is_dir() {
                    VisitOutcome::SkipSubtree
                } else {
                    VisitOutcome::Continue
                }
            }
            Err(err) => VisitOutcome::Abort(err),
        }
    }
}

impl<W: Write> EntryVisitor for ActionVisitor<'_, W> {
    fn visit(&mut self, entry: &Entry) -> VisitOutcome {
        match self.operation {
            Operation::List => self.list(entry),
            Operation::CountFiles => {
                if entry.is_file() {
                    self.ctx.counters.files += 1;
                }
                VisitOutcome::Continue
            }
            Operation::CountDirs => {
                if entry.is_dir() {
                    self.ctx.counters.dirs += 1;
                }
                VisitOutcome::Continue
            }
            Operation::Size => {
                if entry.is_file() {
                    self.ctx.counters.bytes += entry.size();
                }
                VisitOutcome::Continue
            }
            Operation::FindByExtension(_) => self.find(entry),
            Operation::DeleteByExtension(_) => self.delete(entry),
            Operation::CopyTree { .. } => self.copy(entry),
            Operation::MoveTree { .. } => self.relocate(entry),
        }
    }

    fn on_error(&mut self, _path: &Path, err: CoreError) -> VisitOutcome {
        if self.operation.is_strict() {
            VisitOutcome::Abort(err)
        } else {
            VisitOutcome::Failed(err)
        }
    }
}

/// Result of a completed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub counters: Counters,
    pub summary: WalkSummary,
}

impl Report {
    /// `true` when no entry was skipped because of a soft failure.
    pub fn is_complete(&self) -> bool {
        self.summary.is_complete()
    }
}

/// Runs `operation` over the tree at `root`, writing per-entry report lines
/// to `out`.
///
/// # Errors
///
/// - [`CoreError::DestinationInsideSource`] for a copy or move into its own
///   source tree.
/// - Any fatal error from the walk (see [`Walker::walk`]).
pub fn run<W: Write>(
    operation: &Operation,
    root: &Path,
    config: &WalkConfig,
    mut out: W,
) -> CoreResult<Report> {
    if let Operation::CopyTree { destination, .. } | Operation::MoveTree { destination } =
        operation
    {
        ensure_disjoint(root, destination)?;
    }

    tracing::info!(operation = operation.name(), root = %root.display(), "starting walk");

    let mut ctx = OperationContext::new(operation, root, config);
    let summary = {
        let visitor = ActionVisitor::new(operation, &mut ctx, &mut out);
        Walker::new(*config).walk(root, visitor)?
    };
    out.flush().map_err(CoreError::Output)?;

    Ok(Report {
        counters: ctx.counters,
        summary,
    })
}
