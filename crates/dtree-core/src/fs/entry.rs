//! Entry representation for a single visited filesystem object.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::fs::extension::Extension;

/// What kind of filesystem object an [`Entry`] is.
///
/// Determined from `symlink_metadata`, so a symbolic link is always
/// [`EntryKind::Symlink`] and never the kind of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, FIFOs, device nodes.
    Other,
}

impl EntryKind {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let ft = metadata.file_type();
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One filesystem object encountered during a walk.
///
/// Entries are built by the traversal engine right before a visitor sees
/// them and are not retained afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    kind: EntryKind,
    size: u64,
    mode: u32,
    depth: usize,
}

impl Entry {
    /// Creates a new `Entry` from a path and metadata obtained without
    /// following links.
    pub fn new(path: PathBuf, metadata: &Metadata, depth: usize) -> Self {
        Self {
            path,
            kind: EntryKind::from_metadata(metadata),
            size: metadata.len(),
            mode: mode_bits(metadata),
            depth,
        }
    }

    /// Returns the path as constructed by the walk (root joined with names).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the size in bytes reported by the filesystem.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the permission/mode bits of the entry.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Returns the number of directory descents from the walk root (root is 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns the extension bytes of the final path component, including
    /// the dot.
    pub fn extension(&self) -> Option<&[u8]> {
        Extension::of(&self.path)
    }
}

#[cfg(unix)]
fn mode_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}
