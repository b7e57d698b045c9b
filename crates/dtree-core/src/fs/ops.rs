//! Per-entry filesystem side effects used by the visit actions.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Creates a single directory with the given mode bits.
///
/// The parent must already exist. An existing directory at `dest` is
/// accepted as-is.
///
/// # Errors
///
/// - [`CoreError::NotADirectory`] if `dest` exists and is not a directory.
/// - [`CoreError::NotFound`] / [`CoreError::PermissionDenied`] /
///   [`CoreError::PathIo`] for any other failure.
pub fn make_dir(dest: &Path, mode: u32) -> CoreResult<()> {
    let mut builder = std::fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode & 0o7777);
    }
    #[cfg(not(unix))]
    let _ = mode;

    match builder.create(dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let existing =
                std::fs::symlink_metadata(dest).map_err(|e| CoreError::from_io(dest, e))?;
            if existing.is_dir() {
                Ok(())
            } else {
                Err(CoreError::NotADirectory(dest.to_path_buf()))
            }
        }
        Err(e) => Err(CoreError::from_io(dest, e)),
    }
}

/// Copies the bytes of `src` into `dest` in `chunk_size` pieces.
///
/// `dest` is created (or truncated) with `mode`. Both handles are closed
/// before returning, on success and on failure. Returns the number of bytes
/// copied.
///
/// # Errors
///
/// - [`CoreError::NotFound`] / [`CoreError::PermissionDenied`] /
///   [`CoreError::PathIo`] if either file cannot be opened.
/// - [`CoreError::CopyFailed`] if reading or writing fails midway.
pub fn copy_file_chunked(src: &Path, dest: &Path, mode: u32, chunk_size: usize) -> CoreResult<u64> {
    let mut reader = File::open(src).map_err(|e| CoreError::from_io(src, e))?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o7777);
    }
    #[cfg(not(unix))]
    let _ = mode;
    let mut writer = options.open(dest).map_err(|e| CoreError::from_io(dest, e))?;

    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut copied = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(CoreError::CopyFailed {
                    path: src.to_path_buf(),
                    source,
                })
            }
        };
        writer
            .write_all(&buf[..n])
            .map_err(|source| CoreError::CopyFailed {
                path: dest.to_path_buf(),
                source,
            })?;
        copied += n as u64;
    }
    writer.flush().map_err(|source| CoreError::CopyFailed {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(copied)
}

/// Recreates the symbolic link `src` at `dest`, pointing at the same target.
///
/// A link or file already at `dest` is replaced, so copying into an earlier
/// copy succeeds.
///
/// # Errors
///
/// - [`CoreError::PathIo`] (`AlreadyExists`) if `dest` is a directory.
#[cfg(unix)]
pub fn copy_symlink(src: &Path, dest: &Path) -> CoreResult<()> {
    let target = std::fs::read_link(src).map_err(|e| CoreError::from_io(src, e))?;
    match std::fs::symlink_metadata(dest) {
        Ok(existing) if !existing.is_dir() => remove_file(dest)?,
        _ => {}
    }
    std::os::unix::fs::symlink(&target, dest).map_err(|e| CoreError::from_io(dest, e))
}

/// Removes a single non-directory entry.
pub fn remove_file(path: &Path) -> CoreResult<()> {
    std::fs::remove_file(path).map_err(|e| CoreError::from_io(path, e))
}

/// Renames `src` to `dest` with the platform rename primitive.
///
/// No copy-and-delete fallback: cross-device moves fail the way the
/// platform reports them.
pub fn rename(src: &Path, dest: &Path) -> CoreResult<()> {
    std::fs::rename(src, dest).map_err(|e| CoreError::from_io(src, e))
}
