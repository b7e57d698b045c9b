//! Error types for `dtree-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message. Whether an error aborts a walk or is recorded as a
/// soft failure is decided by the visitor, not by the variant.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to something else.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An extension filter that does not start with `.` or is just `.`.
    #[error("invalid extension {0:?}: must start with '.' followed by at least one character")]
    InvalidExtension(String),

    /// Descending into `path` would exceed the configured depth bound.
    #[error("depth limit of {limit} exceeded at {path}")]
    DepthLimitExceeded { path: PathBuf, limit: usize },

    /// A visited path does not begin with the source root it was mapped from.
    #[error("{path} is not inside source root {root}")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    /// The destination of a copy or move lies within its own source tree.
    #[error("destination {destination} is inside source {tree}")]
    DestinationInsideSource { tree: PathBuf, destination: PathBuf },

    /// Reading from or writing to one side of a file copy failed.
    #[error("failed to copy {path}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a report line to the output sink failed.
    #[error("failed to write report output")]
    Output(#[source] std::io::Error),

    /// An I/O error on a known path that doesn't fit a more specific variant.
    #[error("I/O error on {path}")]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error with no path attached.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Maps an I/O error on `path` to the most specific variant available.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.into()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.into()),
            _ => CoreError::PathIo {
                path: path.into(),
                source: err,
            },
        }
    }
}

/// Convenience alias used throughout `dtree-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/missing/root"));
        assert_eq!(err.to_string(), "path not found: /missing/root");
    }

    #[test]
    fn permission_denied_displays_path() {
        let err = CoreError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "permission denied: /secret");
    }

    #[test]
    fn invalid_extension_displays_value() {
        let err = CoreError::InvalidExtension("txt".to_string());
        assert!(err.to_string().starts_with("invalid extension \"txt\""));
    }

    #[test]
    fn depth_limit_displays_limit_and_path() {
        let err = CoreError::DepthLimitExceeded {
            path: PathBuf::from("a/b/c"),
            limit: 2,
        };
        assert_eq!(err.to_string(), "depth limit of 2 exceeded at a/b/c");
    }

    #[test]
    fn outside_source_root_displays_both_paths() {
        let err = CoreError::OutsideSourceRoot {
            path: PathBuf::from("/other/file"),
            root: PathBuf::from("/src"),
        };
        assert_eq!(err.to_string(), "/other/file is not inside source root /src");
    }

    #[test]
    fn copy_failed_keeps_io_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = CoreError::CopyFailed {
            path: PathBuf::from("/dst/a.bin"),
            source: io_err,
        };
        assert_eq!(err.to_string(), "failed to copy /dst/a.bin");
        assert!(err.source().unwrap().to_string().contains("disk full"));
    }

    #[test]
    fn from_io_maps_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CoreError::from_io("/x", io_err);
        assert!(matches!(err, CoreError::NotFound(p) if p == PathBuf::from("/x")));
    }

    #[test]
    fn from_io_maps_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = CoreError::from_io("/x", io_err);
        assert!(matches!(err, CoreError::PermissionDenied(_)));
    }

    #[test]
    fn from_io_keeps_path_for_other_kinds() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists");
        let err = CoreError::from_io("/dst/alias", io_err);
        assert!(matches!(
            &err,
            CoreError::PathIo { path, .. } if path == &PathBuf::from("/dst/alias")
        ));
        assert_eq!(err.to_string(), "I/O error on /dst/alias");
        assert!(err.source().unwrap().to_string().contains("exists"));
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
    }
}
