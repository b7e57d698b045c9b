//! Destination-path construction for copy and move.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Maps paths under a source root onto the same relative location under a
/// destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationMapper {
    source_root: PathBuf,
    destination_root: PathBuf,
}

impl DestinationMapper {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Returns `destination_root` followed by `path` with `source_root`
    /// stripped. The source root itself maps to the destination root.
    ///
    /// # Errors
    ///
    /// - [`CoreError::OutsideSourceRoot`] if `path` does not begin with the
    ///   source root (compared component-wise).
    pub fn map(&self, path: &Path) -> CoreResult<PathBuf> {
        let suffix = path
            .strip_prefix(&self.source_root)
            .map_err(|_| CoreError::OutsideSourceRoot {
                path: path.to_path_buf(),
                root: self.source_root.clone(),
            })?;
        if suffix.as_os_str().is_empty() {
            return Ok(self.destination_root.clone());
        }
        Ok(self.destination_root.join(suffix))
    }
}

/// Rejects a destination that is the source itself or lies inside it.
///
/// The source is resolved with `canonicalize`; the destination is resolved
/// through its nearest existing ancestor since it usually does not exist yet.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if the source does not exist.
/// - [`CoreError::DestinationInsideSource`] if the trees overlap.
pub fn ensure_disjoint(source: &Path, destination: &Path) -> CoreResult<()> {
    let source_abs = source
        .canonicalize()
        .map_err(|e| CoreError::from_io(source, e))?;
    let destination_abs = resolve_partial(destination)?;

    if destination_abs.starts_with(&source_abs) {
        return Err(CoreError::DestinationInsideSource {
            tree: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonicalizes the longest existing prefix of `path` and re-appends the
/// components that do not exist yet.
fn resolve_partial(path: &Path) -> CoreResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(resolved) => {
                let mut out = resolved;
                for part in missing.iter().rev() {
                    out.push(part);
                }
                return Ok(out);
            }
            Err(_) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => return Ok(absolute),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn maps_nested_path() {
        let mapper = DestinationMapper::new("src/tree", "/backup/tree");
        let mapped = mapper.map(Path::new("src/tree/sub/b.log")).unwrap();
        assert_eq!(mapped, PathBuf::from("/backup/tree/sub/b.log"));
    }

    #[test]
    fn root_maps_to_destination_root() {
        let mapper = DestinationMapper::new("src", "dst");
        assert_eq!(mapper.map(Path::new("src")).unwrap(), PathBuf::from("dst"));
    }

    #[test]
    fn trailing_separator_on_root_is_tolerated() {
        let mapper = DestinationMapper::new("src/", "dst");
        assert_eq!(
            mapper.map(Path::new("src/a.txt")).unwrap(),
            PathBuf::from("dst/a.txt")
        );
    }

    #[test]
    fn path_outside_root_is_rejected() {
        let mapper = DestinationMapper::new("src", "dst");
        let err = mapper.map(Path::new("other/a.txt")).unwrap_err();
        assert!(matches!(err, CoreError::OutsideSourceRoot { .. }));
    }

    #[test]
    fn partial_name_prefix_is_not_a_match() {
        // "srcx" shares a textual prefix with "src" but is a different component.
        let mapper = DestinationMapper::new("src", "dst");
        assert!(mapper.map(Path::new("srcx/a.txt")).is_err());
    }

    #[test]
    fn disjoint_trees_are_accepted() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();

        ensure_disjoint(&src, &tmp.path().join("dst")).unwrap();
        ensure_disjoint(&src, &tmp.path().join("srcx/nested")).unwrap();
    }

    #[test]
    fn destination_inside_source_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();

        let err = ensure_disjoint(&src, &src.join("new/copy")).unwrap_err();
        assert!(matches!(err, CoreError::DestinationInsideSource { .. }));

        let err = ensure_disjoint(&src, &src).unwrap_err();
        assert!(matches!(err, CoreError::DestinationInsideSource { .. }));
    }

    #[test]
    fn missing_source_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = ensure_disjoint(&tmp.path().join("nope"), &tmp.path().join("dst")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
