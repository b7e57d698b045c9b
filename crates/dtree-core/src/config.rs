//! Walk configuration.
//!
//! dtree reads no configuration files; every knob here is populated from the
//! command line and falls back to the defaults below.

/// Default bound on directory-descent depth.
///
/// The walk holds one open directory handle per active level, so this also
/// bounds the number of descriptors held during traversal.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Default chunk size, in bytes, used when copying file contents.
pub const DEFAULT_COPY_CHUNK_SIZE: usize = 4096;

/// Settings shared by the traversal engine and the copy action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkConfig {
    max_depth: usize,
    copy_chunk_size: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            copy_chunk_size: DEFAULT_COPY_CHUNK_SIZE,
        }
    }
}

impl WalkConfig {
    /// Returns a copy with the depth bound replaced.
    ///
    /// The root is depth 0; reading a directory at depth `d` requires
    /// `d < max_depth`.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Returns a copy with the copy chunk size replaced. Zero is clamped to 1.
    pub fn with_copy_chunk_size(self, copy_chunk_size: usize) -> Self {
        Self {
            copy_chunk_size: copy_chunk_size.max(1),
            ..self
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn copy_chunk_size(&self) -> usize {
        self.copy_chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WalkConfig::default();
        assert_eq!(config.max_depth(), 20);
        assert_eq!(config.copy_chunk_size(), 4096);
    }

    #[test]
    fn builders_replace_single_field() {
        let config = WalkConfig::default().with_max_depth(3);
        assert_eq!(config.max_depth(), 3);
        assert_eq!(config.copy_chunk_size(), DEFAULT_COPY_CHUNK_SIZE);

        let config = config.with_copy_chunk_size(16);
        assert_eq!(config.max_depth(), 3);
        assert_eq!(config.copy_chunk_size(), 16);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let config = WalkConfig::default().with_copy_chunk_size(0);
        assert_eq!(config.copy_chunk_size(), 1);
    }
}
