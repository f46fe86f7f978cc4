//! Store configuration.

use std::path::PathBuf;

use crate::codec::Codec;

/// Default root directory for collections.
pub const DEFAULT_ROOT: &str = "./db";
/// Default prefix for derived entry filenames.
pub const DEFAULT_FILE_PREFIX: &str = "_key_";
/// Default extension for derived entry filenames.
pub const DEFAULT_FILE_EXT: &str = "json";

/// Configuration for a [`Store`](crate::Store). Immutable once the store is
/// constructed.
#[derive(Debug)]
pub struct StoreConfig {
    /// Base directory under which all collections live.
    pub root: PathBuf,

    /// Collections created eagerly by
    /// [`Store::init_collections`](crate::Store::init_collections), in order.
    pub collections: Vec<String>,

    /// Prepended to every derived filename, keeping entry files apart from
    /// unrelated files in the same directory.
    pub file_prefix: String,

    /// Extension appended to every derived filename.
    pub file_ext: String,

    /// Encode/decode pair applied around every write/read.
    pub codec: Codec,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            collections: Vec::new(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            file_ext: DEFAULT_FILE_EXT.to_string(),
            codec: Codec::default(),
        }
    }
}

impl StoreConfig {
    /// Create a config rooted at the given directory, with defaults for
    /// everything else.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Set the collections to be created eagerly at startup.
    #[must_use]
    pub fn with_collections(
        mut self,
        collections: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }

    /// Set the filename prefix for entry files.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Set the filename extension for entry files.
    #[must_use]
    pub fn with_file_ext(mut self, ext: impl Into<String>) -> Self {
        self.file_ext = ext.into();
        self
    }

    /// Set the encode/decode pair.
    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();

        assert_eq!(config.root, PathBuf::from("./db"));
        assert!(config.collections.is_empty());
        assert_eq!(config.file_prefix, "_key_");
        assert_eq!(config.file_ext, "json");
    }

    #[test]
    fn test_builders() {
        let config = StoreConfig::new("/tmp/teststore")
            .with_collections(["orders", "users"])
            .with_file_prefix("rec-")
            .with_file_ext("dat");

        assert_eq!(config.root, PathBuf::from("/tmp/teststore"));
        assert_eq!(config.collections, vec!["orders", "users"]);
        assert_eq!(config.file_prefix, "rec-");
        assert_eq!(config.file_ext, "dat");
    }
}
