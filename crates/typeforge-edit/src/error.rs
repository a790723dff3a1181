//! Source file errors

use std::path::PathBuf;

/// Errors from loading and writing source files
#[derive(Debug, thiserror::Error)]
pub enum SourceFileError {
    /// Underlying filesystem failure
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// File the operation targeted
        path: PathBuf,
        /// Originating error
        #[source]
        source: std::io::Error,
    },

    /// The file changed on disk after it was loaded
    ///
    /// The commit performs no write; the caller must reload and retry.
    #[error("file '{}' was externally modified, try again", path.display())]
    ConcurrentModification {
        /// File whose modification time no longer matches
        path: PathBuf,
    },

    /// The file's detected encoding is not a unicode family
    #[error("cannot write '{}': detected encoding {encoding} is not unicode", path.display())]
    UnsupportedEncoding {
        /// File that was refused
        path: PathBuf,
        /// Name of the detected encoding
        encoding: &'static str,
    },
}
