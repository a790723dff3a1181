//! Source file lifecycle
//!
//! Load detects the character encoding and records the on-disk modification
//! time; every commit re-validates that time before touching anything, and
//! all writes go through a temporary file followed by an atomic rename. The
//! guard is optimistic check-then-write, not a lock: good enough for one
//! interactive operator, not for a multi-writer service.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use encoding_rs::Encoding;

use crate::error::SourceFileError;
use crate::insertion::{merge_insertions, Insertion};

/// Whether a commit actually writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Validate, merge, and replace the target file
    Apply,
    /// Validate and merge, but write nothing
    DryRun,
}

/// Result of a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The file the commit targeted (path plus suffix)
    pub target: PathBuf,
    /// False when the commit ran in [`WriteMode::DryRun`]
    pub written: bool,
}

/// A loaded source file with its detected encoding and load-time mtime
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    encoding: &'static Encoding,
    loaded_modified: SystemTime,
}

impl SourceFile {
    /// Load a file, sniffing its encoding and decoding to UTF-8
    ///
    /// # Errors
    /// Returns [`SourceFileError::Io`] if the file cannot be read or its
    /// metadata is unavailable.
    pub fn load(path: impl Into<PathBuf>) -> Result<(Self, String), SourceFileError> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|source| SourceFileError::Io {
            path: path.clone(),
            source,
        })?;
        let loaded_modified = modified_time(&path)?;

        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(&bytes, true);
        let encoding = detector.guess(None, true);
        let (text, _, _) = encoding.decode(&bytes);
        tracing::debug!(path = %path.display(), encoding = encoding.name(), "loaded source");

        let file = Self {
            path,
            encoding,
            loaded_modified,
        };
        Ok((file, text.into_owned()))
    }

    /// Path of the underlying file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the detected encoding
    #[inline]
    #[must_use]
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Whether the detected encoding is a unicode family
    ///
    /// Only unicode-encoded files are writable.
    #[inline]
    #[must_use]
    pub fn is_unicode(&self) -> bool {
        self.encoding.name().starts_with("UTF")
    }

    /// Merge `insertions` into the file's current content and replace
    /// `path + suffix` atomically
    ///
    /// An empty suffix targets the real file; a non-empty suffix (for
    /// example `".shadow"`) produces a sibling artifact for verification.
    /// The on-disk modification time is re-checked first and any difference
    /// aborts the commit with no write.
    ///
    /// # Errors
    /// [`SourceFileError::UnsupportedEncoding`] for non-unicode files,
    /// [`SourceFileError::ConcurrentModification`] when the file changed
    /// since load, [`SourceFileError::Io`] on filesystem failures.
    pub fn update_file(
        &self,
        insertions: &[Insertion],
        suffix: &str,
    ) -> Result<WriteOutcome, SourceFileError> {
        self.update_file_with(insertions, suffix, WriteMode::Apply)
    }

    /// [`update_file`](Self::update_file) with an explicit [`WriteMode`]
    ///
    /// Dry runs perform every validation and the full merge, then stop
    /// short of the write.
    pub fn update_file_with(
        &self,
        insertions: &[Insertion],
        suffix: &str,
        mode: WriteMode,
    ) -> Result<WriteOutcome, SourceFileError> {
        if !self.is_unicode() {
            return Err(SourceFileError::UnsupportedEncoding {
                path: self.path.clone(),
                encoding: self.encoding.name(),
            });
        }
        if modified_time(&self.path)? != self.loaded_modified {
            return Err(SourceFileError::ConcurrentModification {
                path: self.path.clone(),
            });
        }

        let bytes = fs::read(&self.path).map_err(|source| SourceFileError::Io {
            path: self.path.clone(),
            source,
        })?;
        let (text, _, _) = self.encoding.decode(&bytes);
        let merged = merge_insertions(split_keeping_newlines(&text), insertions);

        let target = path_with_suffix(&self.path, suffix);
        if mode == WriteMode::DryRun {
            tracing::info!(target = %target.display(), "dry run, skipping write");
            return Ok(WriteOutcome {
                target,
                written: false,
            });
        }

        self.write_result(&merged.concat(), &target)?;
        tracing::info!(target = %target.display(), "wrote updated file");
        Ok(WriteOutcome {
            target,
            written: true,
        })
    }

    /// Write through a temp file in the destination directory, then rename
    fn write_result(&self, content: &str, target: &Path) -> Result<(), SourceFileError> {
        let io_err = |source| SourceFileError::Io {
            path: target.to_path_buf(),
            source,
        };
        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        let (encoded, _, _) = self.encoding.encode(content);
        std::io::Write::write_all(&mut tmp, &encoded).map_err(io_err)?;
        tmp.persist(target).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

fn modified_time(path: &Path) -> Result<SystemTime, SourceFileError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| SourceFileError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Split into lines, each keeping its terminator
fn split_keeping_newlines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find('\n') {
        lines.push(rest[..=pos].to_string());
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }
    lines
}

/// `a/b.py` plus `".shadow"` is `a/b.py.shadow`
fn path_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    if suffix.is_empty() {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_detects_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "a.py", "def foo():\n    pass\n".as_bytes());
        let (file, text) = SourceFile::load(&path).unwrap();
        assert!(file.is_unicode());
        assert_eq!(text, "def foo():\n    pass\n");
    }

    #[test]
    fn update_file_applies_insertions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "a.py", "def foo(a):\n    pass\n".as_bytes());
        let (file, _) = SourceFile::load(&path).unwrap();
        let insertions = [
            Insertion::inline(": int", 1, 10, "foo"),
            Insertion::inline(" -> None", 1, 11, "foo"),
        ];
        let outcome = file.update_file(&insertions, "").unwrap();
        assert!(outcome.written);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "def foo(a: int) -> None:\n    pass\n"
        );
    }

    #[test]
    fn update_file_with_suffix_writes_shadow() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "a.py", "x = 1\n".as_bytes());
        let (file, _) = SourceFile::load(&path).unwrap();
        let outcome = file
            .update_file(&[Insertion::full_line("import os", 1, "m")], ".shadow")
            .unwrap();
        assert_eq!(outcome.target, dir.path().join("a.py.shadow"));
        assert_eq!(
            fs::read_to_string(outcome.target).unwrap(),
            "import os\nx = 1\n"
        );
        // Real file untouched.
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 1\n");
    }

    #[test]
    fn concurrent_modification_aborts_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "a.py", "x = 1\n".as_bytes());
        let (file, _) = SourceFile::load(&path).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(&path, "x = 2\n").unwrap();

        let result = file.update_file(&[Insertion::full_line("import os", 1, "m")], "");
        assert!(matches!(
            result,
            Err(SourceFileError::ConcurrentModification { .. })
        ));
        // Target bytes unchanged by the failed commit.
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 2\n");
    }

    #[test]
    fn non_unicode_write_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        // Latin-1 French. Every accented character is a lone high byte,
        // which is invalid UTF-8, so the sniffer can only resolve to a
        // legacy single-byte encoding.
        let text = "# Le caf\u{e9} \u{e9}tait d\u{e9}j\u{e0} ferm\u{e9}; l'\u{e9}t\u{e9} s'ach\u{e8}ve.\n\
                    # H\u{e9}l\u{e8}ne r\u{ea}vait d'une journ\u{e9}e enti\u{e8}re sans t\u{e9}l\u{e9}phone.\n\
                    summary = \"\u{c9}t\u{e9}, caf\u{e9}, cr\u{e8}me br\u{fb}l\u{e9}e, d\u{e9}j\u{e0} vu\"\n";
        let latin1: Vec<u8> = text.chars().map(|c| c as u8).collect();
        let path = write_fixture(&dir, "legacy.py", &latin1);
        let (file, _) = SourceFile::load(&path).unwrap();
        assert!(!file.is_unicode());
        let result = file.update_file(&[], "");
        assert!(matches!(
            result,
            Err(SourceFileError::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "a.py", "x = 1\n".as_bytes());
        let (file, _) = SourceFile::load(&path).unwrap();
        let outcome = file
            .update_file_with(
                &[Insertion::full_line("import os", 1, "m")],
                ".shadow",
                WriteMode::DryRun,
            )
            .unwrap();
        assert!(!outcome.written);
        assert!(!outcome.target.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 1\n");
    }

    #[test]
    fn split_keeps_terminators() {
        assert_eq!(
            split_keeping_newlines("a\nb\nc"),
            vec!["a\n".to_string(), "b\n".to_string(), "c".to_string()]
        );
        assert_eq!(split_keeping_newlines(""), Vec::<String>::new());
    }
}
