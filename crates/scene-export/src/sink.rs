//! Where exported bytes go, and who decides about existing files.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::FormatError;

/// Destination for encoded files.
pub trait OutputSink {
    fn exists(&self, path: &Path) -> bool;

    /// Write `bytes` to `path` as a whole; a failed write leaves no partial file.
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<(), FormatError>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<(), FormatError> {
        (**self).write(path, bytes)
    }
}

/// Filesystem sink. Each file is written to a temporary sibling and renamed
/// into place.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<(), FormatError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| FormatError::from(e.error))?;
        Ok(())
    }
}

/// Asked before an existing file is replaced.
pub trait ConfirmOverwrite {
    fn confirm_overwrite(&mut self, path: &Path) -> bool;
}

impl<F: FnMut(&Path) -> bool> ConfirmOverwrite for F {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        self(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOverwrite;

impl ConfirmOverwrite for AlwaysOverwrite {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverOverwrite;

impl ConfirmOverwrite for NeverOverwrite {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        false
    }
}

/// Overwrite policy as configured by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteMode {
    /// Prompt per file.
    #[default]
    Ask,
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_sink_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.obj");
        std::fs::write(&path, b"old").unwrap();

        let mut sink = FsSink;
        assert!(sink.exists(&path));
        sink.write(&path, b"new contents").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new contents");

        // Only the target remains; the temporary was renamed away.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn fs_sink_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.obj");
        let err = FsSink.write(&path, b"x").unwrap_err();
        assert!(matches!(err, FormatError::Io { .. }));
    }

    #[test]
    fn closures_confirm_overwrites() {
        let mut asked = Vec::new();
        let mut confirm = |p: &Path| {
            asked.push(p.to_path_buf());
            false
        };
        assert!(!confirm.confirm_overwrite(Path::new("a.glb")));
        assert!(AlwaysOverwrite.confirm_overwrite(Path::new("a.glb")));
        assert!(!NeverOverwrite.confirm_overwrite(Path::new("a.glb")));
        drop(confirm);
        assert_eq!(asked.len(), 1);
    }
}
