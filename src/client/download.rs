//! Scoped download handle for saving conversion artifacts.
//!
//! Acquisition/release pair: the handle owns a temporary file in the target
//! directory; [`DownloadHandle::commit`] writes the bytes and atomically
//! renames them to the final name, and dropping an uncommitted handle removes
//! the temporary file. Either way the transient resource is released.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A transient file handle in the directory an artifact will be saved to.
pub struct DownloadHandle {
    file: NamedTempFile,
    dir: PathBuf,
}

impl DownloadHandle {
    /// Acquire a temporary file inside `dir`.
    pub fn create_in(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let file = NamedTempFile::new_in(&dir)?;
        Ok(Self { file, dir })
    }

    /// Write `bytes` and move the file to its final name. Consumes the
    /// handle; on any error the temporary file is still cleaned up on drop.
    pub fn commit(mut self, bytes: &[u8], filename: &str) -> std::io::Result<PathBuf> {
        self.file.write_all(bytes)?;
        self.file.flush()?;

        let target = self.dir.join(filename);
        self.file.persist(&target).map_err(|err| err.error)?;
        Ok(target)
    }
}
