//! Output file lifecycle: write to a `.part` sibling, then atomically rename.
//!
//! The final path is either absent, the previous version, or complete; it is
//! never observed half-written.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Buffered writer for a `.part` file. Nothing appears at the final path until `commit`.
pub struct PartFile {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create (or truncate) `<final_path>.part` with a write buffer of `buffer_size` bytes.
    pub fn create(final_path: &Path, buffer_size: usize) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(PartFile {
            writer: BufWriter::with_capacity(buffer_size.max(1), file),
            temp_path,
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, fsync and rename onto the final path. Consumes the writer and closes the file.
    pub fn commit(self) -> Result<PathBuf> {
        let PartFile {
            writer,
            temp_path,
            final_path,
            ..
        } = self;
        let file = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("failed to flush {}", temp_path.display()))?;
        file.sync_all().context("storage sync failed")?;
        drop(file);

        std::fs::rename(&temp_path, &final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
        Ok(final_path)
    }

    /// Drop the temp file without touching the final path.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self.writer);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("could not remove {}: {}", temp_path.display(), e);
            }
        }
    }
}

impl Write for PartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Path for the temp file: appends `.part` to the final path (e.g. `a.bw` -> `a.bw.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write a whole file atomically through `fill`. On error the temp file is removed
/// and the final path is left as it was.
pub fn write_atomic<T>(
    final_path: &Path,
    fill: impl FnOnce(&mut PartFile) -> Result<T>,
) -> Result<T> {
    let mut part = PartFile::create(final_path, 64 * 1024)?;
    match fill(&mut part) {
        Ok(value) => {
            part.commit()?;
            Ok(value)
        }
        Err(e) => {
            part.discard();
            Err(e)
        }
    }
}
