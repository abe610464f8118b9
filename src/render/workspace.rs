//! Scratch-directory lifecycle and the filesystem/naming capabilities it relies on.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::OutputFormat;
use crate::foundation::error::{LaminateError, LaminateResult};

/// Filesystem operations the renderer performs.
pub trait FileSystem: Send + Sync {
    fn create_dir_all(&self, path: &Path) -> LaminateResult<()>;
    fn remove_dir_all(&self, path: &Path) -> LaminateResult<()>;
    /// Remove `path` only if it is an empty directory.
    fn remove_empty_dir(&self, path: &Path) -> LaminateResult<()>;
    /// Move a file, replacing `to` if it exists.
    fn move_file(&self, from: &Path, to: &Path) -> LaminateResult<()>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn create_dir_all(&self, path: &Path) -> LaminateResult<()> {
        std::fs::create_dir_all(path).map_err(|e| {
            LaminateError::io(
                format!("failed to create directory '{}'", path.display()),
                e,
            )
        })
    }

    fn remove_dir_all(&self, path: &Path) -> LaminateResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| {
            LaminateError::io(
                format!("failed to remove directory '{}'", path.display()),
                e,
            )
        })
    }

    fn remove_empty_dir(&self, path: &Path) -> LaminateResult<()> {
        std::fs::remove_dir(path).map_err(|e| {
            LaminateError::io(
                format!("failed to remove directory '{}'", path.display()),
                e,
            )
        })
    }

    fn move_file(&self, from: &Path, to: &Path) -> LaminateResult<()> {
        if std::fs::rename(from, to).is_ok() {
            return Ok(());
        }
        // Renames fail across filesystems; fall back to copy + remove.
        std::fs::copy(from, to).map_err(|e| {
            LaminateError::io(
                format!(
                    "failed to move '{}' to '{}'",
                    from.display(),
                    to.display()
                ),
                e,
            )
        })?;
        std::fs::remove_file(from).map_err(|e| {
            LaminateError::io(format!("failed to remove '{}'", from.display()), e)
        })
    }
}

/// Source of unique file and directory names.
pub trait NameGenerator: Send + Sync {
    fn next_name(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidNames;

impl NameGenerator for UuidNames {
    fn next_name(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// `prefix-0`, `prefix-1`, ... in call order.
#[derive(Debug)]
pub struct SequentialNames {
    prefix: String,
    next: AtomicU64,
}

impl SequentialNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl NameGenerator for SequentialNames {
    fn next_name(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

/// A directory owned by one render chain, removed when the chain's output has been consumed.
///
/// Call [`ScratchDir::close`] to remove it and observe failures. A guard dropped without being
/// closed still removes its directory, logging instead of reporting any failure.
pub struct ScratchDir {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    closed: bool,
}

impl ScratchDir {
    /// Create `root/name`.
    pub fn create(fs: Arc<dyn FileSystem>, root: &Path, name: &str) -> LaminateResult<Self> {
        let path = root.join(name);
        fs.create_dir_all(&path)?;
        tracing::trace!(path = %path.display(), "created scratch directory");
        Ok(Self {
            fs,
            path,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path for a file named `stem` in this directory.
    pub fn file(&self, stem: &str, format: OutputFormat) -> PathBuf {
        self.path.join(format!("{stem}.{}", format.extension()))
    }

    /// Remove the directory and everything in it.
    pub fn close(mut self) -> LaminateResult<()> {
        self.closed = true;
        self.fs.remove_dir_all(&self.path)?;
        tracing::trace!(path = %self.path.display(), "removed scratch directory");
        Ok(())
    }

    /// Close while unwinding from `err`, attaching any cleanup failure to it.
    pub fn close_after(self, err: LaminateError) -> LaminateError {
        match self.close() {
            Ok(()) => err,
            Err(cleanup) => err.with_cleanup(vec![cleanup]),
        }
    }
}

impl fmt::Debug for ScratchDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchDir")
            .field("path", &self.path)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.fs.remove_dir_all(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove scratch directory"
            );
        }
    }
}

/// Close every directory, collecting failures instead of stopping at the first.
pub fn close_all(dirs: impl IntoIterator<Item = ScratchDir>) -> Vec<LaminateError> {
    dirs.into_iter().filter_map(|d| d.close().err()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/workspace.rs"]
mod tests;
