//! Input staging: give pdfium a file path it can open.
//!
//! Uploaded bytes are written to `input.pdf` inside a fresh [`TempDir`] owned
//! by one request. The directory is removed when the [`StagedInput`] is
//! dropped, which happens on success, on error, and on panic alike.

use crate::error::BrdError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// File name used for staged uploads.
pub const STAGED_FILE_NAME: &str = "input.pdf";

/// A PDF ready to be opened by the renderer.
#[derive(Debug)]
pub enum StagedInput {
    /// Caller-owned file on disk; never deleted by us.
    Local(PathBuf),
    /// Bytes written into a request-scoped temp directory.
    /// The `TempDir` is kept alive until processing completes.
    Uploaded { path: PathBuf, _temp_dir: TempDir },
}

impl StagedInput {
    /// Path to the PDF file regardless of how it was staged.
    pub fn path(&self) -> &Path {
        match self {
            StagedInput::Local(p) => p,
            StagedInput::Uploaded { path, .. } => path,
        }
    }
}

/// Accept an existing local file. Only existence is checked here; content is
/// judged by pdfium.
pub fn stage_local(path: impl Into<PathBuf>) -> Result<StagedInput, BrdError> {
    let path = path.into();
    if !path.is_file() {
        return Err(BrdError::FileNotFound { path });
    }
    debug!("Using local PDF: {}", path.display());
    Ok(StagedInput::Local(path))
}

/// Write `bytes` to a new temp directory as [`STAGED_FILE_NAME`].
pub fn stage_bytes(bytes: &[u8]) -> Result<StagedInput, BrdError> {
    let temp_dir = TempDir::new().map_err(|source| BrdError::StagingFailed { source })?;
    let path = temp_dir.path().join(STAGED_FILE_NAME);

    let mut file =
        std::fs::File::create(&path).map_err(|source| BrdError::StagingFailed { source })?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|source| BrdError::StagingFailed { source })?;

    debug!("Staged {} bytes at {}", bytes.len(), path.display());
    Ok(StagedInput::Uploaded {
        path,
        _temp_dir: temp_dir,
    })
}
