//! Error types for the schematic2brd library.
//!
//! Everything that can go wrong once a PDF has been accepted for processing is
//! a [`BrdError`]. There is no partial success: a schematic with one
//! unreadable page produces no BRD text at all, so every variant is fatal for
//! the request that hit it.
//!
//! Request validation (missing upload, wrong extension) happens before any of
//! this code runs and lives with the HTTP boundary in
//! [`crate::server::ApiError`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the schematic2brd pipeline.
#[derive(Debug, Error)]
pub enum BrdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The upload could not be written to request-scoped temporary storage.
    #[error("Failed to stage uploaded PDF: {source}")]
    StagingFailed {
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF is encrypted; schematics are never opened with a password.
    #[error("PDF '{path}' is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The rendered page buffer is neither 3-channel nor 4-channel.
    #[error("Page {page} has an unsupported pixel layout ({channels} channels); expected 3 or 4")]
    UnsupportedChannels { page: usize, channels: u8 },

    // ── Execution errors ──────────────────────────────────────────────────
    /// The conversion did not finish within the configured budget.
    #[error("Conversion timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The conversion was cancelled between two pages.
    #[error("Conversion cancelled after {pages_done} page(s)")]
    Cancelled { pages_done: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH to a directory containing libpdfium (or the library file itself)."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_channels_display() {
        let e = BrdError::UnsupportedChannels {
            page: 2,
            channels: 1,
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Page 2 "), "got: {msg}");
        assert!(msg.contains("1 channels"), "got: {msg}");
    }

    #[test]
    fn timeout_display() {
        let e = BrdError::Timeout { secs: 30 };
        assert_eq!(e.to_string(), "Conversion timed out after 30s");
    }

    #[test]
    fn staging_failed_keeps_source() {
        use std::error::Error as _;
        let e = BrdError::StagingFailed {
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.to_string().contains("disk full"));
        assert!(e.source().is_some());
    }

    #[test]
    fn binding_failure_mentions_env_var() {
        let e = BrdError::PdfiumBindingFailed("not found".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
