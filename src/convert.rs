//! Conversion entry points: PDF in, BRD text out.
//!
//! The document-level result is a fold over pages. Each page is rendered,
//! analysed by both detectors, absorbed into a [`SchematicResult`] that
//! belongs to this call alone, and dropped. Nothing is shared between
//! conversions, so concurrent requests need no locking.

use crate::config::ConversionConfig;
use crate::error::BrdError;
use crate::model::{ConversionOutput, ConversionStats, PageDetections, SchematicResult};
use crate::pipeline::render::{self, CancelFlag};
use crate::pipeline::{brd, input, lines, shapes};
use image::GrayImage;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Run both detectors on one grayscale page.
///
/// The shape detector and the line tracer read the same buffer
/// independently.
pub fn analyse_page(page_index: usize, gray: &GrayImage, config: &ConversionConfig) -> PageDetections {
    let components = shapes::detect_components(gray, &config.shapes);
    let connections = lines::trace_connections(gray, &config.lines);
    debug!(
        "Page {}: {} components, {} connections",
        page_index + 1,
        components.len(),
        connections.len()
    );
    PageDetections {
        page_index,
        components,
        connections,
    }
}

/// Convert the PDF at `pdf_path`, blocking the current thread.
///
/// # Errors
/// Returns the first failure unmodified: binding, open, render, unsupported
/// pixel layout, or [`BrdError::Cancelled`] once `cancel` is set.
pub fn convert_file_blocking(
    pdf_path: &Path,
    config: &ConversionConfig,
    cancel: &CancelFlag,
) -> Result<ConversionOutput, BrdError> {
    let start = Instant::now();

    let (schematic, pages) = render::fold_pages(
        pdf_path,
        config,
        cancel,
        SchematicResult::default(),
        |acc, page| Ok(acc.absorb(analyse_page(page.index, &page.gray, config))),
    )?;

    let brd = brd::to_brd(&schematic);
    let stats = ConversionStats {
        pages,
        components: schematic.components.len(),
        connections: schematic.connections.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Extracted {} components and {} connections from {} pages in {}ms",
        stats.components, stats.connections, stats.pages, stats.duration_ms
    );

    Ok(ConversionOutput {
        brd,
        schematic,
        stats,
    })
}

/// Convert a PDF file on disk.
///
/// Rendering runs on tokio's blocking pool. See [`convert_bytes`] for the
/// timeout behaviour.
pub async fn convert_file(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, BrdError> {
    let staged = input::stage_local(pdf_path.as_ref())?;
    run_staged(staged, config).await
}

/// Convert PDF bytes held in memory.
///
/// The bytes are written to a request-scoped temporary directory which is
/// removed once processing ends, whether it succeeded or not.
///
/// If `config.timeout_secs` elapses first, [`BrdError::Timeout`] is returned
/// right away and the worker stops before its next page.
///
/// # Example
/// ```rust,no_run
/// use schematic2brd::{convert_bytes, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("schematic.pdf")?;
/// let output = convert_bytes(&bytes, &ConversionConfig::default()).await?;
/// print!("{}", output.brd);
/// # Ok(())
/// # }
/// ```
pub async fn convert_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, BrdError> {
    let staged = input::stage_bytes(bytes)?;
    run_staged(staged, config).await
}

/// Synchronous wrapper around [`convert_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, BrdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BrdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_file(pdf_path, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn run_staged(
    staged: input::StagedInput,
    config: &ConversionConfig,
) -> Result<ConversionOutput, BrdError> {
    let worker_config = config.clone();

    // The staged input moves into the worker so its temp directory lives
    // exactly as long as pdfium may be reading from it.
    run_with_budget(config.timeout_secs, move |cancel| {
        let result = convert_file_blocking(staged.path(), &worker_config, cancel);
        drop(staged);
        result
    })
    .await
}

/// Run `job` on the blocking pool, giving up after `timeout_secs` (0 waits
/// forever). On expiry the job's [`CancelFlag`] is set and
/// [`BrdError::Timeout`] is returned without waiting for the job to stop.
async fn run_with_budget<F>(timeout_secs: u64, job: F) -> Result<ConversionOutput, BrdError>
where
    F: FnOnce(&CancelFlag) -> Result<ConversionOutput, BrdError> + Send + 'static,
{
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();
    let task = tokio::task::spawn_blocking(move || job(&worker_cancel));

    let joined = if timeout_secs == 0 {
        task.await
    } else {
        match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("Conversion exceeded {}s, cancelling worker", timeout_secs);
                cancel.cancel();
                return Err(BrdError::Timeout { secs: timeout_secs });
            }
        }
    };

    joined.map_err(|e| BrdError::Internal(format!("Conversion task panicked: {}", e)))?
}
