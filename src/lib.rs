//! # schematic2brd
//!
//! Turn a PDF schematic into a crude board description (BRD-like text) using
//! classic computer vision.
//!
//! ## What it does (and does not)
//!
//! Every page is rasterised, then two independent heuristics run on the
//! grayscale raster:
//!
//! * **Components**: inverted global threshold, outermost contours, an area
//!   filter against specks, and the bounding box of what survives. All
//!   components get the same kind tag; there is no symbol recognition.
//! * **Connections**: Canny edges and a probabilistic Hough transform. Each
//!   straight segment is one connection; segments are not merged or attached
//!   to components.
//!
//! There is no OCR and no netlist, and coordinates are per page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   stage the upload in a request-scoped temp dir
//!  ├─ 2. Render  rasterise each page via pdfium (spawn_blocking), to grayscale
//!  ├─ 3. Shapes  threshold → external contours → bounding boxes
//!  ├─ 4. Lines   Canny → probabilistic Hough segments
//!  ├─ 5. Fold    append page results in page order
//!  └─ 6. BRD     "Version 1.0" + Component/Connection lines
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schematic2brd::{convert_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = convert_file("schematic.pdf", &ConversionConfig::default()).await?;
//!     print!("{}", output.brd);
//!     eprintln!(
//!         "{} components, {} connections",
//!         output.stats.components, output.stats.connections
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## HTTP service
//!
//! [`server::app`] builds the Axum router behind `brd-server`:
//! `POST /convert` with a multipart `file` field answers
//! `{"success": true, "brd_content": "..."}`.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `brd-server` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, LineParams, ShapeParams};
pub use convert::{analyse_page, convert_bytes, convert_file, convert_file_blocking, convert_sync};
pub use error::BrdError;
pub use model::{
    ComponentKind, ComponentRecord, ConnectionRecord, ConversionOutput, ConversionStats,
    PageDetections, PageImage, Point, SchematicResult, Size,
};
pub use pipeline::brd::to_brd;
pub use pipeline::render::CancelFlag;
