//! Pipeline stages for PDF-to-BRD extraction.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on synthetic rasters without pdfium.
//!
//! ## Data Flow
//!
//! ```text
//!                       ┌──▶ shapes ──┐
//! input ──▶ render ─────┤             ├──▶ (fold) ──▶ brd
//! (temp)    (pdfium)    └──▶ lines ───┘
//! ```
//!
//! 1. [`input`]: stage the PDF as a file pdfium can open; cleaned up on drop
//! 2. [`render`]: rasterise each page and convert it to grayscale
//! 3. [`shapes`]: threshold + external contours → component records
//! 4. [`lines`]: Canny + [`hough`] → connection records
//! 5. [`brd`]: render the accumulated records as BRD text
//!
//! The fold over pages lives in [`crate::convert`].

pub mod brd;
pub mod hough;
pub mod input;
pub mod lines;
pub mod render;
pub mod shapes;
