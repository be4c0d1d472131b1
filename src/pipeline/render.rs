//! PDF rasterisation: render every page to a grayscale `GrayImage` via pdfium.
//!
//! ## Why a fold?
//!
//! A page raster is only needed until both detectors have looked at it.
//! [`fold_pages`] renders one page, hands it to the caller's closure together
//! with the running accumulator, and drops the raster before rendering the
//! next page. Peak memory is one page, and the accumulator is owned by the
//! caller instead of living in shared state.
//!
//! Everything here is blocking; async callers go through
//! `tokio::task::spawn_blocking` (see [`crate::convert`]) because pdfium is
//! not async-safe.

use crate::config::ConversionConfig;
use crate::error::BrdError;
use crate::model::PageImage;
use image::{DynamicImage, GrayImage, Luma};
use pdfium_render::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Cooperative cancellation shared between a request and its render worker.
///
/// Checked before each page is rendered.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Render each page of `pdf_path` in order and fold it into `init` with `f`.
///
/// # Returns
/// The final accumulator and the number of pages in the document.
///
/// # Errors
/// Binding, open and render failures are returned unmodified; nothing is
/// retried and no page is skipped.
pub fn fold_pages<B, F>(
    pdf_path: &Path,
    config: &ConversionConfig,
    cancel: &CancelFlag,
    init: B,
    mut f: F,
) -> Result<(B, usize), BrdError>
where
    F: FnMut(B, PageImage) -> Result<B, BrdError>,
{
    let pdfium = bind_pdfium(config.pdfium_lib_path.as_deref())?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| classify_open_error(pdf_path, &e))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let render_config = PdfRenderConfig::new().scale_page_by_factor(config.render_scale());

    let mut acc = init;
    for (idx, page) in pages.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(BrdError::Cancelled { pages_done: idx });
        }

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            BrdError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let gray = to_grayscale(&bitmap.as_image(), idx + 1)?;
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            gray.width(),
            gray.height()
        );

        acc = f(acc, PageImage { index: idx, gray })?;
    }

    Ok((acc, total_pages))
}

/// Collapse a decoded page to one intensity channel.
///
/// Only 3-channel (RGB) and 4-channel (RGBA, alpha ignored) buffers are
/// accepted; anything else is refused rather than guessed at.
///
/// Uses BT.601 weights, not the Rec. 709 ones behind
/// `DynamicImage::to_luma8`, so coloured ink falls on the same side of the
/// shape threshold as with the common RGB-to-gray conversion.
pub fn to_grayscale(image: &DynamicImage, page: usize) -> Result<GrayImage, BrdError> {
    match image.color().channel_count() {
        3 | 4 => {
            let rgb = image.to_rgb8();
            Ok(GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                Luma([bt601_luma(r, g, b)])
            }))
        }
        channels => Err(BrdError::UnsupportedChannels { page, channels }),
    }
}

/// Fixed-point BT.601 luma with 14 fractional bits; weights sum to 1 << 14.
fn bt601_luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    let y = (u32::from(r) * R + u32::from(g) * G + u32::from(b) * B + (1 << 13)) >> 14;
    y as u8
}

/// Bind pdfium from an explicit location or the system search path.
///
/// `lib_path` may name the library file or the directory holding it.
fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, BrdError> {
    let bindings = match lib_path {
        Some(dir) if dir.is_dir() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        }
        Some(file) => Pdfium::bind_to_library(file),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| BrdError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

fn classify_open_error(pdf_path: &Path, e: &PdfiumError) -> BrdError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        BrdError::PasswordRequired {
            path: pdf_path.to_path_buf(),
        }
    } else {
        BrdError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: err_str,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn rgb_white_becomes_full_intensity() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([255, 255, 255])));
        let gray = to_grayscale(&img, 1).unwrap();
        assert_eq!(gray.dimensions(), (4, 3));
        assert!(gray.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn rgba_black_becomes_zero_regardless_of_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 17])));
        let gray = to_grayscale(&img, 1).unwrap();
        assert!(gray.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn bt601_weights_are_used() {
        assert_eq!(bt601_luma(255, 0, 0), 76);
        assert_eq!(bt601_luma(0, 255, 0), 150);
        assert_eq!(bt601_luma(0, 0, 255), 29);
        assert_eq!(bt601_luma(255, 255, 255), 255);
    }

    #[test]
    fn mid_green_ink_counts_as_foreground() {
        use crate::config::ShapeParams;
        use crate::pipeline::shapes::detect_components;

        let mut img = RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]));
        for y in 40..80 {
            for x in 30..70 {
                img.put_pixel(x, y, Rgb([0, 190, 0]));
            }
        }
        let gray = to_grayscale(&DynamicImage::ImageRgb8(img), 1).unwrap();

        assert_eq!(gray.get_pixel(50, 60)[0], 112);
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
        let found = detect_components(&gray, &ShapeParams::default());
        assert_eq!(found.len(), 1, "{found:?}");
        assert_eq!((found[0].position.x, found[0].position.y), (30, 40));
    }

    #[test]
    fn rgba_green_ignores_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 190, 0, 0])));
        let gray = to_grayscale(&img, 1).unwrap();
        assert!(gray.pixels().all(|p| p[0] == 112));
    }

    #[test]
    fn single_channel_is_rejected() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        let err = to_grayscale(&img, 3).unwrap_err();
        assert!(matches!(
            err,
            BrdError::UnsupportedChannels {
                page: 3,
                channels: 1
            }
        ));
    }

    #[test]
    fn two_channel_is_rejected() {
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(1, 1, LumaA([9, 255])));
        assert!(matches!(
            to_grayscale(&img, 1),
            Err(BrdError::UnsupportedChannels { channels: 2, .. })
        ));
    }

    #[test]
    fn cancel_flag_is_shared_between_clones() {
        let flag = CancelFlag::new();
        let worker = flag.clone();
        assert!(!worker.is_cancelled());
        flag.cancel();
        assert!(worker.is_cancelled());
    }

    #[test]
    fn password_errors_are_classified() {
        let path = Path::new("/tmp/locked.pdf");
        let e = PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError);
        assert!(matches!(
            classify_open_error(path, &e),
            BrdError::PasswordRequired { .. }
        ));

        let e = PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::FormatError);
        assert!(matches!(
            classify_open_error(path, &e),
            BrdError::CorruptPdf { .. }
        ));
    }
}
