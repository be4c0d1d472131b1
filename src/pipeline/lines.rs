//! Connection tracing: Canny edges, then probabilistic Hough segments.
//!
//! Runs on the same grayscale page as [`crate::pipeline::shapes`] but shares
//! nothing with it; in particular the shape detector's binarised image is
//! not reused. Segments are reported as found: no merging of colinear pieces,
//! no snapping to component outlines.

use crate::config::LineParams;
use crate::model::ConnectionRecord;
use crate::pipeline::hough::{probabilistic_hough, HoughParams};
use image::GrayImage;
use imageproc::edges::canny;
use tracing::debug;

/// Detect straight wire segments on one grayscale page.
///
/// `imageproc::edges::canny` smooths with a Gaussian (sigma 1.4) before
/// taking gradients, so the two edges of a 1 px wire land about one pixel
/// further apart than an unblurred Canny would put them.
pub fn trace_connections(gray: &GrayImage, params: &LineParams) -> Vec<ConnectionRecord> {
    let edges = canny(gray, params.canny_low, params.canny_high);
    let segments = probabilistic_hough(&edges, &hough_params(params));
    debug!("{} line segments", segments.len());
    segments
}

fn hough_params(params: &LineParams) -> HoughParams {
    HoughParams {
        rho: params.rho,
        theta: params.theta,
        votes: params.votes,
        min_line_length: params.min_line_length,
        max_line_gap: params.max_line_gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn page(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([255]))
    }

    #[test]
    fn blank_page_has_no_connections() {
        assert!(trace_connections(&page(200, 200), &LineParams::default()).is_empty());
    }

    #[test]
    fn long_wire_produces_horizontal_segments() {
        let mut img = page(300, 200);
        for y in 98..103 {
            for x in 40..260 {
                img.put_pixel(x, y, Luma([0]));
            }
        }

        let segs = trace_connections(&img, &LineParams::default());
        assert!(!segs.is_empty());
        for s in &segs {
            // Edges of a horizontal bar: both endpoints near the bar's rows,
            // so only the horizontal extent can satisfy the length filter.
            assert!((90..=110).contains(&s.start.y), "{s:?}");
            assert!((90..=110).contains(&s.end.y), "{s:?}");
            assert!((s.end.x - s.start.x).abs() >= 50, "{s:?}");
        }
    }

    #[test]
    fn short_stub_is_ignored() {
        let mut img = page(200, 200);
        for y in 98..103 {
            for x in 80..110 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        assert!(trace_connections(&img, &LineParams::default()).is_empty());
    }

    #[test]
    fn parameters_are_forwarded() {
        let p = LineParams {
            votes: 7,
            min_line_length: 9,
            max_line_gap: 3,
            ..LineParams::default()
        };
        let h = hough_params(&p);
        assert_eq!(h.votes, 7);
        assert_eq!(h.min_line_length, 9);
        assert_eq!(h.max_line_gap, 3);
        assert_eq!(h.rho, 1.0);
    }
}
