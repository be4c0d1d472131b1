//! Component detection: inverted global threshold, external contours, area
//! filter, bounding rectangles.
//!
//! Dark ink on a light page becomes foreground. Only outermost borders are
//! considered, so a symbol drawn as a closed outline yields one component and
//! anything drawn inside it (pin labels, a filled dot) is not reported
//! separately.

use crate::config::ShapeParams;
use crate::model::{ComponentKind, ComponentRecord, Point, Size};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::contrast::{threshold, ThresholdType};
use tracing::debug;

/// Detect component bounding boxes on one grayscale page.
///
/// Records come out in contour traversal order.
pub fn detect_components(gray: &GrayImage, params: &ShapeParams) -> Vec<ComponentRecord> {
    let binary = threshold(gray, params.threshold, ThresholdType::BinaryInverted);
    let contours = find_contours::<i32>(&binary);

    let components: Vec<ComponentRecord> = contours
        .iter()
        .filter(|c| is_external(c))
        .filter(|c| contour_area(&c.points) > params.min_area)
        .filter_map(|c| {
            let (position, size) = bounding_rect(&c.points)?;
            Some(ComponentRecord {
                kind: classify(c),
                position,
                size,
            })
        })
        .collect();

    debug!(
        "{} contours, {} components above area {}",
        contours.len(),
        components.len(),
        params.min_area
    );
    components
}

/// Shape classification.
///
/// Every contour is a [`ComponentKind::Generic`]; outline, aspect ratio and
/// nesting are available here but deliberately not consulted.
pub fn classify(_contour: &Contour<i32>) -> ComponentKind {
    ComponentKind::Generic
}

/// Outer border of a region that is not itself inside a hole.
fn is_external(contour: &Contour<i32>) -> bool {
    contour.border_type == BorderType::Outer && contour.parent.is_none()
}

/// Polygon area enclosed by the contour's boundary points (shoelace formula).
pub fn contour_area(points: &[imageproc::point::Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
        .sum();
    twice_area.abs() as f64 / 2.0
}

/// Smallest axis-aligned rectangle containing every point, as top-left corner
/// and inclusive pixel extent.
pub fn bounding_rect(points: &[imageproc::point::Point<i32>]) -> Option<(Point, Size)> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some((
        Point::new(min_x, min_y),
        Size {
            w: max_x - min_x + 1,
            h: max_y - min_y + 1,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::point::Point as IPoint;

    const WHITE: Luma<u8> = Luma([255]);
    const BLACK: Luma<u8> = Luma([0]);

    fn page(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, WHITE)
    }

    fn fill(img: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: Luma<u8>) {
        for yy in y..y + h {
            for xx in x..x + w {
                img.put_pixel(xx, yy, value);
            }
        }
    }

    #[test]
    fn blank_page_has_no_components() {
        let found = detect_components(&page(120, 80), &ShapeParams::default());
        assert!(found.is_empty());
    }

    #[test]
    fn filled_square_yields_one_bounding_box() {
        let mut img = page(200, 200);
        fill(&mut img, 30, 50, 40, 40, BLACK);

        let found = detect_components(&img, &ShapeParams::default());
        assert_eq!(found.len(), 1);
        let c = &found[0];
        assert_eq!(c.kind, ComponentKind::Generic);
        assert_eq!(c.position, Point::new(30, 50));
        assert_eq!(c.size, Size { w: 40, h: 40 });
    }

    #[test]
    fn specks_at_or_below_min_area_are_noise() {
        let mut img = page(100, 100);
        // 5x5 block: boundary polygon encloses 4x4 = 16 units.
        fill(&mut img, 10, 10, 5, 5, BLACK);
        // 11x11 block: boundary polygon encloses exactly 10x10 = 100 units.
        fill(&mut img, 40, 40, 11, 11, BLACK);
        assert!(detect_components(&img, &ShapeParams::default()).is_empty());

        // 12x12 block: 121 units, survives.
        fill(&mut img, 70, 70, 12, 12, BLACK);
        let found = detect_components(&img, &ShapeParams::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Point::new(70, 70));
    }

    #[test]
    fn mid_gray_above_threshold_is_background() {
        let mut img = page(100, 100);
        fill(&mut img, 20, 20, 40, 40, Luma([128]));
        assert!(detect_components(&img, &ShapeParams::default()).is_empty());

        fill(&mut img, 20, 20, 40, 40, Luma([127]));
        assert_eq!(detect_components(&img, &ShapeParams::default()).len(), 1);
    }

    #[test]
    fn holes_and_nested_shapes_are_not_reported() {
        let mut img = page(200, 200);
        // Ring: 100x100 outline, 10 px thick.
        fill(&mut img, 50, 50, 100, 100, BLACK);
        fill(&mut img, 60, 60, 80, 80, WHITE);
        // Filled square sitting inside the ring's hole.
        fill(&mut img, 90, 90, 20, 20, BLACK);

        let found = detect_components(&img, &ShapeParams::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Point::new(50, 50));
        assert_eq!(found[0].size, Size { w: 100, h: 100 });
    }

    #[test]
    fn separate_shapes_are_all_reported() {
        let mut img = page(300, 100);
        fill(&mut img, 10, 10, 30, 30, BLACK);
        fill(&mut img, 100, 20, 50, 20, BLACK);
        fill(&mut img, 200, 40, 25, 25, BLACK);

        let found = detect_components(&img, &ShapeParams::default());
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|c| c.kind == ComponentKind::Generic));
        let mut xs: Vec<i32> = found.iter().map(|c| c.position.x).collect();
        xs.sort_unstable();
        assert_eq!(xs, vec![10, 100, 200]);
    }

    #[test]
    fn detection_is_deterministic() {
        let mut img = page(200, 200);
        fill(&mut img, 10, 10, 30, 60, BLACK);
        fill(&mut img, 120, 100, 50, 50, BLACK);
        let a = detect_components(&img, &ShapeParams::default());
        let b = detect_components(&img, &ShapeParams::default());
        assert_eq!(a, b);
    }

    #[test]
    fn shoelace_area_of_square_outline() {
        let pts = vec![
            IPoint::new(0, 0),
            IPoint::new(10, 0),
            IPoint::new(10, 10),
            IPoint::new(0, 10),
        ];
        assert_eq!(contour_area(&pts), 100.0);
        let reversed: Vec<_> = pts.into_iter().rev().collect();
        assert_eq!(contour_area(&reversed), 100.0);
    }

    #[test]
    fn degenerate_contours_have_no_area() {
        assert_eq!(contour_area(&[]), 0.0);
        assert_eq!(contour_area(&[IPoint::new(3, 3), IPoint::new(9, 3)]), 0.0);
    }

    #[test]
    fn bounding_rect_is_inclusive() {
        let pts = vec![IPoint::new(5, 7), IPoint::new(5, 7)];
        let (pos, size) = bounding_rect(&pts).unwrap();
        assert_eq!(pos, Point::new(5, 7));
        assert_eq!(size, Size { w: 1, h: 1 });
        assert!(bounding_rect(&[]).is_none());
    }
}
