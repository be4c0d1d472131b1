//! Progressive probabilistic Hough transform over a binary edge map.
//!
//! `imageproc` only detects infinite polar lines, while connections need
//! finite segments with endpoints. This is the progressive probabilistic
//! variant (Matas, Galambos, Kittler 2000):
//!
//! 1. Edge pixels are visited in random order. Each one votes for every
//!    `(θ, ρ)` cell it lies on.
//! 2. As soon as a cell reaches `votes`, the line through the current pixel
//!    at that angle is walked in both directions, tolerating up to
//!    `max_line_gap` consecutive missing pixels.
//! 3. Pixels on the walked corridor are removed from the pool. If the
//!    corridor was long enough to be a segment, their votes are retracted too.
//!
//! The sampling order comes from a fixed-seed [`StdRng`], so the same edge
//! map always produces the same segments.

use crate::model::{ConnectionRecord, Point};
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed for the edge-point sampling order.
pub const SAMPLING_SEED: u64 = 0xffff_ffff;

/// Fixed-point precision used while stepping along a candidate line.
const SHIFT: i64 = 16;

/// Accumulator and segment constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    pub rho: f64,
    pub theta: f64,
    pub votes: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
}

/// Vote table: one row of `num_rho` cells per quantised angle.
struct Accumulator {
    trig: Vec<(f64, f64)>,
    num_rho: usize,
    cells: Vec<i32>,
}

impl Accumulator {
    fn new(width: i64, height: i64, params: &HoughParams) -> Self {
        let num_angle = ((std::f64::consts::PI / params.theta).round() as usize).max(1);
        let num_rho = ((((width + height) * 2 + 1) as f64 / params.rho).round() as usize).max(1);
        let inv_rho = 1.0 / params.rho;
        let trig = (0..num_angle)
            .map(|n| {
                let angle = n as f64 * params.theta;
                (angle.cos() * inv_rho, angle.sin() * inv_rho)
            })
            .collect();
        Self {
            trig,
            num_rho,
            cells: vec![0; num_angle * num_rho],
        }
    }

    fn cell(&self, n: usize, x: i64, y: i64) -> usize {
        let (cos, sin) = self.trig[n];
        let r = (x as f64 * cos + y as f64 * sin).round() as i64 + (self.num_rho as i64 - 1) / 2;
        n * self.num_rho + r.clamp(0, self.num_rho as i64 - 1) as usize
    }

    /// Add the point's votes; return the strongest angle and its count.
    fn vote(&mut self, x: i64, y: i64) -> (usize, i32) {
        let mut best = (0, i32::MIN);
        for n in 0..self.trig.len() {
            let idx = self.cell(n, x, y);
            self.cells[idx] += 1;
            if self.cells[idx] > best.1 {
                best = (n, self.cells[idx]);
            }
        }
        best
    }

    fn retract(&mut self, x: i64, y: i64) {
        for n in 0..self.trig.len() {
            let idx = self.cell(n, x, y);
            self.cells[idx] -= 1;
        }
    }
}

/// Fixed-point walker along the line through a seed pixel.
#[derive(Clone, Copy)]
struct Stepper {
    /// Step along x by whole pixels (`true`) or along y.
    x_major: bool,
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
}

impl Stepper {
    fn new(x: i64, y: i64, cos: f64, sin: f64) -> Self {
        // Direction of the line is perpendicular to its normal (cos, sin).
        let a = -sin;
        let b = cos;
        let one = (1i64 << SHIFT) as f64;
        if a.abs() > b.abs() {
            Self {
                x_major: true,
                x,
                y: (y << SHIFT) + (1 << (SHIFT - 1)),
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * one / a.abs()).round() as i64,
            }
        } else {
            Self {
                x_major: false,
                x: (x << SHIFT) + (1 << (SHIFT - 1)),
                y,
                dx: (a * one / b.abs()).round() as i64,
                dy: if b > 0.0 { 1 } else { -1 },
            }
        }
    }

    fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            ..self
        }
    }

    fn pixel(&self) -> (i64, i64) {
        if self.x_major {
            (self.x, self.y >> SHIFT)
        } else {
            (self.x >> SHIFT, self.y)
        }
    }

    fn advance(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }
}

/// Extract line segments from `edges` (non-zero pixels are edge points).
pub fn probabilistic_hough(edges: &GrayImage, params: &HoughParams) -> Vec<ConnectionRecord> {
    let width = i64::from(edges.width());
    let height = i64::from(edges.height());
    let index = |x: i64, y: i64| (y * width + x) as usize;

    let mut mask = vec![false; (width * height) as usize];
    let mut pool: Vec<(i64, i64)> = Vec::new();
    for (x, y, p) in edges.enumerate_pixels() {
        if p[0] != 0 {
            let (x, y) = (i64::from(x), i64::from(y));
            mask[index(x, y)] = true;
            pool.push((x, y));
        }
    }

    let mut accum = Accumulator::new(width, height, params);
    let mut rng = StdRng::seed_from_u64(SAMPLING_SEED);
    let threshold = i32::try_from(params.votes).unwrap_or(i32::MAX);
    let max_gap = i64::from(params.max_line_gap);
    let min_len = i64::from(params.min_line_length);
    let in_bounds = |(x, y): (i64, i64)| x >= 0 && x < width && y >= 0 && y < height;

    let mut segments = Vec::new();
    let mut remaining = pool.len();

    while remaining > 0 {
        let pick = rng.gen_range(0..remaining);
        let (x, y) = pool[pick];
        pool.swap(pick, remaining - 1);
        remaining -= 1;

        // Already consumed by an earlier segment.
        if !mask[index(x, y)] {
            continue;
        }

        let (best_n, best_votes) = accum.vote(x, y);
        if best_votes < threshold {
            continue;
        }

        let (cos, sin) = accum.trig[best_n];
        let forward = Stepper::new(x, y, cos, sin);
        let walkers = [forward, forward.reversed()];

        // Find how far the line extends each way.
        let mut line_end = [(x, y); 2];
        for (k, start) in walkers.iter().enumerate() {
            let mut walker = *start;
            let mut gap = 0;
            loop {
                let px = walker.pixel();
                if !in_bounds(px) {
                    break;
                }
                if mask[index(px.0, px.1)] {
                    gap = 0;
                    line_end[k] = px;
                } else {
                    gap += 1;
                    if gap > max_gap {
                        break;
                    }
                }
                walker.advance();
            }
        }

        let good_line = (line_end[1].0 - line_end[0].0).abs() >= min_len
            || (line_end[1].1 - line_end[0].1).abs() >= min_len;

        // Consume the corridor up to each end.
        for (k, start) in walkers.iter().enumerate() {
            let mut walker = *start;
            loop {
                let px = walker.pixel();
                let at = index(px.0, px.1);
                if mask[at] {
                    if good_line {
                        accum.retract(px.0, px.1);
                    }
                    mask[at] = false;
                }
                if px == line_end[k] {
                    break;
                }
                walker.advance();
            }
        }

        if good_line {
            segments.push(ConnectionRecord {
                start: to_point(line_end[0]),
                end: to_point(line_end[1]),
            });
        }
    }

    segments
}

fn to_point((x, y): (i64, i64)) -> Point {
    // Coordinates come from a u32-sized image, well inside i32 for any page
    // pdfium can render.
    Point::new(x as i32, y as i32)
}
