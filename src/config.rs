//! Configuration types for schematic extraction.
//!
//! All pipeline behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The detector constants live in
//! [`ShapeParams`] and [`LineParams`]; their defaults are the fixed values the
//! BRD output has always been produced with, so changing them changes the
//! output for the same PDF.

use crate::error::BrdError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one PDF-to-BRD conversion.
///
/// # Example
/// ```rust
/// use schematic2brd::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(144)
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 144);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Rendering DPI. Range: 36–600. Default: 72.
    ///
    /// 72 DPI renders one pixel per PDF point, which is the page's native
    /// grid. Every threshold in [`ShapeParams`] and [`LineParams`] is in
    /// pixels, so raising the DPI makes small symbols pass the area filter
    /// and short wires pass the length filter.
    pub dpi: u32,

    /// Directory containing the pdfium shared library, or the library file
    /// itself. If None, the system library search path is used.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Wall-clock budget for one document in seconds. 0 disables. Default: 120.
    ///
    /// pdfium offers no way to interrupt a page mid-render, so on expiry the
    /// caller gets [`BrdError::Timeout`] immediately and the worker stops at
    /// the next page boundary.
    pub timeout_secs: u64,

    /// Component detection parameters.
    pub shapes: ShapeParams,

    /// Connection tracing parameters.
    pub lines: LineParams,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: 72,
            pdfium_lib_path: None,
            timeout_secs: 120,
            shapes: ShapeParams::default(),
            lines: LineParams::default(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Scale factor handed to pdfium (pixels per PDF point).
    pub fn render_scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(36, 600);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn shapes(mut self, params: ShapeParams) -> Self {
        self.config.shapes = params;
        self
    }

    pub fn lines(mut self, params: LineParams) -> Self {
        self.config.lines = params;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, BrdError> {
        let c = &self.config;
        if c.dpi < 36 || c.dpi > 600 {
            return Err(BrdError::InvalidConfig(format!(
                "DPI must be 36–600, got {}",
                c.dpi
            )));
        }
        if c.shapes.min_area < 0.0 {
            return Err(BrdError::InvalidConfig(format!(
                "Minimum component area must be ≥ 0, got {}",
                c.shapes.min_area
            )));
        }
        c.lines.validate()?;
        Ok(self.config)
    }
}

/// Parameters for the shape detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    /// Global binarisation threshold. Pixels at or below it become foreground.
    pub threshold: u8,
    /// Contours enclosing this area or less are treated as noise.
    pub min_area: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            threshold: 127,
            min_area: 100.0,
        }
    }
}

/// Parameters for the line tracer: Canny hysteresis thresholds followed by
/// the probabilistic Hough transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineParams {
    pub canny_low: f32,
    pub canny_high: f32,
    /// Distance resolution of the accumulator in pixels.
    pub rho: f64,
    /// Angular resolution of the accumulator in radians.
    pub theta: f64,
    /// Accumulator votes needed before a line is walked.
    pub votes: u32,
    /// Segments shorter than this (in both axes) are discarded.
    pub min_line_length: u32,
    /// Largest run of missing edge pixels bridged within one segment.
    pub max_line_gap: u32,
}

/// Smallest accepted Hough distance resolution, in pixels.
pub const MIN_RHO: f64 = 0.1;
/// Smallest accepted Hough angular resolution, in radians.
pub const MIN_THETA: f64 = 1e-4;

impl Default for LineParams {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            rho: 1.0,
            theta: std::f64::consts::PI / 180.0,
            votes: 50,
            min_line_length: 50,
            max_line_gap: 10,
        }
    }
}

impl LineParams {
    fn validate(&self) -> Result<(), BrdError> {
        if self.canny_low > self.canny_high {
            return Err(BrdError::InvalidConfig(format!(
                "Canny low threshold {} exceeds high threshold {}",
                self.canny_low, self.canny_high
            )));
        }
        // Finer bins blow up the accumulator allocation.
        if !(self.rho >= MIN_RHO)
            || !(self.theta >= MIN_THETA)
            || self.theta > std::f64::consts::PI
        {
            return Err(BrdError::InvalidConfig(format!(
                "Hough resolution out of range (rho={} must be ≥ {MIN_RHO}, theta={} must be in {MIN_THETA}..=π)",
                self.rho, self.theta
            )));
        }
        if self.votes == 0 {
            return Err(BrdError::InvalidConfig("Hough vote threshold must be ≥ 1".into()));
        }
        Ok(())
    }
}
