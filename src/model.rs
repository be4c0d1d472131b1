//! Output types: the geometric records detected on each page and the
//! per-document accumulator they are folded into.
//!
//! Coordinates are raster pixels of the page they were detected on, origin
//! top-left. Pages are never offset against each other, so records from
//! different pages of one document share no coordinate frame.

use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rasterised page in single-channel grayscale.
///
/// Created by the renderer, handed to both detectors, then dropped before the
/// next page is rendered.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 0-based page index within the document.
    pub index: usize,
    pub gray: GrayImage,
}

/// Integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a bounding rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

/// Classification result for a detected shape.
///
/// There is exactly one kind: shapes are not discriminated by outline,
/// aspect ratio or topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComponentKind {
    #[default]
    #[serde(rename = "generic_component")]
    Generic,
}

impl ComponentKind {
    /// Tag written to the BRD output.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Generic => "generic_component",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A foreground region's axis-aligned bounding rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub kind: ComponentKind,
    /// Top-left corner.
    pub position: Point,
    /// Computed for every record but not part of the BRD text.
    pub size: Size,
}

/// A straight segment, endpoints as reported by the line tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub start: Point,
    pub end: Point,
}

/// Everything both detectors found on a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDetections {
    pub page_index: usize,
    pub components: Vec<ComponentRecord>,
    pub connections: Vec<ConnectionRecord>,
}

/// Components and connections of a whole document, in page order and then
/// detection order. Nothing is deduplicated or cross-referenced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchematicResult {
    pub components: Vec<ComponentRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl SchematicResult {
    /// Append one page's detections. Consumes `self` so it can drive a fold
    /// over pages.
    #[must_use]
    pub fn absorb(mut self, page: PageDetections) -> Self {
        self.components.extend(page.components);
        self.connections.extend(page.connections);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.connections.is_empty()
    }
}

/// Summary counters for one conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub pages: usize,
    pub components: usize,
    pub connections: usize,
    pub duration_ms: u64,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Serialized BRD text.
    pub brd: String,
    pub schematic: SchematicResult,
    pub stats: ConversionStats,
}
