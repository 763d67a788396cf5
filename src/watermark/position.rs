//! Anchor resolution for watermark placement.
//!
//! Maps a canvas size, the measured watermark block and an [`AnchorMode`] to
//! the block's top-left pixel.
//!
//! # Anchor Modes
//!
//! - **Corners**: TopLeft, TopRight, BottomLeft, BottomRight, inset by
//!   [`EDGE_INSET`] pixels from both edges
//! - **Center**: centered on both axes, floor division
//!
//! No clamping is applied: a block larger than the canvas gets a negative
//! origin and is clipped when drawn.
//!
//! # Example
//!
//! ```
//! use watermarker::watermark::{resolve_origin, AnchorMode, CanvasSize, LayoutBox, PlacementPosition};
//!
//! let canvas = CanvasSize { width: 800, height: 600 };
//! let block = LayoutBox { width: 100, height: 50 };
//!
//! let origin = resolve_origin(&canvas, &block, AnchorMode::BottomRight);
//! assert_eq!(origin, PlacementPosition::new(690, 540)); // 800 - 100 - 10, 600 - 50 - 10
//! ```

use super::layout::LayoutBox;
use super::AnchorMode;
use image::RgbaImage;

/// Distance between a corner-anchored block and the canvas edges.
pub const EDGE_INSET: i64 = 10;

/// Dimensions of the target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &RgbaImage) -> Self {
        Self::new(image.width(), image.height())
    }
}

/// Top-left pixel of the watermark block. May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

fn to_coord(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Calculate the origin of the watermark block.
///
/// # Arguments
///
/// * `canvas` - Dimensions of the target image
/// * `block` - Measured size of the wrapped watermark text
/// * `anchor` - Configured anchor mode
///
/// # Returns
///
/// The (x, y) coordinates of the block's top-left corner.
/// Coordinates may be negative if the block is larger than the canvas.
pub fn resolve_origin(
    canvas: &CanvasSize,
    block: &LayoutBox,
    anchor: AnchorMode,
) -> PlacementPosition {
    let canvas_w = i64::from(canvas.width);
    let canvas_h = i64::from(canvas.height);
    let block_w = i64::from(block.width);
    let block_h = i64::from(block.height);

    let left = EDGE_INSET;
    let top = EDGE_INSET;
    let right = canvas_w - block_w - EDGE_INSET;
    let bottom = canvas_h - block_h - EDGE_INSET;

    let (x, y) = match anchor {
        AnchorMode::TopLeft => (left, top),
        AnchorMode::TopRight => (right, top),
        AnchorMode::BottomLeft => (left, bottom),
        AnchorMode::BottomRight => (right, bottom),
        AnchorMode::Center => (
            (canvas_w - block_w).div_euclid(2),
            (canvas_h - block_h).div_euclid(2),
        ),
    };

    PlacementPosition::new(to_coord(x), to_coord(y))
}

/// Check if a block at `pos` is at least partially visible on the canvas.
pub fn is_visible(pos: &PlacementPosition, canvas: &CanvasSize, block: &LayoutBox) -> bool {
    let right = i64::from(pos.x) + i64::from(block.width);
    let bottom = i64::from(pos.y) + i64::from(block.height);

    i64::from(pos.x) < i64::from(canvas.width)
        && i64::from(pos.y) < i64::from(canvas.height)
        && right > 0
        && bottom > 0
}
