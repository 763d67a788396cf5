//! Watermark compositor.
//!
//! Renders the wrapped watermark text onto a transparent overlay and blends
//! the overlay over a copy of the canvas.
//!
//! # Pipeline
//!
//! 1. [`measure`] the text against the canvas width
//! 2. [`resolve_origin`] for the style's anchor
//! 3. walk the same [`layout`] from that origin, drawing each glyph
//! 4. [`composite`] the overlay "over" the canvas
//!
//! The source canvas is never written to. Pixels the overlay leaves fully
//! transparent come out bit-identical.
//!
//! # Example
//!
//! ```ignore
//! use watermarker::watermark::{render, FaceSet, WatermarkStyle};
//!
//! let faces = FaceSet::load("arial.ttf".as_ref(), "simsun.ttc".as_ref(), 40)?;
//! let style = WatermarkStyle { text: "版权所有 Example".into(), ..Default::default() };
//! let watermarked = render(&canvas, &style, &faces);
//! ```

use super::layout::{layout, measure, Layout, LayoutBox};
use super::position::{is_visible, resolve_origin, CanvasSize, PlacementPosition};
use super::text_renderer::FaceSet;
use super::WatermarkStyle;
use image::{Rgba, RgbaImage};
use tracing::debug;

/// Where a rendering pass puts its text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPlan {
    pub block: LayoutBox,
    pub origin: PlacementPosition,
    /// Line width used for wrapping (the canvas width).
    pub max_width: u32,
}

impl RenderPlan {
    /// Size and anchor `style.text` on a canvas.
    pub fn new(canvas: CanvasSize, style: &WatermarkStyle, faces: &FaceSet) -> Self {
        let max_width = canvas.width;
        let block = measure(&style.text, faces, max_width);
        let origin = resolve_origin(&canvas, &block, style.anchor);
        Self {
            block,
            origin,
            max_width,
        }
    }

    /// The draw pass: glyph placements in canvas coordinates.
    pub fn placements<'a>(&self, text: &'a str, faces: &'a FaceSet) -> Layout<'a> {
        layout(text, faces, self.max_width, self.origin)
    }
}

/// Draw the wrapped text onto a fresh transparent overlay of the canvas size.
pub fn render_overlay(canvas: CanvasSize, style: &WatermarkStyle, faces: &FaceSet) -> RgbaImage {
    let plan = RenderPlan::new(canvas, style, faces);
    let mut overlay = RgbaImage::new(canvas.width, canvas.height);
    if plan.block.is_empty() {
        return overlay;
    }

    if !is_visible(&plan.origin, &canvas, &plan.block) {
        debug!(
            block_width = plan.block.width,
            block_height = plan.block.height,
            origin_x = plan.origin.x,
            origin_y = plan.origin.y,
            "Watermark block falls outside the canvas"
        );
        return overlay;
    }

    let fill = style.fill();
    if fill[3] == 0 {
        return overlay;
    }

    for placement in plan.placements(&style.text, faces) {
        faces.face(placement.script).draw_glyph(
            placement.ch,
            placement.x,
            placement.y,
            fill,
            &mut overlay,
        );
    }

    overlay
}

/// Render `style` onto a copy of `canvas`.
pub fn render(canvas: &RgbaImage, style: &WatermarkStyle, faces: &FaceSet) -> RgbaImage {
    let overlay = render_overlay(CanvasSize::of(canvas), style, faces);
    composite(canvas, &overlay)
}

/// Blend `overlay` over `canvas` into a new image.
///
/// Both images must have the same dimensions; only the overlapping region is
/// blended otherwise.
pub fn composite(canvas: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let mut output = canvas.clone();
    let width = canvas.width().min(overlay.width());
    let height = canvas.height().min(overlay.height());

    for y in 0..height {
        for x in 0..width {
            let fg = *overlay.get_pixel(x, y);
            if fg[3] == 0 {
                continue;
            }
            let bg = output.get_pixel_mut(x, y);
            *bg = blend_pixels(*bg, fg);
        }
    }

    output
}

/// Blend two pixels using the Porter-Duff "over" operator.
///
/// A fully transparent foreground returns the background unchanged, and a
/// fully opaque one replaces it.
pub(crate) fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    match (foreground[3], background[3]) {
        (0, _) => return background,
        (255, _) | (_, 0) => return foreground,
        _ => {}
    }

    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
