//! Watermark module for burning text watermarks into images.
//!
//! The text may mix Latin and CJK characters; each character is measured
//! and drawn with the face selected by its script class. Rendering happens
//! in two passes over one shared wrap iterator:
//!
//! 1. **Measure** the wrapped text against the canvas width ([`measure`])
//! 2. **Place** the block with an anchor ([`resolve_origin`]), walk the same
//!    layout from that origin, draw onto a transparent overlay and blend it
//!    over a copy of the canvas ([`render`])
//!
//! # Features
//!
//! - **Mixed-script wrapping**: greedy, per-character, two font faces
//! - **5 anchor modes**: four corners (10px inset) and center
//! - **Opacity**: 0-100 percent, mapped to an 8-bit alpha
//! - **Non-destructive**: the source canvas is never modified
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use image::{Rgba, RgbaImage};
//! use watermarker::watermark::{render, AnchorMode, FaceSet, FixedFace, WatermarkStyle};
//!
//! let faces = FaceSet::new(Arc::new(FixedFace::new(10, 12)), Arc::new(FixedFace::new(20, 24)));
//! let style = WatermarkStyle {
//!     text: "水印 AB".to_string(),
//!     anchor: AnchorMode::BottomRight,
//!     ..Default::default()
//! };
//!
//! let canvas = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));
//! let watermarked = render(&canvas, &style, &faces);
//! assert_eq!(watermarked.dimensions(), canvas.dimensions());
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod font_locator;
pub mod layout;
pub mod position;
pub mod processor;
pub mod script;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{composite, render, render_overlay, RenderPlan};
pub use config::{
    opacity_to_alpha, parse_hex_color, AnchorMode, Color, WatermarkStyle, MAX_OPACITY,
};
pub use error::WatermarkError;
pub use font_locator::FontLocator;
pub use layout::{layout, measure, GlyphPlacement, Layout, LayoutBox};
pub use position::{is_visible, resolve_origin, CanvasSize, PlacementPosition, EDGE_INSET};
pub use processor::WatermarkProcessor;
pub use script::{classify_cjk, ScriptClass, ScriptClassifier, CJK_UNIFIED_IDEOGRAPHS};
pub use text_renderer::{AbGlyphFace, FaceSet, FixedFace, FontFace, GlyphSize};
