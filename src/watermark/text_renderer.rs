//! Font faces and glyph rasterization.
//!
//! The layout engine only needs two things from a font: the pixel box of a
//! single character, and a way to draw that character onto an overlay. Both
//! live behind the [`FontFace`] trait so that sizing and drawing always use
//! the same metric.
//!
//! # Faces
//!
//! - [`AbGlyphFace`] - TrueType/OpenType file rasterized with `ab_glyph`
//!   (`.ttc` collections use their first face)
//! - [`FixedFace`] - fixed-size solid blocks, fully deterministic
//!
//! A [`FaceSet`] pairs a default face with a wide (CJK) face and picks one
//! per character through its script classifier.
//!
//! # Example
//!
//! ```ignore
//! use watermarker::watermark::text_renderer::FaceSet;
//!
//! let faces = FaceSet::load("arial.ttf".as_ref(), "simsun.ttc".as_ref(), 40)?;
//! let size = faces.face_for('中').glyph_size('中');
//! ```

use super::compositor::blend_pixels;
use super::font_locator::FontLocator;
use super::script::{classify_cjk, ScriptClass, ScriptClassifier};
use super::WatermarkError;
use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Pixel box a character occupies for layout purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphSize {
    pub width: u32,
    pub height: u32,
}

impl GlyphSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Capability the layout engine and compositor need from a font.
///
/// Implementations must be pure: `glyph_size` for the same character always
/// returns the same box, and `draw_glyph` only touches pixels inside that box
/// when drawn at `(x, y)`.
pub trait FontFace: Send + Sync {
    /// Width and height of `ch` when drawn with its top-left at the origin.
    fn glyph_size(&self, ch: char) -> GlyphSize;

    /// Draw `ch` with its top-left at `(x, y)` onto `overlay`.
    ///
    /// `fill` carries the color and the maximum alpha; pixels outside the
    /// overlay are clipped.
    fn draw_glyph(&self, ch: char, x: i32, y: i32, fill: Rgba<u8>, overlay: &mut RgbaImage);
}

/// Blend a single glyph pixel into the overlay, clipping at its edges.
fn plot(overlay: &mut RgbaImage, x: i32, y: i32, pixel: Rgba<u8>) {
    if x < 0 || y < 0 || x as u32 >= overlay.width() || y as u32 >= overlay.height() {
        return;
    }
    let existing = overlay.get_pixel_mut(x as u32, y as u32);
    *existing = blend_pixels(*existing, pixel);
}

/// A font file rasterized with `ab_glyph`.
///
/// The pixel size is interpreted as an em size, so a 40px face draws the
/// same glyph size as a 40 point font at 72 dpi.
pub struct AbGlyphFace {
    font: FontVec,
    scale: PxScale,
    source: PathBuf,
}

impl AbGlyphFace {
    /// Load a font file at the given pixel size.
    pub fn load(path: &Path, font_size: u32) -> Result<Self, WatermarkError> {
        let data = std::fs::read(path)
            .map_err(|e| WatermarkError::resource(path, format!("cannot read font file: {}", e)))?;

        let font = FontVec::try_from_vec_and_index(data, 0)
            .map_err(|e| WatermarkError::resource(path, format!("invalid font data: {}", e)))?;

        let scale = em_scale(&font, font_size);
        debug!(
            font = %path.display(),
            font_size,
            px_scale = scale.y,
            "Font face parsed"
        );

        Ok(Self {
            font,
            scale,
            source: path.to_path_buf(),
        })
    }

    /// Path the face was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// `PxScale` is the ascent-to-descent height; convert an em size into it.
fn em_scale(font: &FontVec, font_size: u32) -> PxScale {
    let size = font_size as f32;
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(size * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(size),
    }
}

impl FontFace for AbGlyphFace {
    /// Advance-and-ascent box, widened to any ink that spills past it.
    ///
    /// Height is `max(ascent, ink bottom)` with the baseline one ascent below
    /// the top, so short glyphs such as `-`, `'` and space still measure a
    /// full ascent. An ink-only box would make them a few pixels tall and
    /// pull the next wrapped line up.
    fn glyph_size(&self, ch: char) -> GlyphSize {
        let scaled = self.font.as_scaled(self.scale);
        let glyph_id = scaled.glyph_id(ch);
        let ascent = scaled.ascent();
        let advance = scaled.h_advance(glyph_id);

        // Ink box with the baseline placed one ascent below the origin
        let glyph = glyph_id.with_scale_and_position(self.scale, point(0.0, ascent));
        let (ink_right, ink_bottom) = match self.font.outline_glyph(glyph) {
            Some(outlined) => {
                let bounds = outlined.px_bounds();
                (bounds.max.x, bounds.max.y)
            }
            None => (0.0, 0.0),
        };

        GlyphSize::new(
            advance.max(ink_right).ceil().max(0.0) as u32,
            ascent.max(ink_bottom).ceil().max(0.0) as u32,
        )
    }

    fn draw_glyph(&self, ch: char, x: i32, y: i32, fill: Rgba<u8>, overlay: &mut RgbaImage) {
        let scaled = self.font.as_scaled(self.scale);
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id
            .with_scale_and_position(self.scale, point(x as f32, y as f32 + scaled.ascent()));

        let Some(outlined) = self.font.outline_glyph(glyph) else {
            return;
        };

        let bounds = outlined.px_bounds();
        let max_alpha = fill[3] as f32;
        outlined.draw(|px, py, coverage| {
            let alpha = (coverage.clamp(0.0, 1.0) * max_alpha).round() as u8;
            if alpha == 0 {
                return;
            }
            plot(
                overlay,
                px as i32 + bounds.min.x as i32,
                py as i32 + bounds.min.y as i32,
                Rgba([fill[0], fill[1], fill[2], alpha]),
            );
        });
    }
}

impl fmt::Debug for AbGlyphFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbGlyphFace")
            .field("source", &self.source)
            .field("scale", &self.scale)
            .finish()
    }
}

/// A face where every character is the same solid block.
///
/// Whitespace is measured but left blank. Useful wherever output must not
/// depend on installed fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFace {
    pub size: GlyphSize,
}

impl FixedFace {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: GlyphSize::new(width, height),
        }
    }
}

impl FontFace for FixedFace {
    fn glyph_size(&self, _ch: char) -> GlyphSize {
        self.size
    }

    fn draw_glyph(&self, ch: char, x: i32, y: i32, fill: Rgba<u8>, overlay: &mut RgbaImage) {
        if ch.is_whitespace() || fill[3] == 0 {
            return;
        }
        for dy in 0..self.size.height as i32 {
            for dx in 0..self.size.width as i32 {
                plot(overlay, x + dx, y + dy, fill);
            }
        }
    }
}

/// The two faces used for one rendering pass plus the rule choosing between them.
#[derive(Clone)]
pub struct FaceSet {
    default: Arc<dyn FontFace>,
    wide: Arc<dyn FontFace>,
    classifier: ScriptClassifier,
}

impl FaceSet {
    /// Pair a default face with a wide face, split by the CJK classifier.
    pub fn new(default: Arc<dyn FontFace>, wide: Arc<dyn FontFace>) -> Self {
        Self {
            default,
            wide,
            classifier: classify_cjk,
        }
    }

    /// Use one face for every script class.
    pub fn uniform(face: Arc<dyn FontFace>) -> Self {
        Self::new(face.clone(), face)
    }

    /// Replace the script classifier.
    pub fn with_classifier(mut self, classifier: ScriptClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Load both faces, looking up names that are not existing paths among
    /// the system fonts. A missing or invalid font aborts.
    pub fn load(
        default_path: &Path,
        wide_path: &Path,
        font_size: u32,
    ) -> Result<Self, WatermarkError> {
        Self::load_with(&FontLocator::system(), default_path, wide_path, font_size)
    }

    /// Same as [`FaceSet::load`] with an explicit font locator.
    pub fn load_with(
        locator: &FontLocator,
        default_path: &Path,
        wide_path: &Path,
        font_size: u32,
    ) -> Result<Self, WatermarkError> {
        let default_path = locator.locate(default_path);
        let wide_path = locator.locate(wide_path);
        let default = AbGlyphFace::load(&default_path, font_size)?;
        let wide = AbGlyphFace::load(&wide_path, font_size)?;

        info!(
            default_font = %default_path.display(),
            wide_font = %wide_path.display(),
            font_size,
            "Font faces loaded"
        );

        Ok(Self::new(Arc::new(default), Arc::new(wide)))
    }

    pub fn classify(&self, ch: char) -> ScriptClass {
        (self.classifier)(ch)
    }

    pub fn face(&self, class: ScriptClass) -> &dyn FontFace {
        match class {
            ScriptClass::Default => self.default.as_ref(),
            ScriptClass::Wide => self.wide.as_ref(),
        }
    }

    pub fn face_for(&self, ch: char) -> &dyn FontFace {
        self.face(self.classify(ch))
    }
}

impl fmt::Debug for FaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceSet").finish_non_exhaustive()
    }
}
