//! Watermark processor for applying one style to many images.
//!
//! A [`WatermarkProcessor`] owns the resolved style and the loaded faces.
//! Fonts are parsed once and shared by every image of a run, including
//! across rayon worker threads.
//!
//! # Example
//!
//! ```ignore
//! use watermarker::config::Settings;
//! use watermarker::watermark::WatermarkProcessor;
//!
//! let processor = WatermarkProcessor::from_settings(&Settings::default())?;
//! processor.process_file("in/photo.jpg".as_ref(), "out/photo.jpg".as_ref())?;
//! ```

use super::compositor::render;
use super::text_renderer::FaceSet;
use super::{WatermarkError, WatermarkStyle};
use crate::config::Settings;
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Applies a fixed watermark style to images.
#[derive(Debug, Clone)]
pub struct WatermarkProcessor {
    style: WatermarkStyle,
    faces: FaceSet,
}

impl WatermarkProcessor {
    /// Create a processor from an already validated style and loaded faces.
    pub fn new(style: WatermarkStyle, faces: FaceSet) -> Result<Self, WatermarkError> {
        style.validate()?;
        Ok(Self { style, faces })
    }

    /// Validate `settings` and load both configured fonts.
    pub fn from_settings(settings: &Settings) -> Result<Self, WatermarkError> {
        let style = settings.to_style()?;
        let faces = FaceSet::load(&settings.fonts.default, &settings.fonts.wide, style.font_size)?;
        Self::new(style, faces)
    }

    pub fn style(&self) -> &WatermarkStyle {
        &self.style
    }

    pub fn faces(&self) -> &FaceSet {
        &self.faces
    }

    /// Watermark an in-memory image. The input is left untouched.
    pub fn apply(&self, image: &DynamicImage) -> RgbaImage {
        let canvas = image.to_rgba8();
        render(&canvas, &self.style, &self.faces)
    }

    /// Decode `src`, watermark it and write the result to `dst`.
    ///
    /// The output is saved as RGB in the format implied by `dst`'s extension.
    pub fn process_file(&self, src: &Path, dst: &Path) -> Result<(), WatermarkError> {
        let image = image::open(src).map_err(|source| WatermarkError::DecodeError {
            path: src.to_path_buf(),
            source,
        })?;

        let (width, height) = image.dimensions();
        debug!(
            source = %src.display(),
            width,
            height,
            "Image decoded"
        );

        let watermarked = DynamicImage::ImageRgba8(self.apply(&image)).to_rgb8();
        watermarked
            .save(dst)
            .map_err(|source| WatermarkError::EncodeError {
                path: dst.to_path_buf(),
                source,
            })?;

        debug!(destination = %dst.display(), "Watermarked image written");
        Ok(())
    }
}
