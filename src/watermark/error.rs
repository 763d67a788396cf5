//! Watermark error types.
//!
//! Defines errors that can occur while configuring, loading resources for,
//! or applying text watermarks. Layout itself never fails.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during watermark processing.
#[derive(Debug, Error)]
pub enum WatermarkError {
    /// Invalid style or settings (non-numeric size, opacity out of range, ...)
    #[error("Watermark configuration error: {0}")]
    ConfigError(String),

    /// A font or input folder could not be loaded
    #[error("Failed to load {}: {message}", path.display())]
    ResourceError { path: PathBuf, message: String },

    /// A source image could not be opened or decoded
    #[error("Failed to decode image {}: {source}", path.display())]
    DecodeError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A watermarked image could not be written
    #[error("Failed to encode image {}: {source}", path.display())]
    EncodeError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WatermarkError {
    pub(crate) fn resource(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ResourceError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error only concerns a single image of a batch.
    ///
    /// Decode and encode failures are isolated per image; everything else
    /// aborts the run.
    pub fn is_per_image(&self) -> bool {
        matches!(self, Self::DecodeError { .. } | Self::EncodeError { .. })
    }
}
