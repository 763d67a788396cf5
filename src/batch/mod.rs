//! Batch watermarking of an image folder.
//!
//! A run lists the supported images of one folder, watermarks each of them
//! into the output folder under its original file name and reports what
//! happened per image. Decode and encode failures are isolated to the image
//! they concern; everything else (missing folder, output folder that cannot
//! be created) aborts the run before any image is touched.
//!
//! Images run sequentially by default, or one rayon task per image. A
//! cancellation flag is checked before each image starts.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::atomic::AtomicBool;
//! use watermarker::batch::{run_batch, BatchJob};
//!
//! let job = BatchJob::new("photos", "photos/Watermarked_Images").parallel(true);
//! let report = run_batch(&processor, &job, &AtomicBool::new(false))?;
//! println!("{} written, {} failed", report.processed.len(), report.failures.len());
//! ```

use crate::config::Settings;
use crate::watermark::{WatermarkError, WatermarkProcessor};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// File name suffixes picked up by a folder scan. Matching is case-sensitive.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".bmp", ".gif"];

/// Whether a file name carries one of [`IMAGE_EXTENSIONS`].
pub fn is_supported_image(file_name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

/// List the supported images directly inside `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, WatermarkError> {
    if !dir.is_dir() {
        return Err(WatermarkError::resource(dir, "not a directory"));
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| WatermarkError::resource(dir, format!("cannot read folder: {}", e)))?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_supported_image);
        if supported {
            images.push(path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Input and output folders of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Process images on the rayon thread pool
    pub parallel: bool,
}

impl BatchJob {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            parallel: false,
        }
    }

    /// Job writing into the settings' output folder inside `input_dir`.
    pub fn from_settings(input_dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        let input_dir = input_dir.into();
        let output_dir = settings.output_dir(&input_dir);
        Self::new(input_dir, output_dir)
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// An image that could not be watermarked.
#[derive(Debug)]
pub struct ImageFailure {
    pub source: PathBuf,
    pub error: WatermarkError,
}

/// Per-image results of a run, in file name order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of images found in the input folder
    pub total: usize,
    /// Written output files
    pub processed: Vec<PathBuf>,
    pub failures: Vec<ImageFailure>,
    /// Images not started because the run was cancelled
    pub cancelled: Vec<PathBuf>,
}

impl BatchReport {
    /// Every image was written.
    pub fn is_complete(&self) -> bool {
        self.processed.len() == self.total
    }

    pub fn was_cancelled(&self) -> bool {
        !self.cancelled.is_empty()
    }
}

enum Outcome {
    Written(PathBuf),
    Failed(ImageFailure),
    Cancelled(PathBuf),
}

/// Watermark every supported image of `job.input_dir` into `job.output_dir`.
///
/// The output folder is created if missing. Raising `cancel` stops images
/// that have not started yet; images already in flight complete.
pub fn run_batch(
    processor: &WatermarkProcessor,
    job: &BatchJob,
    cancel: &AtomicBool,
) -> Result<BatchReport, WatermarkError> {
    let images = list_images(&job.input_dir)?;
    std::fs::create_dir_all(&job.output_dir)?;

    let total = images.len();
    info!(
        input_dir = %job.input_dir.display(),
        output_dir = %job.output_dir.display(),
        images = total,
        parallel = job.parallel,
        "Starting batch"
    );

    let process = |(index, source): (usize, &PathBuf)| -> Outcome {
        if cancel.load(Ordering::SeqCst) {
            return Outcome::Cancelled(source.clone());
        }

        let Some(file_name) = source.file_name() else {
            return Outcome::Failed(ImageFailure {
                source: source.clone(),
                error: WatermarkError::resource(source.as_path(), "path has no file name"),
            });
        };
        info!(
            "Processing {} ({}/{})",
            file_name.to_string_lossy(),
            index + 1,
            total
        );

        let destination = job.output_dir.join(file_name);
        match processor.process_file(source, &destination) {
            Ok(()) => Outcome::Written(destination),
            Err(error) => {
                warn!(
                    image = %source.display(),
                    error = %error,
                    "Skipping image"
                );
                Outcome::Failed(ImageFailure {
                    source: source.clone(),
                    error,
                })
            }
        }
    };

    let outcomes: Vec<Outcome> = if job.parallel {
        images.par_iter().enumerate().map(process).collect()
    } else {
        images.iter().enumerate().map(process).collect()
    };

    let mut report = BatchReport {
        total,
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Outcome::Written(path) => report.processed.push(path),
            Outcome::Failed(failure) => report.failures.push(failure),
            Outcome::Cancelled(path) => report.cancelled.push(path),
        }
    }

    info!(
        processed = report.processed.len(),
        failed = report.failures.len(),
        cancelled = report.cancelled.len(),
        output_dir = %job.output_dir.display(),
        "Batch finished"
    );

    Ok(report)
}

/// Watermark the first image of `dir` and write it to `output_path`.
///
/// Returns the source image used. A folder without supported images is a
/// resource error.
pub fn preview(
    processor: &WatermarkProcessor,
    dir: &Path,
    output_path: &Path,
) -> Result<PathBuf, WatermarkError> {
    let source = list_images(dir)?
        .into_iter()
        .next()
        .ok_or_else(|| WatermarkError::resource(dir, "no supported images in folder"))?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    processor.process_file(&source, output_path)?;
    info!(
        source = %source.display(),
        preview = %output_path.display(),
        "Preview written"
    );
    Ok(source)
}
