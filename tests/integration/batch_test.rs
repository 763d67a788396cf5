// Integration tests for folder runs and previews

use super::test_harness::{processor, write_image, BACKGROUND};
use image::Rgb;
use std::sync::atomic::AtomicBool;
use watermarker::batch::{list_images, preview, run_batch, BatchJob};
use watermarker::config::Settings;
use watermarker::watermark::{AnchorMode, Color, WatermarkError, WatermarkStyle};

fn red_top_left() -> WatermarkStyle {
    WatermarkStyle {
        text: "AB".to_string(),
        color: Color::new(255, 0, 0),
        anchor: AnchorMode::TopLeft,
        ..Default::default()
    }
}

#[test]
fn test_full_run_into_default_output_folder() {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "cat.png", 80, 60);
    write_image(dir.path(), "dog.bmp", 80, 60);
    write_image(dir.path(), "owl.jpeg", 80, 60);
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    std::fs::write(dir.path().join("SHOUT.JPG"), "skipped by suffix").unwrap();

    let settings = Settings::default();
    let job = BatchJob::from_settings(dir.path(), &settings);
    let report = run_batch(&processor(red_top_left()), &job, &AtomicBool::new(false)).unwrap();

    let output = dir.path().join("Watermarked_Images");
    assert!(output.is_dir());
    assert_eq!(report.total, 3);
    assert!(report.is_complete());
    for name in ["cat.png", "dog.bmp", "owl.jpeg"] {
        assert!(output.join(name).exists(), "{} missing", name);
    }
    assert!(!output.join("notes.txt").exists());

    let cat = image::open(output.join("cat.png")).unwrap().to_rgb8();
    assert_eq!(cat.dimensions(), (80, 60));
    assert_eq!(*cat.get_pixel(12, 12), Rgb([255, 0, 0]));
    assert_eq!(*cat.get_pixel(70, 50), BACKGROUND);

    // A second run over the same folder ignores the output folder
    let again = run_batch(&processor(red_top_left()), &job, &AtomicBool::new(false)).unwrap();
    assert_eq!(again.total, 3);
}

#[test]
fn test_parallel_run_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..8 {
        write_image(dir.path(), &format!("img_{}.png", i), 50 + i, 40);
    }

    let sequential = BatchJob::new(dir.path(), dir.path().join("seq"));
    let parallel = BatchJob::new(dir.path(), dir.path().join("par")).parallel(true);
    let processor = processor(red_top_left());
    let cancel = AtomicBool::new(false);

    let seq_report = run_batch(&processor, &sequential, &cancel).unwrap();
    let par_report = run_batch(&processor, &parallel, &cancel).unwrap();
    assert_eq!(seq_report.processed.len(), 8);
    assert_eq!(par_report.processed.len(), 8);

    for (a, b) in seq_report.processed.iter().zip(&par_report.processed) {
        assert_eq!(a.file_name(), b.file_name());
        let a = image::open(a).unwrap().to_rgb8();
        let b = image::open(b).unwrap().to_rgb8();
        assert_eq!(a, b);
    }
}

#[test]
fn test_corrupt_image_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "a.png", 40, 40);
    std::fs::write(dir.path().join("b.gif"), b"GIF89a truncated").unwrap();
    write_image(dir.path(), "c.png", 40, 40);

    let job = BatchJob::new(dir.path(), dir.path().join("out"));
    let report = run_batch(&processor(red_top_left()), &job, &AtomicBool::new(false)).unwrap();

    assert_eq!(report.processed.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        WatermarkError::DecodeError { .. }
    ));
    assert!(dir.path().join("out").join("c.png").exists());
}

#[test]
fn test_missing_input_folder_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let job = BatchJob::new(dir.path().join("nope"), dir.path().join("out"));
    let err = run_batch(&processor(red_top_left()), &job, &AtomicBool::new(false)).unwrap_err();
    assert!(matches!(err, WatermarkError::ResourceError { .. }));
    assert!(!err.is_per_image());
}

#[test]
fn test_list_images_is_not_recursive() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    write_image(&dir.path().join("sub"), "hidden.png", 10, 10);
    write_image(dir.path(), "top.png", 10, 10);

    let images = list_images(dir.path()).unwrap();
    assert_eq!(images, vec![dir.path().join("top.png")]);
}

#[test]
fn test_preview_writes_single_file() {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "z.jpg", 64, 64);
    write_image(dir.path(), "m.png", 64, 64);

    let target = dir.path().join("preview.png");
    let source = preview(&processor(red_top_left()), dir.path(), &target).unwrap();

    assert_eq!(source, dir.path().join("m.png"));
    let written = image::open(&target).unwrap().to_rgb8();
    assert_eq!(*written.get_pixel(10, 10), Rgb([255, 0, 0]));
    assert!(!dir.path().join("Watermarked_Images").exists());
}
