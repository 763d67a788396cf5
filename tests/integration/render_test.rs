// Integration tests for layout, anchoring and compositing through the public API

use super::test_harness::{fixed_faces, ttc_from_ttf, DEJAVU_SANS};
use image::{Rgba, RgbaImage};
use rstest::rstest;
use std::path::Path;
use watermarker::watermark::{
    composite, measure, render, render_overlay, AnchorMode, CanvasSize, Color, FaceSet,
    LayoutBox, RenderPlan, ScriptClass, WatermarkStyle,
};

fn style(text: &str, anchor: AnchorMode) -> WatermarkStyle {
    WatermarkStyle {
        text: text.to_string(),
        font_size: 12,
        opacity: 100,
        color: Color::white(),
        anchor,
    }
}

/// Bounding box of the non-transparent overlay pixels: (x0, y0, x1, y1) exclusive.
fn ink_bounds(overlay: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    overlay
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] > 0)
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x + 1, y + 1)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1))),
        })
}

#[rstest]
#[case(AnchorMode::TopLeft, (10, 10))]
#[case(AnchorMode::TopRight, (140, 10))]
#[case(AnchorMode::BottomLeft, (10, 58))]
#[case(AnchorMode::BottomRight, (140, 58))]
#[case(AnchorMode::Center, (75, 34))]
fn test_block_lands_at_anchor(#[case] anchor: AnchorMode, #[case] origin: (u32, u32)) {
    // 10 + 10 + 10 + 20 = 50 wide; the wide last glyph makes the block 24 high
    let faces = fixed_faces();
    let text = "AAA中";
    let block = measure(text, &faces, 200);
    assert_eq!(block, LayoutBox::new(50, 24));

    let overlay = render_overlay(CanvasSize::new(200, 92), &style(text, anchor), &faces);
    let (x0, y0, x1, y1) = ink_bounds(&overlay).unwrap();
    assert_eq!((x0, y0), origin);
    assert_eq!((x1 - x0, y1 - y0), (block.width, block.height));
}

#[test]
fn test_measure_matches_draw_for_wrapped_mixed_text() {
    let faces = fixed_faces();
    let text = "版权所有 Copyright 2024 水印";

    for width in [35_u32, 64, 101, 250] {
        let canvas = CanvasSize::new(width, 400);
        let plan = RenderPlan::new(canvas, &style(text, AnchorMode::Center), &faces);
        let traced = LayoutBox::enclosing(plan.placements(text, &faces), plan.origin);
        assert_eq!(traced, plan.block, "width {}", width);
    }
}

#[test]
fn test_render_leaves_source_untouched_and_outside_pixels_identical() {
    let faces = fixed_faces();
    let mut canvas = RgbaImage::new(120, 80);
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 2) as u8, (y * 3) as u8, 77, 255]);
    }
    let original = canvas.clone();
    let s = WatermarkStyle {
        opacity: 40,
        ..style("水印 AB", AnchorMode::BottomRight)
    };

    let overlay = render_overlay(CanvasSize::of(&canvas), &s, &faces);
    let result = render(&canvas, &s, &faces);

    assert_eq!(canvas, original);
    assert_eq!(result, composite(&canvas, &overlay));
    for (x, y, pixel) in result.enumerate_pixels() {
        if overlay.get_pixel(x, y)[3] == 0 {
            assert_eq!(pixel, original.get_pixel(x, y));
        }
    }
}

#[rstest]
#[case(100, 255)]
#[case(50, 127)]
#[case(1, 2)]
#[case(0, 0)]
fn test_overlay_alpha_follows_opacity(#[case] opacity: u8, #[case] alpha: u8) {
    let s = WatermarkStyle {
        opacity,
        ..style("A", AnchorMode::TopLeft)
    };
    let overlay = render_overlay(CanvasSize::new(40, 40), &s, &fixed_faces());
    assert_eq!(overlay.get_pixel(10, 10)[3], alpha);
}

#[test]
fn test_empty_text_renders_identical_copy() {
    let canvas = RgbaImage::from_pixel(33, 17, Rgba([5, 6, 7, 128]));
    let result = render(&canvas, &style("", AnchorMode::Center), &fixed_faces());
    assert_eq!(result, canvas);
}

/// DejaVu Sans as the default face and a `.ttc` copy of it as the wide face.
fn real_faces(dir: &Path, font_size: u32) -> FaceSet {
    let ttc = dir.join("wide.ttc");
    std::fs::write(&ttc, ttc_from_ttf(&std::fs::read(DEJAVU_SANS).unwrap())).unwrap();
    FaceSet::load(Path::new(DEJAVU_SANS), &ttc, font_size).unwrap()
}

#[test]
fn test_collection_loads_its_first_face() {
    let dir = tempfile::tempdir().unwrap();
    let faces = real_faces(dir.path(), 32);

    // Same font on both sides, so both classes measure alike
    for ch in ['A', 'g', '-'] {
        assert_eq!(
            faces.face(ScriptClass::Default).glyph_size(ch),
            faces.face(ScriptClass::Wide).glyph_size(ch)
        );
    }
}

#[rstest]
#[case(AnchorMode::TopLeft, 400)]
#[case(AnchorMode::Center, 400)]
#[case(AnchorMode::BottomRight, 400)]
#[case(AnchorMode::Center, 150)]
fn test_real_fonts_ink_stays_inside_measured_block(
    #[case] anchor: AnchorMode,
    #[case] canvas_width: u32,
) {
    let dir = tempfile::tempdir().unwrap();
    let faces = real_faces(dir.path(), 32);
    let canvas = CanvasSize::new(canvas_width, 300);
    let s = style("水印 Watermark Inc.", anchor);

    let plan = RenderPlan::new(canvas, &s, &faces);
    assert_eq!(plan.block, measure(&s.text, &faces, plan.max_width));

    let overlay = render_overlay(canvas, &s, &faces);
    let (x0, y0, x1, y1) = ink_bounds(&overlay).unwrap();
    assert!(x0 as i32 >= plan.origin.x);
    assert!(y0 as i32 >= plan.origin.y);
    assert!(x1 as i32 <= plan.origin.x + plan.block.width as i32);
    assert!(y1 as i32 <= plan.origin.y + plan.block.height as i32);
}

#[test]
fn test_real_fonts_scale_with_font_size() {
    let dir = tempfile::tempdir().unwrap();
    let small = measure("Watermark", &real_faces(dir.path(), 20), 10_000);
    let large = measure("Watermark", &real_faces(dir.path(), 80), 10_000);

    // Four times the em size gives roughly four times the block
    let width_ratio = large.width as f32 / small.width as f32;
    let height_ratio = large.height as f32 / small.height as f32;
    assert!((3.5..=4.5).contains(&width_ratio), "width ratio {}", width_ratio);
    assert!((3.5..=4.5).contains(&height_ratio), "height ratio {}", height_ratio);
}
