//! Greedy, character-granular line wrapping.
//!
//! The wrap traversal exists once, as the [`Layout`] iterator. Measuring folds
//! it from the origin `(0, 0)`; drawing walks it again from the anchored
//! origin. Both passes therefore make identical wrap decisions.
//!
//! Wrapping rule, per character:
//!
//! 1. look up the character's box in the face chosen by its script class;
//! 2. if the pen offset plus the character width exceeds `max_width`, return
//!    the pen to the line start and move down by the height of *this*
//!    character;
//! 3. place the character, then advance the pen by its width.
//!
//! Step 2 uses the height of the character that triggered the wrap, not the
//! tallest character of the finished line. A short character following a
//! tall one therefore produces a line that is too low; this matches the
//! behaviour existing watermark output depends on.

use super::position::PlacementPosition;
use super::script::ScriptClass;
use super::text_renderer::{FaceSet, GlyphSize};
use std::str::Chars;

/// Bounding box enclosing all wrapped lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutBox {
    pub width: u32,
    pub height: u32,
}

impl LayoutBox {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Box traced by a sequence of placements laid out from `origin`.
    ///
    /// Width is the furthest pen position reached; height is the bottom of
    /// the last placed character.
    pub fn enclosing<I>(placements: I, origin: PlacementPosition) -> Self
    where
        I: IntoIterator<Item = GlyphPlacement>,
    {
        placements
            .into_iter()
            .fold(Self::default(), |mut layout_box, placement| {
                let right = i64::from(placement.x) - i64::from(origin.x)
                    + i64::from(placement.size.width);
                let bottom = i64::from(placement.y) - i64::from(origin.y)
                    + i64::from(placement.size.height);
                layout_box.width = layout_box.width.max(clamp_extent(right));
                layout_box.height = clamp_extent(bottom);
                layout_box
            })
    }
}

fn clamp_extent(extent: i64) -> u32 {
    u32::try_from(extent.max(0)).unwrap_or(u32::MAX)
}

/// One character at its final pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub ch: char,
    pub script: ScriptClass,
    /// Top-left corner of the glyph box.
    pub x: i32,
    pub y: i32,
    pub size: GlyphSize,
}

/// Iterator over glyph placements for one string.
///
/// Pen offsets are tracked relative to the origin, so the wrap decision does
/// not depend on where the block is anchored.
pub struct Layout<'a> {
    chars: Chars<'a>,
    faces: &'a FaceSet,
    max_width: u32,
    origin: PlacementPosition,
    pen_x: u32,
    pen_y: u32,
}

impl Iterator for Layout<'_> {
    type Item = GlyphPlacement;

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.chars.next()?;
        let script = self.faces.classify(ch);
        let size = self.faces.face(script).glyph_size(ch);

        if self.pen_x.saturating_add(size.width) > self.max_width {
            self.pen_x = 0;
            self.pen_y = self.pen_y.saturating_add(size.height);
        }

        let placement = GlyphPlacement {
            ch,
            script,
            x: self.origin.x.saturating_add(pen_offset(self.pen_x)),
            y: self.origin.y.saturating_add(pen_offset(self.pen_y)),
            size,
        };

        self.pen_x = self.pen_x.saturating_add(size.width);
        Some(placement)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chars.size_hint()
    }
}

/// Pen offsets past `i32::MAX` saturate instead of wrapping negative.
fn pen_offset(pen: u32) -> i32 {
    i32::try_from(pen).unwrap_or(i32::MAX)
}

/// Lay out `text` with its block starting at `origin`.
///
/// `max_width` is the width available to a line; a zero width makes every
/// character start a new line.
pub fn layout<'a>(
    text: &'a str,
    faces: &'a FaceSet,
    max_width: u32,
    origin: PlacementPosition,
) -> Layout<'a> {
    Layout {
        chars: text.chars(),
        faces,
        max_width,
        origin,
        pen_x: 0,
        pen_y: 0,
    }
}

/// Size of the wrapped block for `text` at `max_width`.
pub fn measure(text: &str, faces: &FaceSet, max_width: u32) -> LayoutBox {
    let origin = PlacementPosition::new(0, 0);
    LayoutBox::enclosing(layout(text, faces, max_width, origin), origin)
}
