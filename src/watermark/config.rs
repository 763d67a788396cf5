//! Watermark style types.
//!
//! This module defines the immutable inputs of one rendering pass:
//! - Anchor modes (four corners and center)
//! - RGB color, with `#RGB` / `#RRGGBB` parsing
//! - The `WatermarkStyle` bundle and its opacity-to-alpha conversion
//!
//! The persisted settings schema lives in `crate::config`; it validates into
//! a `WatermarkStyle`.

use super::WatermarkError;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted opacity value (percent).
pub const MAX_OPACITY: u8 = 100;

/// Where the watermark block is anchored on the canvas.
///
/// Chinese labels written by legacy settings files are accepted as aliases
/// when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorMode {
    #[serde(alias = "左上角")]
    TopLeft,
    #[serde(alias = "右上角")]
    TopRight,
    #[serde(alias = "左下角")]
    BottomLeft,
    #[serde(alias = "右下角")]
    BottomRight,
    #[default]
    #[serde(alias = "中心")]
    Center,
}

impl AnchorMode {
    pub const ALL: [AnchorMode; 5] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Center,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for AnchorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorMode {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top-left" | "左上角" => Ok(Self::TopLeft),
            "top-right" | "右上角" => Ok(Self::TopRight),
            "bottom-left" | "左下角" => Ok(Self::BottomLeft),
            "bottom-right" | "右下角" => Ok(Self::BottomRight),
            "center" | "中心" => Ok(Self::Center),
            other => Err(WatermarkError::ConfigError(format!(
                "Unknown anchor '{}', expected one of top-left, top-right, bottom-left, bottom-right, center",
                other
            ))),
        }
    }
}

/// RGB color. Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Default watermark color.
    pub fn yellow() -> Self {
        Self::new(255, 255, 0)
    }

    /// The color with an alpha channel appended.
    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}

impl FromStr for Color {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_color(s)
    }
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
///
/// # Examples
///
/// ```
/// use watermarker::watermark::{parse_hex_color, Color};
///
/// assert_eq!(parse_hex_color("#FFF").unwrap(), Color::new(255, 255, 255));
/// assert_eq!(parse_hex_color("#FF0000").unwrap(), Color::new(255, 0, 0));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::ConfigError("Color must start with '#'".to_string()))?;

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WatermarkError::ConfigError(format!(
            "Invalid hex digit in color '{}'",
            hex
        )));
    }

    let component = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| WatermarkError::ConfigError(format!("Invalid hex color '{}'", hex)))
    };

    match digits.len() {
        // #RGB - each digit is doubled: 0xF -> 0xFF
        3 => Ok(Color::new(
            component(0..1)? * 17,
            component(1..2)? * 17,
            component(2..3)? * 17,
        )),
        6 => Ok(Color::new(
            component(0..2)?,
            component(2..4)?,
            component(4..6)?,
        )),
        len => Err(WatermarkError::ConfigError(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            len
        ))),
    }
}

/// Convert a 0..=100 opacity into a 0..=255 alpha value.
///
/// Integer division, so 50% maps to 127. Values above 100 saturate.
pub fn opacity_to_alpha(opacity: u8) -> u8 {
    (u32::from(opacity.min(MAX_OPACITY)) * 255 / u32::from(MAX_OPACITY)) as u8
}

/// Everything one rendering pass needs besides the canvas and the fonts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkStyle {
    /// Watermark text; may mix Latin and CJK characters.
    pub text: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// Opacity in percent (0..=100).
    pub opacity: u8,
    pub color: Color,
    pub anchor: AnchorMode,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            text: "Sample Watermark".to_string(),
            font_size: 40,
            opacity: MAX_OPACITY,
            color: Color::yellow(),
            anchor: AnchorMode::Center,
        }
    }
}

impl WatermarkStyle {
    /// Check the numeric ranges of the style.
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if self.font_size == 0 {
            return Err(WatermarkError::ConfigError(
                "Font size must be greater than 0".to_string(),
            ));
        }

        if self.opacity > MAX_OPACITY {
            return Err(WatermarkError::ConfigError(format!(
                "Opacity must be between 0 and 100, got {}",
                self.opacity
            )));
        }

        Ok(())
    }

    pub fn alpha(&self) -> u8 {
        opacity_to_alpha(self.opacity)
    }

    /// Fill color used for every glyph of this style.
    pub fn fill(&self) -> Rgba<u8> {
        self.color.with_alpha(self.alpha())
    }
}
