// Configuration module
//
// Persisted settings for the watermark tool. The on-disk schema stays
// compatible with settings files written by earlier versions of the tool:
// numeric fields may be stored as strings and anchors may use the Chinese
// labels.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::watermark::{AnchorMode, Color, WatermarkError, WatermarkStyle, MAX_OPACITY};

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

fn default_watermark_text() -> String {
    "Sample Watermark".to_string()
}

fn default_font_size() -> NumericField {
    NumericField::Int(40)
}

fn default_opacity() -> NumericField {
    NumericField::Int(i64::from(MAX_OPACITY))
}

fn default_color() -> Color {
    Color::yellow()
}

fn default_output_dir_name() -> String {
    "Watermarked_Images".to_string()
}

fn default_font_path() -> PathBuf {
    PathBuf::from("arial.ttf")
}

fn default_wide_font_path() -> PathBuf {
    PathBuf::from("simsun.ttc")
}

/// Watermark settings as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_watermark_text")]
    pub watermark_text: String,

    /// Font size in pixels (default: 40)
    #[serde(default = "default_font_size")]
    pub font_size: NumericField,

    /// Opacity in percent, 0-100 (default: 100)
    #[serde(default = "default_opacity")]
    pub opacity: NumericField,

    /// RGB triple (default: yellow)
    #[serde(default = "default_color")]
    pub color: Color,

    #[serde(default)]
    pub position: AnchorMode,

    #[serde(default)]
    pub fonts: FontPaths,

    /// Folder created inside the input folder for the results
    #[serde(default = "default_output_dir_name")]
    pub output_dir_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watermark_text: default_watermark_text(),
            font_size: default_font_size(),
            opacity: default_opacity(),
            color: default_color(),
            position: AnchorMode::default(),
            fonts: FontPaths::default(),
            output_dir_name: default_output_dir_name(),
        }
    }
}

/// Font files for the two script classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPaths {
    /// Face for Latin and everything outside the CJK block
    #[serde(default = "default_font_path")]
    pub default: PathBuf,

    /// Face for CJK ideographs
    #[serde(default = "default_wide_font_path")]
    pub wide: PathBuf,
}

impl Default for FontPaths {
    fn default() -> Self {
        Self {
            default: default_font_path(),
            wide: default_wide_font_path(),
        }
    }
}

/// A number that may have been stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Int(i64),
    Text(String),
}

impl NumericField {
    /// Interpret the field as an integer; `field` names it in the error.
    pub fn as_integer(&self, field: &str) -> Result<i64, WatermarkError> {
        match self {
            Self::Int(value) => Ok(*value),
            Self::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                WatermarkError::ConfigError(format!(
                    "{} must be an integer, got '{}'",
                    field, text
                ))
            }),
        }
    }
}

impl From<i64> for NumericField {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Settings {
    /// Validate the settings into the style used for rendering.
    pub fn to_style(&self) -> Result<WatermarkStyle, WatermarkError> {
        let font_size = self.font_size.as_integer("font_size")?;
        if font_size <= 0 {
            return Err(WatermarkError::ConfigError(format!(
                "font_size must be greater than 0, got {}",
                font_size
            )));
        }
        let font_size = u32::try_from(font_size).map_err(|_| {
            WatermarkError::ConfigError(format!("font_size {} is too large", font_size))
        })?;

        let opacity = self.opacity.as_integer("opacity")?;
        if !(0..=i64::from(MAX_OPACITY)).contains(&opacity) {
            return Err(WatermarkError::ConfigError(format!(
                "opacity must be between 0 and {}, got {}",
                MAX_OPACITY, opacity
            )));
        }

        let style = WatermarkStyle {
            text: self.watermark_text.clone(),
            font_size,
            opacity: opacity as u8,
            color: self.color,
            anchor: self.position,
        };
        style.validate()?;
        Ok(style)
    }

    /// Output folder for a given input folder.
    pub fn output_dir(&self, input_dir: &Path) -> PathBuf {
        input_dir.join(&self.output_dir_name)
    }

    /// Parse settings text, then expand `${VAR_NAME}` references in the
    /// font paths. Every other field is taken literally.
    pub fn parse_with_env(raw: &str, format: SettingsFormat) -> Result<Self, WatermarkError> {
        let mut settings: Settings = match format {
            SettingsFormat::Json => serde_json::from_str(raw)
                .map_err(|e| WatermarkError::ConfigError(format!("Invalid settings JSON: {}", e)))?,
            SettingsFormat::Yaml => serde_yaml::from_str(raw)
                .map_err(|e| WatermarkError::ConfigError(format!("Invalid settings YAML: {}", e)))?,
        };
        settings.fonts = settings.fonts.expand_env()?;
        Ok(settings)
    }
}

impl FontPaths {
    /// Substitute `${VAR_NAME}` references in both paths.
    ///
    /// Paths that are not valid UTF-8 are kept as they are.
    pub fn expand_env(&self) -> Result<Self, WatermarkError> {
        Ok(Self {
            default: expand_path(&self.default)?,
            wide: expand_path(&self.wide)?,
        })
    }
}

fn expand_path(path: &Path) -> Result<PathBuf, WatermarkError> {
    match path.to_str() {
        Some(text) => Ok(PathBuf::from(substitute_env(text)?)),
        None => Ok(path.to_path_buf()),
    }
}

/// Replace `${VAR_NAME}` with environment variable values.
///
/// Every referenced variable must be set.
pub fn substitute_env(raw: &str) -> Result<String, WatermarkError> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| WatermarkError::ConfigError(e.to_string()))?;

    let mut missing: Option<String> = None;
    let substituted = re.replace_all(raw, |caps: &regex::Captures| {
        match std::env::var(&caps[1]) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| caps[1].to_string());
                String::new()
            }
        }
    });

    if let Some(var_name) = missing {
        return Err(WatermarkError::ConfigError(format!(
            "Environment variable '{}' is referenced but not set",
            var_name
        )));
    }

    Ok(substituted.into_owned())
}

/// Serialization format of a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Json,
    Yaml,
}

impl SettingsFormat {
    /// `.yaml` and `.yml` are YAML; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Loads and saves [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SettingsFormat {
        SettingsFormat::from_path(&self.path)
    }

    /// Read the settings file. A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, WatermarkError> {
        if !self.path.exists() {
            info!(
                settings_file = %self.path.display(),
                "Settings file not found, using defaults"
            );
            return Ok(Settings::default());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let settings = Settings::parse_with_env(&raw, self.format())?;
        debug!(settings_file = %self.path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Write `settings`, creating the parent folder if needed.
    pub fn save(&self, settings: &Settings) -> Result<(), WatermarkError> {
        let serialized = match self.format() {
            SettingsFormat::Json => serde_json::to_string_pretty(settings)
                .map_err(|e| WatermarkError::ConfigError(e.to_string()))?,
            SettingsFormat::Yaml => serde_yaml::to_string(settings)
                .map_err(|e| WatermarkError::ConfigError(e.to_string()))?,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serialized)?;

        info!(settings_file = %self.path.display(), "Settings saved");
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_FILE)
    }
}
