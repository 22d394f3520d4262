//! Validated rendering options for qrserver QR codes.
//!
//! A [`QrOptions`] value can only be obtained through [`QrOptions::new`]
//! (directly, via the builder, or via serde), so every instance in the
//! program is known to be in range. Fields are private and there are no
//! setters.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::config;

/// Field names reported by [`OptionsError::InvalidArgument`].
pub mod field {
    pub const ERROR_CORRECTION_LEVEL: &str = "errorCorrectionLevel";
    pub const MARGIN: &str = "margin";
    pub const QUIET_ZONE: &str = "quietZone";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const FOREGROUND_COLOR: &str = "foregroundColor";
    pub const IMAGE_FORMAT: &str = "imageFormat";
    pub const BASE_URI: &str = "baseUri";
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl OptionsError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidArgument { field, .. } => *field,
        }
    }
}

/// QR code redundancy tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCorrectionLevel {
    /// Roughly 7% of codewords can be restored
    #[default]
    Low,
    /// Roughly 15%
    Medium,
    /// Roughly 25%
    Quartile,
    /// Roughly 30%
    High,
}

impl ErrorCorrectionLevel {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::Quartile, Self::High];

    /// Single-letter code sent as the `ecc` parameter
    pub fn code(self) -> char {
        match self {
            Self::Low => 'L',
            Self::Medium => 'M',
            Self::Quartile => 'Q',
            Self::High => 'H',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Quartile => "quartile",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl TryFrom<char> for ErrorCorrectionLevel {
    type Error = OptionsError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(&c))
            .ok_or_else(|| {
                OptionsError::invalid(
                    field::ERROR_CORRECTION_LEVEL,
                    format!("unknown error correction level '{}'", c),
                )
            })
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = OptionsError;

    /// Accepts the wire letter (`L`) or the name (`low`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::try_from(c);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                OptionsError::invalid(
                    field::ERROR_CORRECTION_LEVEL,
                    format!("unknown error correction level '{}'", s),
                )
            })
    }
}

/// Output file type produced by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Gif,
    Jpeg,
    Svg,
    Eps,
}

impl ImageFormat {
    pub const ALL: [Self; 5] = [Self::Png, Self::Gif, Self::Jpeg, Self::Svg, Self::Eps];

    /// Lowercase token sent as the `format` parameter
    pub fn token(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
            Self::Eps => "eps",
        }
    }

    /// Content type of the bytes the service returns for this format
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Eps => "application/postscript",
        }
    }

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            other => other.token(),
        }
    }

    /// Vector output ignores the pixel margin.
    pub fn is_vector(self) -> bool {
        matches!(self, Self::Svg | Self::Eps)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ImageFormat {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("jpg") {
            return Ok(Self::Jpeg);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                OptionsError::invalid(
                    field::IMAGE_FORMAT,
                    format!("unknown image format '{}'", s),
                )
            })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color '{0}': expected six hex digits (RRGGBB)")]
pub struct ParseColorError(pub String);

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Six uppercase hex digits, no leading `#`
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `RRGGBB` or `#RRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Immutable, validated rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawOptions")]
pub struct QrOptions {
    error_correction: ErrorCorrectionLevel,
    margin: u8,
    quiet_zone: u8,
    background: Color,
    foreground: Color,
    format: ImageFormat,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrectionLevel::default(),
            margin: config::DEFAULT_MARGIN,
            quiet_zone: config::DEFAULT_QUIET_ZONE,
            background: Color::WHITE,
            foreground: Color::BLACK,
            format: ImageFormat::default(),
        }
    }
}

impl QrOptions {
    /// Validate and assemble a set of options.
    ///
    /// Missing colors fall back to a white background and black foreground.
    /// Out-of-range values are rejected, never clamped.
    pub fn new(
        error_correction: ErrorCorrectionLevel,
        margin: i32,
        quiet_zone: i32,
        background: Option<Color>,
        foreground: Option<Color>,
        format: ImageFormat,
    ) -> Result<Self, OptionsError> {
        let margin = check_range(field::MARGIN, margin, config::MAX_MARGIN)?;
        let quiet_zone = check_range(field::QUIET_ZONE, quiet_zone, config::MAX_QUIET_ZONE)?;

        Ok(Self {
            error_correction,
            margin,
            quiet_zone,
            background: background.unwrap_or(Color::WHITE),
            foreground: foreground.unwrap_or(Color::BLACK),
            format,
        })
    }

    pub fn builder() -> QrOptionsBuilder {
        QrOptionsBuilder::default()
    }

    /// Builder seeded with this value's fields
    pub fn to_builder(&self) -> QrOptionsBuilder {
        QrOptionsBuilder {
            error_correction: Some(self.error_correction),
            margin: Some(self.margin.into()),
            quiet_zone: Some(self.quiet_zone.into()),
            background: Some(self.background),
            foreground: Some(self.foreground),
            format: Some(self.format),
        }
    }

    /// Parse options from a JSON document. Absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn error_correction(&self) -> ErrorCorrectionLevel {
        self.error_correction
    }

    /// Pixel border outside the quiet zone
    pub fn margin(&self) -> u8 {
        self.margin
    }

    /// Border in module units
    pub fn quiet_zone(&self) -> u8 {
        self.quiet_zone
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

fn check_range(name: &'static str, value: i32, max: u8) -> Result<u8, OptionsError> {
    if value < 0 || value > i32::from(max) {
        return Err(OptionsError::invalid(
            name,
            format!("{} is outside 0..={}", value, max),
        ));
    }
    u8::try_from(value).map_err(|_| OptionsError::invalid(name, format!("{} does not fit", value)))
}

/// Step-by-step construction of [`QrOptions`]; [`build`](Self::build) runs
/// the same validation as [`QrOptions::new`].
#[derive(Debug, Clone, Default)]
pub struct QrOptionsBuilder {
    error_correction: Option<ErrorCorrectionLevel>,
    margin: Option<i32>,
    quiet_zone: Option<i32>,
    background: Option<Color>,
    foreground: Option<Color>,
    format: Option<ImageFormat>,
}

impl QrOptionsBuilder {
    pub fn error_correction(mut self, level: ErrorCorrectionLevel) -> Self {
        self.error_correction = Some(level);
        self
    }

    pub fn margin(mut self, margin: i32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn quiet_zone(mut self, quiet_zone: i32) -> Self {
        self.quiet_zone = Some(quiet_zone);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn build(self) -> Result<QrOptions, OptionsError> {
        QrOptions::new(
            self.error_correction.unwrap_or_default(),
            self.margin.unwrap_or(config::DEFAULT_MARGIN.into()),
            self.quiet_zone.unwrap_or(config::DEFAULT_QUIET_ZONE.into()),
            self.background,
            self.foreground,
            self.format.unwrap_or_default(),
        )
    }
}

/// Unvalidated shape of the JSON options document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawOptions {
    #[serde(default, alias = "ecc")]
    error_correction_level: Option<String>,
    #[serde(default)]
    margin: Option<i32>,
    #[serde(default, alias = "qzone")]
    quiet_zone: Option<i32>,
    #[serde(default, alias = "bgcolor")]
    background_color: Option<String>,
    #[serde(default, alias = "color")]
    foreground_color: Option<String>,
    #[serde(default, alias = "format")]
    image_format: Option<String>,
}

impl TryFrom<RawOptions> for QrOptions {
    type Error = OptionsError;

    fn try_from(raw: RawOptions) -> Result<Self, Self::Error> {
        let mut builder = QrOptions::builder();
        if let Some(level) = raw.error_correction_level {
            builder = builder.error_correction(level.parse()?);
        }
        if let Some(margin) = raw.margin {
            builder = builder.margin(margin);
        }
        if let Some(quiet_zone) = raw.quiet_zone {
            builder = builder.quiet_zone(quiet_zone);
        }
        if let Some(color) = raw.background_color {
            builder = builder.background(parse_color(field::BACKGROUND_COLOR, &color)?);
        }
        if let Some(color) = raw.foreground_color {
            builder = builder.foreground(parse_color(field::FOREGROUND_COLOR, &color)?);
        }
        if let Some(format) = raw.image_format {
            builder = builder.format(format.parse()?);
        }
        builder.build()
    }
}

fn parse_color(name: &'static str, s: &str) -> Result<Color, OptionsError> {
    s.parse()
        .map_err(|e: ParseColorError| OptionsError::invalid(name, e.to_string()))
}
