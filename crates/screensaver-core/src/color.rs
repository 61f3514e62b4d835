//! Color values as they travel through the settings panel and storage.
//!
//! Colors are persisted as the CSS strings the user picked (`#rrggbb` or
//! `hsl(h, s%, l%)`), so this type is mostly used to validate input and to
//! generate new palette entries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from hue (degrees), saturation and lightness
    /// (both percentages).
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::rgb(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0f32.mul_add(l, -q);

        Self::rgb(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }

    /// Parse a hex color string (`#rgb`, `#rrggbb` or `#rrggbbaa`, `#` optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex);
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex);

        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::rgb(
                    f32::from(r * 17) / 255.0,
                    f32::from(g * 17) / 255.0,
                    f32::from(b * 17) / 255.0,
                ))
            }
            6 => Ok(Self::rgb(
                f32::from(channel(&hex[0..2])?) / 255.0,
                f32::from(channel(&hex[2..4])?) / 255.0,
                f32::from(channel(&hex[4..6])?) / 255.0,
            )),
            8 => Ok(Self::new(
                f32::from(channel(&hex[0..2])?) / 255.0,
                f32::from(channel(&hex[2..4])?) / 255.0,
                f32::from(channel(&hex[4..6])?) / 255.0,
                f32::from(channel(&hex[6..8])?) / 255.0,
            )),
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Parse a CSS color as the panel accepts it: a hex color or
    /// `hsl(h, s%, l%)`.
    ///
    /// # Errors
    ///
    /// Returns an error for any other syntax.
    pub fn parse_css(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();
        if input.starts_with('#') {
            return Self::from_hex(input);
        }

        let body = input
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(ColorParseError::UnsupportedSyntax)?;

        let parts: Vec<&str> = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let [hue, saturation, lightness] = parts.as_slice() else {
            return Err(ColorParseError::InvalidHsl);
        };

        let number = |s: &str, suffix: &str| {
            s.trim_end_matches(suffix)
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(ColorParseError::InvalidHsl)
        };

        Ok(Self::from_hsl(
            number(hue, "deg")?,
            number(saturation, "%")?,
            number(lightness, "%")?,
        ))
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// Red color
    pub const RED: Self = Self {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        ((q - p) * 6.0).mul_add(t, p)
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        ((q - p) * 6.0).mul_add(2.0 / 3.0 - t, p)
    } else {
        p
    }
}

/// Check whether a string is a color the panel accepts.
#[must_use]
pub fn is_valid_css_color(input: &str) -> bool {
    Color::parse_css(input).is_ok()
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 3, 6 or 8)")]
    InvalidLength,
    /// Malformed `hsl(...)` arguments
    #[error("invalid hsl() arguments")]
    InvalidHsl,
    /// Neither hex nor `hsl(...)`
    #[error("unsupported color syntax")]
    UnsupportedSyntax,
}
