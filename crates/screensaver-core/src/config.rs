//! Built-in defaults and their YAML override format.
//!
//! ```yaml
//! color-cycle:
//!   colors: ["#ff0000", "#ffff00", "#80ff00"]
//!   speed: 5
//!   base_duration_ms: 4000
//! ```
//!
//! Every section and field is optional; omitted values keep the built-ins.

use crate::color::Color;
use crate::error::ConfigError;
use crate::kind::WidgetKind;
use crate::sequence::ColorSequence;
use serde::{Deserialize, Serialize};

const FALLBACK_COLOR: &str = "#ff0000";

/// Defaults for the linear gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearDefaults {
    /// Gradient stops when nothing is stored
    pub colors: Vec<String>,
    /// Speed setting (0-10)
    pub speed: f64,
    /// Gradient direction in degrees
    pub angle: f64,
    /// Background drift in percent per second per speed unit
    pub offset_rate: f64,
}

impl Default for LinearDefaults {
    fn default() -> Self {
        Self {
            colors: vec![
                "#ff0000".into(),
                "#0000ff".into(),
                "#00ff00".into(),
                "#ffff00".into(),
            ],
            speed: 2.0,
            angle: 90.0,
            offset_rate: 5.0,
        }
    }
}

/// Defaults for the conic gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConicDefaults {
    /// Gradient stops when nothing is stored
    pub colors: Vec<String>,
    /// Speed setting (0-10)
    pub speed: f64,
    /// Rotation in degrees per second per speed unit
    pub angle_rate: f64,
}

impl Default for ConicDefaults {
    fn default() -> Self {
        Self {
            colors: vec![
                "#0084ff".into(),
                "#04ff00".into(),
                "#ff00ea".into(),
                "#ff9100".into(),
                "#7300ff".into(),
            ],
            speed: 2.0,
            angle_rate: 6.0,
        }
    }
}

/// Defaults for the color cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleDefaults {
    /// Palette when nothing is stored
    pub colors: Vec<String>,
    /// Speed setting (1-10)
    pub speed: f64,
    /// Step interval at speed 1; the interval is `base_duration_ms / speed`
    pub base_duration_ms: f64,
    /// Saturation of generated colors, percent
    pub saturation: u8,
    /// Lightness of generated colors, percent
    pub lightness: u8,
}

impl Default for CycleDefaults {
    fn default() -> Self {
        Self {
            colors: vec!["#ff0000".into(), "#ffff00".into(), "#80ff00".into()],
            speed: 5.0,
            base_duration_ms: 4000.0,
            saturation: 70,
            lightness: 50,
        }
    }
}

/// Defaults for the solid background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolidDefaults {
    /// Background color
    pub color: String,
}

impl Default for SolidDefaults {
    fn default() -> Self {
        Self {
            color: FALLBACK_COLOR.into(),
        }
    }
}

/// Per-kind defaults and animation tuning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Defaults {
    /// Linear gradient section
    pub linear_gradient: LinearDefaults,
    /// Conic gradient section
    pub conic_gradient: ConicDefaults,
    /// Color cycle section
    pub color_cycle: CycleDefaults,
    /// Solid color section
    pub solid_color: SolidDefaults,
}

impl Defaults {
    /// Parse and validate a YAML override document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or values out of range.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let defaults: Self = serde_yaml_ng::from_str(yaml)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check palettes and tuning constants.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in WidgetKind::ALL {
            let colors = self.palette_entries(kind);
            if colors.is_empty() {
                return Err(ConfigError::EmptyPalette(kind.to_string()));
            }
            for color in colors {
                Color::parse_css(color).map_err(|source| ConfigError::InvalidColor {
                    kind: kind.to_string(),
                    color: color.clone(),
                    source,
                })?;
            }
        }

        check_range("linear-gradient.speed", self.linear_gradient.speed, 0.0, 10.0)?;
        check_range("linear-gradient.angle", self.linear_gradient.angle, 0.0, 360.0)?;
        check_positive("linear-gradient.offset_rate", self.linear_gradient.offset_rate)?;
        check_range("conic-gradient.speed", self.conic_gradient.speed, 0.0, 10.0)?;
        check_positive("conic-gradient.angle_rate", self.conic_gradient.angle_rate)?;
        check_range("color-cycle.speed", self.color_cycle.speed, 1.0, 10.0)?;
        check_positive("color-cycle.base_duration_ms", self.color_cycle.base_duration_ms)?;
        check_range("color-cycle.saturation", f64::from(self.color_cycle.saturation), 0.0, 100.0)?;
        check_range("color-cycle.lightness", f64::from(self.color_cycle.lightness), 0.0, 100.0)?;
        Ok(())
    }

    fn palette_entries(&self, kind: WidgetKind) -> &[String] {
        match kind {
            WidgetKind::LinearGradient => &self.linear_gradient.colors,
            WidgetKind::ConicGradient => &self.conic_gradient.colors,
            WidgetKind::ColorCycle => &self.color_cycle.colors,
            WidgetKind::SolidColor => std::slice::from_ref(&self.solid_color.color),
        }
    }

    /// Default color sequence of `kind`.
    #[must_use]
    pub fn palette(&self, kind: WidgetKind) -> ColorSequence {
        ColorSequence::from_colors(self.palette_entries(kind).iter().cloned())
            .unwrap_or_else(|_| ColorSequence::single(FALLBACK_COLOR))
    }

    /// Default speed of `kind`; `None` for kinds that do not animate.
    #[must_use]
    pub const fn speed(&self, kind: WidgetKind) -> Option<f64> {
        match kind {
            WidgetKind::LinearGradient => Some(self.linear_gradient.speed),
            WidgetKind::ConicGradient => Some(self.conic_gradient.speed),
            WidgetKind::ColorCycle => Some(self.color_cycle.speed),
            WidgetKind::SolidColor => None,
        }
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} is outside [{min}, {max}]"),
        })
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "must be positive".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults_are_valid() {
        Defaults::default().validate().unwrap();
    }

    #[test]
    fn test_empty_document_is_builtin() {
        assert_eq!(Defaults::from_yaml("  \n").unwrap(), Defaults::default());
    }

    #[test]
    fn test_partial_override_keeps_builtins() {
        let yaml = "color-cycle:\n  colors: ['#000000', '#ffffff']\n  speed: 8\n";
        let d = Defaults::from_yaml(yaml).unwrap();
        assert_eq!(d.color_cycle.colors, vec!["#000000", "#ffffff"]);
        assert_eq!(d.color_cycle.speed, 8.0);
        assert_eq!(d.color_cycle.base_duration_ms, 4000.0);
        assert_eq!(d.linear_gradient, LinearDefaults::default());
    }

    #[test]
    fn test_empty_palette_rejected() {
        let err = Defaults::from_yaml("conic-gradient:\n  colors: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPalette(ref k) if k == "conic-gradient"));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let err = Defaults::from_yaml("solid-color:\n  color: chartreuse\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { .. }));
    }

    #[test]
    fn test_out_of_range_speed_rejected() {
        let err = Defaults::from_yaml("linear-gradient:\n  speed: 11\n").unwrap_err();
        assert!(err.to_string().contains("linear-gradient.speed"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(matches!(
            Defaults::from_yaml("plasma:\n  speed: 1\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let d = Defaults::default();
        assert_eq!(Defaults::from_yaml(&d.to_yaml().unwrap()).unwrap(), d);
    }

    #[test]
    fn test_palette_and_speed() {
        let d = Defaults::default();
        assert_eq!(d.palette(WidgetKind::ColorCycle).len(), 3);
        assert_eq!(d.palette(WidgetKind::SolidColor).as_slice(), ["#ff0000"]);
        assert_eq!(d.speed(WidgetKind::ColorCycle), Some(5.0));
        assert_eq!(d.speed(WidgetKind::SolidColor), None);
    }
}
