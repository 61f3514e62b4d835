//! Parameter descriptors: the declarative schema each screensaver exposes to
//! the settings panel.
//!
//! A descriptor's `name` doubles as the storage-key suffix, so renaming one
//! orphans whatever value was persisted under the old name.

use crate::color::is_valid_css_color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Control family a parameter is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// Paired slider and number input.
    NumericRange,
    /// Color picker row.
    Color,
    /// On/off switch.
    BooleanSwitch,
    /// Radio group gated by an enable toggle.
    SingleChoice,
    /// Row of mutually exclusive buttons.
    ButtonGroup,
}

/// Numeric bounds of a range parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Step increment (0.0 = continuous)
    pub step: f64,
}

impl Bounds {
    /// Create bounds; `min` and `max` are swapped if given in reverse.
    #[must_use]
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            step: step.abs(),
        }
    }

    /// Clamp into `[min, max]`. NaN maps to `min`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Clamp and round to the nearest step.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        let value = self.clamp(value);
        if self.step > 0.0 {
            let steps = ((value - self.min) / self.step).round();
            self.clamp(steps.mul_add(self.step, self.min))
        } else {
            value
        }
    }

    /// Check whether a value lies inside the bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One option of a single-choice or button-group parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Stored identifier
    pub value: String,
    /// Display label
    pub label: String,
}

impl ChoiceOption {
    /// Create a new option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A parameter value as held by controls and widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Switch state
    Bool(bool),
    /// Range value
    Number(f64),
    /// Color string or choice identifier
    Text(String),
}

impl ParamValue {
    /// Numeric payload, if any.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value exactly as it is written to storage.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Static metadata describing one configurable knob of a screensaver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Stable identifier, also the storage-key suffix
    pub name: String,
    /// Display label
    pub label: String,
    /// Control family
    pub kind: ParamKind,
    /// Value used when nothing is stored
    pub default: ParamValue,
    /// Bounds for numeric ranges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Options for single-choice and button-group parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    /// Disabled descriptors are shown but not interactive
    pub enabled: bool,
}

impl ParamDescriptor {
    fn base(name: impl Into<String>, label: impl Into<String>, kind: ParamKind, default: ParamValue) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            default,
            bounds: None,
            options: Vec::new(),
            enabled: true,
        }
    }

    /// Numeric range parameter. The default is clamped into the bounds.
    #[must_use]
    pub fn range(
        name: impl Into<String>,
        label: impl Into<String>,
        bounds: Bounds,
        default: f64,
    ) -> Self {
        let mut descriptor = Self::base(
            name,
            label,
            ParamKind::NumericRange,
            ParamValue::Number(bounds.clamp(default)),
        );
        descriptor.bounds = Some(bounds);
        descriptor
    }

    /// Color parameter.
    #[must_use]
    pub fn color(name: impl Into<String>, label: impl Into<String>, default: impl Into<String>) -> Self {
        Self::base(name, label, ParamKind::Color, ParamValue::Text(default.into()))
    }

    /// Boolean switch parameter.
    #[must_use]
    pub fn switch(name: impl Into<String>, label: impl Into<String>, default: bool) -> Self {
        Self::base(name, label, ParamKind::BooleanSwitch, ParamValue::Bool(default))
    }

    /// Single-choice parameter rendered as a radio group with an enable toggle.
    #[must_use]
    pub fn choice(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<ChoiceOption>,
        default: impl Into<String>,
    ) -> Self {
        let mut descriptor = Self::base(
            name,
            label,
            ParamKind::SingleChoice,
            ParamValue::Text(default.into()),
        );
        descriptor.options = options;
        descriptor
    }

    /// Button-group parameter.
    #[must_use]
    pub fn button_group(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<ChoiceOption>,
        default: impl Into<String>,
    ) -> Self {
        let mut descriptor = Self::choice(name, label, options, default);
        descriptor.kind = ParamKind::ButtonGroup;
        descriptor
    }

    /// Mark the descriptor as disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// One-based slot number for generated `colorN` descriptors.
    ///
    /// Returns the zero-based sequence index.
    #[must_use]
    pub fn color_index(&self) -> Option<usize> {
        if self.kind != ParamKind::Color {
            return None;
        }
        self.name
            .strip_prefix("color")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
    }

    /// Coerce a value into this descriptor's domain.
    ///
    /// Numbers are clamped and snapped to the step; colors and choices must be
    /// valid. Returns `None` when the value cannot be interpreted.
    #[must_use]
    pub fn normalize(&self, value: &ParamValue) -> Option<ParamValue> {
        match (self.kind, value) {
            (ParamKind::NumericRange, ParamValue::Number(n)) => {
                let n = self.bounds.map_or(*n, |b| b.snap(*n));
                n.is_finite().then_some(ParamValue::Number(n))
            }
            (ParamKind::BooleanSwitch, ParamValue::Bool(b)) => Some(ParamValue::Bool(*b)),
            (ParamKind::Color, ParamValue::Text(s)) if is_valid_css_color(s) => {
                Some(ParamValue::Text(s.trim().to_string()))
            }
            (ParamKind::SingleChoice | ParamKind::ButtonGroup, ParamValue::Text(s))
                if self.options.iter().any(|o| &o.value == s) =>
            {
                Some(ParamValue::Text(s.clone()))
            }
            _ => None,
        }
    }

    /// Parse a stored string for this descriptor.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<ParamValue> {
        let value = match self.kind {
            ParamKind::NumericRange => ParamValue::Number(raw.trim().parse::<f64>().ok()?),
            ParamKind::BooleanSwitch => ParamValue::Bool(raw.trim().parse::<bool>().ok()?),
            ParamKind::Color | ParamKind::SingleChoice | ParamKind::ButtonGroup => {
                ParamValue::Text(raw.to_string())
            }
        };
        self.normalize(&value)
    }

    /// Resolve a possibly-missing stored string, falling back to the default.
    #[must_use]
    pub fn resolve(&self, raw: Option<&str>) -> ParamValue {
        raw.and_then(|r| self.parse(r))
            .unwrap_or_else(|| self.default.clone())
    }
}
