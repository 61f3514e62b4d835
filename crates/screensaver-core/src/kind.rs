//! The closed set of screensaver kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A background animation type. The set is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    /// Linear gradient drifting across an oversized background.
    #[default]
    LinearGradient,
    /// Conic gradient rotating around its center.
    ConicGradient,
    /// Solid background stepping through a palette.
    ColorCycle,
    /// Static solid background.
    SolidColor,
}

impl WidgetKind {
    /// Every kind, in menu order.
    pub const ALL: [Self; 4] = [
        Self::LinearGradient,
        Self::ConicGradient,
        Self::ColorCycle,
        Self::SolidColor,
    ];

    /// Identifier used in storage keys and the selection key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinearGradient => "linear-gradient",
            Self::ConicGradient => "conic-gradient",
            Self::ColorCycle => "color-cycle",
            Self::SolidColor => "solid-color",
        }
    }

    /// Human readable name for menus.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::LinearGradient => "Linear gradient",
            Self::ConicGradient => "Conic gradient",
            Self::ColorCycle => "Color cycle",
            Self::SolidColor => "Solid color",
        }
    }

    /// Whether the kind owns an editable color sequence.
    #[must_use]
    pub const fn has_color_sequence(self) -> bool {
        !matches!(self, Self::SolidColor)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier that names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown screensaver kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for WidgetKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
