//! Capability traits: one per parameter family.
//!
//! A widget advertises the families it supports through the `as_*` probes on
//! [`AnimatedWidget`](crate::AnimatedWidget); the settings panel dispatches
//! edits against those instead of guessing by method name.

use screensaver_core::{ChoiceOption, ColorSequence};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale bounds applied by every widget regardless of what the caller sent.
pub const SCALE_RANGE: (f64, f64) = (0.1, 3.0);
/// Rotation bounds in degrees.
pub const ROTATION_RANGE: (f64, f64) = (-180.0, 180.0);
/// Speed bounds; zero disables animation.
pub const SPEED_RANGE: (f64, f64) = (0.0, 10.0);

/// Time-driven widgets.
pub trait SpeedAdjustable {
    /// Current speed setting.
    fn speed(&self) -> f64;

    /// Change the speed. Zero stops the loop; any other change restarts it.
    fn update_speed(&mut self, speed: f64);

    /// Run the animation backwards.
    fn update_reverse(&mut self, reverse: bool);
}

/// Widgets with a gradient direction.
pub trait AngleAdjustable {
    /// Set the direction in degrees.
    fn update_angle(&mut self, degrees: f64);
}

/// Widgets with a positional offset (percent).
pub trait OffsetAdjustable {
    /// Horizontal offset.
    fn update_offset_x(&mut self, percent: f64);

    /// Vertical offset.
    fn update_offset_y(&mut self, percent: f64);
}

/// Widgets whose whole background can be rotated and scaled.
pub trait TransformAdjustable {
    /// Current rotation in degrees.
    fn global_rotation(&self) -> f64;

    /// Current scale factor.
    fn global_scale(&self) -> f64;

    /// Rotation in degrees, clamped to [`ROTATION_RANGE`].
    fn update_global_rotation(&mut self, degrees: f64);

    /// Scale factor, clamped to [`SCALE_RANGE`].
    fn update_global_scale(&mut self, factor: f64);
}

/// Widgets that blend gradient stops in a selectable color space.
pub trait ColorSpaceAdjustable {
    /// Choose the interpolation space; `None` means browser default.
    ///
    /// While the effect is disabled this behaves exactly like `None`.
    fn update_color_space(&mut self, space: Option<ColorSpace>);

    /// Gate the effect without forgetting the chosen space.
    fn set_color_space_enabled(&mut self, enabled: bool);

    /// Space actually applied to the rendered gradient.
    fn effective_color_space(&self) -> Option<ColorSpace>;
}

/// Widgets owning an editable color sequence.
pub trait ColorSequenceEditable {
    /// Current colors.
    fn colors(&self) -> &ColorSequence;

    /// Replace the color at `index`. Invalid colors and indices are ignored.
    fn update_color(&mut self, index: usize, color: &str);

    /// Append a color, or a random one when `None`.
    fn add_color(&mut self, color: Option<&str>);

    /// Insert a copy of the color at `index` right after it.
    fn duplicate_color(&mut self, index: usize);

    /// Remove the color at `index`; no-op on the last remaining color.
    fn remove_color(&mut self, index: usize);

    /// Swap with the previous color.
    fn move_color_up(&mut self, index: usize);

    /// Swap with the next color.
    fn move_color_down(&mut self, index: usize);
}

/// Widgets showing one color.
pub trait ColorAdjustable {
    /// Current color.
    fn color(&self) -> &str;

    /// Replace the color. Invalid colors are ignored.
    fn update_color(&mut self, color: &str);
}

/// Widgets that fade between discrete states.
pub trait TransitionAdjustable {
    /// Choose how one state blends into the next.
    fn update_transition(&mut self, transition: Transition);
}

/// Gradient interpolation color spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSpace {
    /// sRGB
    Srgb,
    /// Linear-light sRGB
    SrgbLinear,
    /// OKLab
    Oklab,
    /// OKLCh
    Oklch,
    /// HSL
    Hsl,
    /// CIE Lab
    Lab,
}

impl ColorSpace {
    /// Every space, in the order the panel lists them.
    pub const ALL: [Self; 6] = [
        Self::Srgb,
        Self::SrgbLinear,
        Self::Oklab,
        Self::Oklch,
        Self::Hsl,
        Self::Lab,
    ];

    /// CSS identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::SrgbLinear => "srgb-linear",
            Self::Oklab => "oklab",
            Self::Oklch => "oklch",
            Self::Hsl => "hsl",
            Self::Lab => "lab",
        }
    }

    /// Options for a single-choice descriptor.
    #[must_use]
    pub fn options() -> Vec<ChoiceOption> {
        let label = |space: Self| match space {
            Self::Srgb => "sRGB",
            Self::SrgbLinear => "Linear sRGB",
            Self::Oklab => "OKLab",
            Self::Oklch => "OKLCh",
            Self::Hsl => "HSL",
            Self::Lab => "Lab",
        };
        Self::ALL
            .into_iter()
            .map(|space| ChoiceOption::new(space.as_str(), label(space)))
            .collect()
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorSpace {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or(())
    }
}

/// How a color cycle moves from one color to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    /// Eased fade lasting the whole step
    #[default]
    Smooth,
    /// Linear fade lasting the whole step
    Linear,
    /// Hard cut
    Instant,
}

impl Transition {
    /// Every transition, in panel order.
    pub const ALL: [Self; 3] = [Self::Smooth, Self::Linear, Self::Instant];

    /// Stored identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Linear => "linear",
            Self::Instant => "instant",
        }
    }

    /// Options for a button-group descriptor.
    #[must_use]
    pub fn options() -> Vec<ChoiceOption> {
        vec![
            ChoiceOption::new("smooth", "Smooth"),
            ChoiceOption::new("linear", "Linear"),
            ChoiceOption::new("instant", "Instant"),
        ]
    }

    /// CSS `transition` value for a step lasting `seconds`.
    #[must_use]
    pub fn css(self, seconds: f64) -> String {
        let seconds = crate::style::css_number(seconds);
        match self {
            Self::Smooth => format!("background-color {seconds}s ease-in-out"),
            Self::Linear => format!("background-color {seconds}s linear"),
            Self::Instant => "none".to_string(),
        }
    }
}

impl FromStr for Transition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

/// Chosen color space plus its enable toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSpaceSetting {
    /// Space picked in the panel
    pub chosen: Option<ColorSpace>,
    /// Whether the choice is applied
    pub enabled: bool,
}

impl ColorSpaceSetting {
    /// Space to render with: the chosen one while enabled, otherwise none.
    #[must_use]
    pub const fn effective(&self) -> Option<ColorSpace> {
        if self.enabled {
            self.chosen
        } else {
            None
        }
    }

    /// ` in <space>` suffix for a gradient's first argument, or empty.
    #[must_use]
    pub fn interpolation(&self) -> String {
        self.effective()
            .map(|space| format!(" in {space}"))
            .unwrap_or_default()
    }
}

/// Clamp into an inclusive range; NaN maps to the lower bound.
#[must_use]
pub fn clamp_to(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_space_parse() {
        for space in ColorSpace::ALL {
            assert_eq!(space.as_str().parse::<ColorSpace>(), Ok(space));
        }
        assert!("cmyk".parse::<ColorSpace>().is_err());
        assert_eq!(ColorSpace::options().len(), ColorSpace::ALL.len());
    }

    #[test]
    fn test_transition_css() {
        assert_eq!(Transition::Smooth.css(0.8), "background-color 0.8s ease-in-out");
        assert_eq!(Transition::Linear.css(4.0), "background-color 4s linear");
        assert_eq!(Transition::Instant.css(4.0), "none");
        assert_eq!("linear".parse::<Transition>(), Ok(Transition::Linear));
    }

    #[test]
    fn test_color_space_setting_gated() {
        let mut setting = ColorSpaceSetting {
            chosen: Some(ColorSpace::Oklch),
            enabled: false,
        };
        assert_eq!(setting.effective(), None);
        assert_eq!(setting.interpolation(), "");
        setting.enabled = true;
        assert_eq!(setting.interpolation(), " in oklch");
    }

    #[test]
    fn test_clamp_to() {
        assert_eq!(clamp_to(5.0, SCALE_RANGE), 3.0);
        assert_eq!(clamp_to(0.0, SCALE_RANGE), 0.1);
        assert_eq!(clamp_to(f64::NAN, ROTATION_RANGE), -180.0);
        assert_eq!(clamp_to(-200.0, ROTATION_RANGE), -180.0);
    }
}
