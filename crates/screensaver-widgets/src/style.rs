//! Style binding: the CSS properties a widget writes for the host to apply.

use screensaver_core::{cover_box, ColorSequence, Size};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered set of CSS property writes.
///
/// The browser host copies every entry onto the background element with
/// `style.setProperty`; tests inspect it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleBinding {
    properties: BTreeMap<String, String>,
}

impl StyleBinding {
    /// Create an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property. Returns true if the value changed.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.properties.get(name) == Some(&value) {
            return false;
        }
        self.properties.insert(name.to_string(), value);
        true
    }

    /// Current value of a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Iterate over `(property, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Drop every property (the surface is detached).
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Render as an inline `style` attribute.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Format a float for CSS: at most three decimals, no trailing zeros.
#[must_use]
pub fn css_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Comma separated, evenly distributed gradient stops.
#[must_use]
pub fn gradient_stops(colors: &ColorSequence) -> String {
    colors
        .stops()
        .into_iter()
        .map(|(color, percent)| format!("{color} {}%", css_number(percent)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Stops for a closed gradient: color `i` of `n` at `i * 100 / n` percent,
/// then the first color again at 100% so the ends meet.
#[must_use]
pub fn closed_gradient_stops(colors: &ColorSequence) -> String {
    let count = colors.len() as f64;
    let first = colors.get(0).unwrap_or_default();
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| format!("{color} {}%", css_number(i as f64 * 100.0 / count)))
        .chain(std::iter::once(format!("{first} 100%")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write the covering container box for a rotated, scaled background.
pub fn write_cover(style: &mut StyleBinding, viewport: Size, rotation: f64, scale: f64) {
    let rect = cover_box(viewport, rotation, scale);
    style.set("left", format!("{}px", css_number(rect.x)));
    style.set("top", format!("{}px", css_number(rect.y)));
    style.set("width", format!("{}px", css_number(rect.width)));
    style.set("height", format!("{}px", css_number(rect.height)));
    style.set("transform", format!("rotate({}deg)", css_number(rotation)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_change() {
        let mut style = StyleBinding::new();
        assert!(style.set("background-color", "#ff0000"));
        assert!(!style.set("background-color", "#ff0000"));
        assert!(style.set("background-color", "#00ff00"));
        assert_eq!(style.get("background-color"), Some("#00ff00"));
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_to_css_is_ordered() {
        let mut style = StyleBinding::new();
        style.set("width", "10px");
        style.set("left", "0px");
        assert_eq!(style.to_css(), "left: 0px; width: 10px;");
        style.clear();
        assert!(style.is_empty());
    }

    #[test]
    fn test_css_number() {
        assert_eq!(css_number(12.0), "12");
        assert_eq!(css_number(1.23456), "1.235");
        assert_eq!(css_number(-0.0001), "0");
    }

    #[test]
    fn test_gradient_stops() {
        let colors = ColorSequence::from_colors(["#f00", "#0f0", "#00f"]).unwrap();
        assert_eq!(gradient_stops(&colors), "#f00 0%, #0f0 50%, #00f 100%");
        let one = ColorSequence::single("#abc");
        assert_eq!(gradient_stops(&one), "#abc 0%, #abc 100%");
    }

    #[test]
    fn test_closed_gradient_stops_meet_at_the_ends() {
        let colors = ColorSequence::from_colors(["#f00", "#0f0", "#00f"]).unwrap();
        assert_eq!(
            closed_gradient_stops(&colors),
            "#f00 0%, #0f0 33.333%, #00f 66.667%, #f00 100%"
        );
        let one = ColorSequence::single("#abc");
        assert_eq!(closed_gradient_stops(&one), "#abc 0%, #abc 100%");
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut style = StyleBinding::new();
        style.set("background-color", "#fff");
        assert_eq!(
            serde_json::to_string(&style).unwrap(),
            r##"{"background-color":"#fff"}"##
        );
    }

    #[test]
    fn test_write_cover() {
        let mut style = StyleBinding::new();
        write_cover(&mut style, Size::new(800.0, 600.0), 90.0, 1.0);
        assert_eq!(style.get("width"), Some("600px"));
        assert_eq!(style.get("height"), Some("800px"));
        assert_eq!(style.get("left"), Some("100px"));
        assert_eq!(style.get("top"), Some("-100px"));
        assert_eq!(style.get("transform"), Some("rotate(90deg)"));
    }
}
