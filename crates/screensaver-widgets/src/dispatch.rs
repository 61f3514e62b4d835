//! Route a named parameter edit to the capability that handles it.

use crate::capability::{ColorSpace, Transition};
use crate::widget::AnimatedWidget;
use screensaver_core::ParamValue;

/// Apply `value` to the parameter `name` of `widget`.
///
/// Returns false when the widget lacks the capability or the value has the
/// wrong shape; the edit is then ignored.
pub fn apply_param(widget: &mut dyn AnimatedWidget, name: &str, value: &ParamValue) -> bool {
    let applied = match name {
        "speed" => with_number(value, |n| widget.as_speed().map(|w| w.update_speed(n))),
        "reverse" => value
            .as_bool()
            .and_then(|b| widget.as_speed().map(|w| w.update_reverse(b))),
        "angle" => with_number(value, |n| widget.as_angle().map(|w| w.update_angle(n))),
        "offsetX" => with_number(value, |n| widget.as_offset().map(|w| w.update_offset_x(n))),
        "offsetY" => with_number(value, |n| widget.as_offset().map(|w| w.update_offset_y(n))),
        "rotation" => with_number(value, |n| {
            widget.as_transform().map(|w| w.update_global_rotation(n))
        }),
        "scale" => with_number(value, |n| {
            widget.as_transform().map(|w| w.update_global_scale(n))
        }),
        "colorSpace" => value.as_text().and_then(|s| {
            let space = s.parse::<ColorSpace>().ok();
            widget.as_color_space().map(|w| w.update_color_space(space))
        }),
        "transition" => value
            .as_text()
            .and_then(|s| s.parse::<Transition>().ok())
            .and_then(|t| widget.as_transition().map(|w| w.update_transition(t))),
        "color" => value
            .as_text()
            .and_then(|c| widget.as_color().map(|w| w.update_color(c))),
        other => match color_slot(other) {
            Some(index) => value.as_text().and_then(|c| {
                widget
                    .as_color_sequence()
                    .map(|w| w.update_color(index, c))
            }),
            None => None,
        },
    };
    if applied.is_none() {
        log::debug!("{}: parameter {name} = {value} not applied", widget.kind());
    }
    applied.is_some()
}

/// Apply the enable toggle of a single-choice parameter.
pub fn apply_enabled(widget: &mut dyn AnimatedWidget, name: &str, enabled: bool) -> bool {
    let applied = match name {
        "colorSpace" => widget
            .as_color_space()
            .map(|w| w.set_color_space_enabled(enabled)),
        _ => None,
    };
    if applied.is_none() {
        log::debug!("{}: toggle {name} not applied", widget.kind());
    }
    applied.is_some()
}

fn with_number(value: &ParamValue, f: impl FnOnce(f64) -> Option<()>) -> Option<()> {
    value.as_number().and_then(f)
}

/// Zero-based index of a `colorN` parameter name.
fn color_slot(name: &str) -> Option<usize> {
    name.strip_prefix("color")?
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}
