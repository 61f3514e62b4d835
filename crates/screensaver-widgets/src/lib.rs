//! Animated background widgets.
//!
//! Every kind implements [`AnimatedWidget`] and advertises what it can adjust
//! through capability probes:
//!
//! | kind | capabilities |
//! |------|--------------|
//! | [`LinearGradient`] | speed, angle, offset, transform, color space, colors |
//! | [`ConicGradient`] | speed, offset (center), transform, color space, colors |
//! | [`ColorCycle`] | speed, transition, colors |
//! | [`SolidColor`] | color |
//!
//! Widgets never touch the DOM. They write CSS into a [`StyleBinding`] that
//! the host copies onto the background element, and they advance only when
//! the host calls [`AnimatedWidget::tick`] with the current [`LoopToken`].
//!
//! [`LoopToken`]: screensaver_core::LoopToken

mod capability;
pub mod color_cycle;
pub mod conic_gradient;
mod dispatch;
pub mod linear_gradient;
mod palette;
mod registry;
pub mod solid_color;
mod style;
mod widget;

pub use capability::{
    clamp_to, AngleAdjustable, ColorAdjustable, ColorSequenceEditable, ColorSpace,
    ColorSpaceAdjustable, ColorSpaceSetting, OffsetAdjustable, SpeedAdjustable,
    TransformAdjustable, Transition, TransitionAdjustable, ROTATION_RANGE, SCALE_RANGE,
    SPEED_RANGE,
};
pub use color_cycle::{ColorCycle, ColorCycleConfig};
pub use conic_gradient::{ConicGradient, ConicGradientConfig};
pub use dispatch::{apply_enabled, apply_param};
pub use linear_gradient::{LinearGradient, LinearGradientConfig};
pub use registry::{
    color_descriptors, gradient_descriptors, transform_descriptors, Registry, WidgetConstructor,
};
pub use solid_color::SolidColor;
pub use style::{closed_gradient_stops, css_number, gradient_stops, write_cover, StyleBinding};
pub use widget::{AnimatedWidget, Attributes, ColorObserver, Phase, ResolvedParams, WidgetContext};
