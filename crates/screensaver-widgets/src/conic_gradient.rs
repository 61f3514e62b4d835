//! Conic gradient spinning around a movable center.

use crate::capability::{
    clamp_to, ColorSequenceEditable, ColorSpace, ColorSpaceAdjustable, ColorSpaceSetting,
    OffsetAdjustable, SpeedAdjustable, TransformAdjustable, SPEED_RANGE,
};
use crate::palette::{Generated, Palette};
use crate::registry::{color_descriptors, gradient_descriptors, transform_descriptors};
use crate::style::{closed_gradient_stops, css_number, StyleBinding};
use crate::widget::{AnimatedWidget, Attributes, Phase, ResolvedParams, Surface, WidgetContext};
use screensaver_core::{
    wrap, Bounds, ColorSequence, Defaults, LoopToken, ParamDescriptor, Size, WidgetKind,
};

const KIND: WidgetKind = WidgetKind::ConicGradient;

/// Parameter schema.
#[must_use]
pub fn schema(defaults: &Defaults, colors: &ColorSequence) -> Vec<ParamDescriptor> {
    let mut schema = vec![
        ParamDescriptor::range(
            "speed",
            "Speed",
            Bounds::new(0.0, 10.0, 0.5),
            defaults.conic_gradient.speed,
        ),
        ParamDescriptor::range("offsetX", "Center X", Bounds::new(0.0, 100.0, 1.0), 50.0),
        ParamDescriptor::range("offsetY", "Center Y", Bounds::new(0.0, 100.0, 1.0), 50.0),
    ];
    schema.extend(transform_descriptors());
    schema.extend(gradient_descriptors());
    schema.extend(color_descriptors(colors));
    schema
}

/// Configuration resolved once from the instance attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConicGradientConfig {
    /// Speed setting
    pub speed: f64,
    /// Horizontal center in percent
    pub center_x: f64,
    /// Vertical center in percent
    pub center_y: f64,
    /// Global rotation in degrees
    pub rotation: f64,
    /// Global scale factor
    pub scale: f64,
    /// Spin counter-clockwise
    pub reverse: bool,
    /// Color blending
    pub color_space: ColorSpaceSetting,
    /// Degrees per second per speed unit
    pub angle_rate: f64,
}

impl ConicGradientConfig {
    /// Merge `attributes` with the schema defaults.
    #[must_use]
    pub fn resolve(attributes: &Attributes, defaults: &Defaults) -> Self {
        let schema = schema(defaults, &defaults.palette(KIND));
        let p = ResolvedParams::resolve(&schema, attributes);
        Self {
            speed: p.number("speed", defaults.conic_gradient.speed),
            center_x: p.number("offsetX", 50.0),
            center_y: p.number("offsetY", 50.0),
            rotation: p.number("rotation", 0.0),
            scale: p.number("scale", 1.0),
            reverse: p.flag("reverse"),
            color_space: ColorSpaceSetting {
                chosen: p.text("colorSpace").and_then(|s| s.parse().ok()),
                enabled: p.enabled("colorSpace"),
            },
            angle_rate: defaults.conic_gradient.angle_rate,
        }
    }
}

#[derive(Debug, Clone)]
struct LiveState {
    speed: f64,
    center_x: f64,
    center_y: f64,
    reverse: bool,
    color_space: ColorSpaceSetting,
    angle: f64,
}

/// Conic gradient widget.
#[derive(Debug)]
pub struct ConicGradient {
    config: ConicGradientConfig,
    state: LiveState,
    palette: Palette,
    surface: Surface,
}

impl ConicGradient {
    /// Build from a resolved configuration.
    #[must_use]
    pub fn new(config: ConicGradientConfig, ctx: WidgetContext) -> Self {
        let palette = Palette::load(
            KIND,
            ctx.store,
            &ctx.defaults.palette(KIND),
            ctx.observer,
            ctx.rng,
            Generated::Random {
                saturation: 60..=100,
                lightness: 40..=60,
            },
        );
        let state = LiveState {
            speed: clamp_to(config.speed, SPEED_RANGE),
            center_x: config.center_x,
            center_y: config.center_y,
            reverse: config.reverse,
            color_space: config.color_space,
            angle: 0.0,
        };
        let mut widget = Self {
            surface: Surface::new(config.rotation, config.scale),
            config,
            state,
            palette,
        };
        widget.render();
        widget
    }

    /// Constructor registered for this kind.
    #[must_use]
    pub fn create(ctx: WidgetContext) -> Box<dyn AnimatedWidget> {
        let config = ConicGradientConfig::resolve(&ctx.attributes, &ctx.defaults);
        Box::new(Self::new(config, ctx))
    }

    /// Configuration the instance was created with.
    #[must_use]
    pub const fn config(&self) -> &ConicGradientConfig {
        &self.config
    }

    /// Current start angle in `[0, 360)`.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.state.angle
    }

    fn render(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let image = format!(
            "conic-gradient(from {}deg at {}% {}%{}, {})",
            css_number(self.state.angle),
            css_number(self.state.center_x),
            css_number(self.state.center_y),
            self.state.color_space.interpolation(),
            closed_gradient_stops(self.palette.colors()),
        );
        self.surface.style.set("background-image", image);
    }
}

impl AnimatedWidget for ConicGradient {
    fn kind(&self) -> WidgetKind {
        KIND
    }

    fn phase(&self) -> Phase {
        self.surface.phase()
    }

    fn attach(&mut self, viewport: Size) {
        if self.surface.attach(KIND, viewport) {
            let wanted = self.state.speed > 0.0;
            self.surface.sync_loop(wanted);
        }
    }

    fn stop(&mut self) {
        self.surface.stop(KIND);
    }

    fn resize(&mut self, viewport: Size) {
        self.surface.resize(viewport);
    }

    fn loop_token(&self) -> Option<LoopToken> {
        self.surface.token()
    }

    fn tick(&mut self, token: LoopToken, now_ms: f64) {
        let Some(elapsed_ms) = self.surface.advance(token, now_ms) else {
            return;
        };
        let direction = if self.state.reverse { -1.0 } else { 1.0 };
        let delta = direction * self.state.speed * self.config.angle_rate * elapsed_ms / 1000.0;
        self.state.angle = wrap(self.state.angle + delta, 360.0);
        self.render();
    }

    fn style(&self) -> &StyleBinding {
        &self.surface.style
    }

    fn as_speed(&mut self) -> Option<&mut dyn SpeedAdjustable> {
        Some(self)
    }

    fn as_offset(&mut self) -> Option<&mut dyn OffsetAdjustable> {
        Some(self)
    }

    fn as_transform(&mut self) -> Option<&mut dyn TransformAdjustable> {
        Some(self)
    }

    fn as_color_space(&mut self) -> Option<&mut dyn ColorSpaceAdjustable> {
        Some(self)
    }

    fn as_color_sequence(&mut self) -> Option<&mut dyn ColorSequenceEditable> {
        Some(self)
    }
}

impl SpeedAdjustable for ConicGradient {
    fn speed(&self) -> f64 {
        self.state.speed
    }

    fn update_speed(&mut self, speed: f64) {
        self.state.speed = clamp_to(speed, SPEED_RANGE);
        let wanted = self.state.speed > 0.0;
        self.surface.sync_loop(wanted);
    }

    fn update_reverse(&mut self, reverse: bool) {
        self.state.reverse = reverse;
    }
}

impl OffsetAdjustable for ConicGradient {
    fn update_offset_x(&mut self, percent: f64) {
        self.state.center_x = clamp_to(percent, (0.0, 100.0));
        self.render();
    }

    fn update_offset_y(&mut self, percent: f64) {
        self.state.center_y = clamp_to(percent, (0.0, 100.0));
        self.render();
    }
}

impl TransformAdjustable for ConicGradient {
    fn global_rotation(&self) -> f64 {
        self.surface.rotation()
    }

    fn global_scale(&self) -> f64 {
        self.surface.scale()
    }

    fn update_global_rotation(&mut self, degrees: f64) {
        self.surface.set_rotation(degrees);
    }

    fn update_global_scale(&mut self, factor: f64) {
        self.surface.set_scale(factor);
    }
}

impl ColorSpaceAdjustable for ConicGradient {
    fn update_color_space(&mut self, space: Option<ColorSpace>) {
        self.state.color_space.chosen = space;
        self.render();
    }

    fn set_color_space_enabled(&mut self, enabled: bool) {
        self.state.color_space.enabled = enabled;
        self.render();
    }

    fn effective_color_space(&self) -> Option<ColorSpace> {
        self.state.color_space.effective()
    }
}

impl ColorSequenceEditable for ConicGradient {
    fn colors(&self) -> &ColorSequence {
        self.palette.colors()
    }

    fn update_color(&mut self, index: usize, color: &str) {
        if self.palette.update(index, color) {
            self.render();
        }
    }

    fn add_color(&mut self, color: Option<&str>) {
        if self.palette.add(color) {
            self.render();
        }
    }

    fn duplicate_color(&mut self, index: usize) {
        if self.palette.duplicate(index) {
            self.render();
        }
    }

    fn remove_color(&mut self, index: usize) {
        if self.palette.remove(index).is_some() {
            self.render();
        }
    }

    fn move_color_up(&mut self, index: usize) {
        if self.palette.move_up(index) {
            self.render();
        }
    }

    fn move_color_down(&mut self, index: usize) {
        if self.palette.move_down(index) {
            self.render();
        }
    }
}
